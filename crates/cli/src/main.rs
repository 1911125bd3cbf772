use anyhow::{anyhow, bail, Context, Result};
use bubblewrap::api::*;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod provenance;

#[derive(Parser)]
#[command(name = "bubblewrap")]
#[command(about = "Solve, store and inspect circle packings on triangulated surfaces")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Build a surface, solve its KAT packing and store it
    Solve {
        #[command(subcommand)]
        surface: Surface,
    },
    /// Print metadata, mesh counts, edge lists and packings of a stored document
    Info {
        file: PathBuf,
        /// Treat the file as gzipped whatever its extension
        #[arg(long)]
        decompress: bool,
    },
    /// Print genus, Euler characteristic, boundary and valence statistics
    Topology {
        file: PathBuf,
        #[arg(long)]
        decompress: bool,
    },
    /// Develop circles from a stored packing
    Circles(CirclesArgs),
}

#[derive(Subcommand)]
enum Surface {
    /// Twisted torus from one triangulated cylinder
    Torus {
        #[arg(long, default_value_t = 5)]
        width: usize,
        #[arg(long, default_value_t = 5)]
        height: usize,
        /// Bottom circle is entered this many edges forward
        #[arg(long, default_value_t = 2)]
        twist: usize,
        #[command(flatten)]
        common: SolveArgs,
    },
    /// Genus-two double of two one-holed tori
    Genus2 {
        #[arg(long, default_value_t = 5)]
        width: usize,
        #[arg(long, default_value_t = 5)]
        height: usize,
        #[command(flatten)]
        common: SolveArgs,
    },
}

#[derive(Args)]
struct SolveArgs {
    /// Output document (`.cpz` is gzipped)
    #[arg(long)]
    out: PathBuf,
    /// Overwrite an existing output
    #[arg(long)]
    clobber: bool,
    /// Gzip whatever the extension
    #[arg(long)]
    compress: bool,
    #[command(flatten)]
    kat: KatArgs,
}

#[derive(Args, Clone, Copy, Serialize)]
struct KatArgs {
    #[arg(long, default_value_t = KatCfg::default().hol_precond)]
    hol_precond: f64,
    #[arg(long, default_value_t = KatCfg::default().deriv_step)]
    deriv_step: f64,
    #[arg(long, default_value_t = KatCfg::default().coarse_relax)]
    coarse_relax: f64,
    #[arg(long, default_value_t = KatCfg::default().fine_relax)]
    fine_relax: f64,
    #[arg(long, default_value_t = KatCfg::default().maxiter)]
    maxiter: usize,
    #[arg(long, default_value_t = KatCfg::default().maxcond)]
    maxcond: f64,
    #[arg(long, default_value_t = KatCfg::default().fine_tol)]
    fine_tol: f64,
    #[arg(long, default_value_t = KatCfg::default().abort_norm)]
    abort_norm: f64,
}

impl From<KatArgs> for KatCfg {
    fn from(a: KatArgs) -> Self {
        KatCfg {
            hol_precond: a.hol_precond,
            deriv_step: a.deriv_step,
            coarse_relax: a.coarse_relax,
            fine_relax: a.fine_relax,
            maxiter: a.maxiter,
            maxcond: a.maxcond,
            fine_tol: a.fine_tol,
            abort_norm: a.abort_norm,
        }
    }
}

#[derive(Args)]
struct CirclesArgs {
    file: PathBuf,
    #[arg(long)]
    decompress: bool,
    /// Packing key: name, or position for ordered packings
    #[arg(long, default_value = "0")]
    packing: String,
    /// Edge list whose last half-edge marks the centre vertex
    #[arg(long, default_value = "t1")]
    edge_list: String,
    /// Number of neighbour circles
    #[arg(long, default_value_t = 6)]
    count: usize,
    /// One circle per vertex instead of the neighbours of one vertex
    #[arg(long)]
    all: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Solve { surface } => solve(surface).map(|_| ()),
        Action::Info { file, decompress } => info(&file, decompress),
        Action::Topology { file, decompress } => topology(&file, decompress),
        Action::Circles(args) => circles(&args),
    }
}

fn solve(surface: Surface) -> Result<PathBuf> {
    let (params, id, generators, bases, words, common) = match surface {
        Surface::Torus {
            width,
            height,
            twist,
            common,
        } => {
            let (d, t) = torus(width, height, twist).context("building torus")?;
            let id = InterstitialDcel::new(d)?;
            let generators = torus_generators(id.mesh(), t)?;
            let params = json!({"surface": "torus", "width": width, "height": height, "twist": twist});
            let words = handle_trace_words(&[("a", "b")]);
            (params, id, generators, vec![("t1", t)], words, common)
        }
        Surface::Genus2 {
            width,
            height,
            common,
        } => {
            let (d, g) = genus_two(width, height).context("building genus-two double")?;
            let id = InterstitialDcel::new(d)?;
            let generators = genus_two_generators(id.mesh(), g.t1, g.t2)?;
            let params = json!({"surface": "genus2", "width": width, "height": height});
            let words = handle_trace_words(&[("a1", "b1"), ("a2", "b2")]);
            (params, id, generators, vec![("t1", g.t1), ("t2", g.t2)], words, common)
        }
    };
    let mt = oriented_manifold_type(id.mesh())?;
    tracing::info!(genus = mt.genus, chi = mt.chi, uedges = id.nx(), "surface built");

    let x0 = steiner_initial_guess(&id);
    let sol = solve_kat(&id, &generators, &words, &x0, common.kat.into()).context("KAT solve")?;
    let traces: BTreeMap<&str, [f64; 2]> = sol
        .holonomies
        .iter()
        .map(|(k, m)| {
            let t = trace(m);
            (k.as_str(), [t.re, t.im])
        })
        .collect();
    tracing::info!(
        norm = sol.norm,
        coarse = sol.coarse_iterations,
        fine = sol.fine_iterations,
        "packing solved"
    );

    let mut params = params;
    params["kat"] = serde_json::to_value(common.kat)?;
    let extra = BTreeMap::from([("params".to_string(), params.clone())]);
    let mut chains = generators;
    for (name, e) in bases {
        chains.insert(name.to_string(), vec![e]);
    }
    let lists: EdgeLists = chains.into();
    let packs: Packings = vec![sol.x.clone()].into();
    let doc = Document::new(&id, Some(&lists), Some(&packs), extra);
    let opts = StoreOptions {
        force_compression: common.compress,
        clobber: common.clobber,
    };
    if let Some(parent) = common.out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    store(&common.out, &doc, opts).with_context(|| format!("storing {}", common.out.display()))?;

    let summary = json!({
        "genus": mt.genus,
        "uedges": id.nx(),
        "norm": sol.norm,
        "iterations": [sol.coarse_iterations, sol.fine_iterations],
        "traces": traces,
    });
    let sidecar = provenance::write_sidecar(
        &common.out,
        &provenance::Payload::new(params, id.indexed().uuid())
            .compressed(common.compress || is_compressed_path(&common.out))
            .with_summary(summary),
    )?;
    tracing::info!(out = %common.out.display(), provenance = %sidecar.display(), "stored");
    Ok(common.out)
}

fn load_doc<M: IndexedMesh>(file: &Path, decompress: bool) -> Result<Loaded<M>> {
    load(file, decompress).with_context(|| format!("unable to open {}", file.display()))
}

fn info(file: &Path, decompress: bool) -> Result<()> {
    let doc: Loaded<IndexedDcel> = load_doc(file, decompress)?;
    println!("{}", serde_json::to_string_pretty(&doc.metadata)?);
    let d = doc.mesh.mesh();
    println!("uuid: {}", doc.mesh.uuid());
    println!(
        "#vertex {}  #edge {}  #uedge {} (#edge/2 = {})  #face {}",
        d.num_vertices(),
        d.num_edges(),
        doc.mesh.num_unoriented_edges(),
        d.num_edges() as f64 / 2.0,
        d.num_faces()
    );
    match &doc.edge_lists {
        Some(lists) => {
            for (name, ch) in lists.entries() {
                println!("edge list {name}: length {}", ch.len());
            }
        }
        None => println!("no edge lists"),
    }
    match &doc.packings {
        Some(packs) => {
            for (name, x) in packs.entries() {
                let (lo, hi) = x
                    .iter()
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
                println!("packing {name}: {} values in [{lo:.6}, {hi:.6}]", x.len());
            }
        }
        None => println!("no packings"),
    }
    Ok(())
}

fn topology_report(d: &Dcel) -> Result<Value> {
    let mt = oriented_manifold_type(d)?;
    let boundary: Vec<usize> = manifold_boundary_components(d)?.iter().map(|&(_, n)| n).collect();
    Ok(json!({
        "genus": mt.genus,
        "chi": mt.chi,
        "boundary_components": mt.num_boundary,
        "boundary_lengths": boundary,
        "valence_histogram": valence_histogram(d),
    }))
}

fn topology(file: &Path, decompress: bool) -> Result<()> {
    let doc: Loaded<IndexedDcel> = load_doc(file, decompress)?;
    println!("{}", serde_json::to_string_pretty(&topology_report(doc.mesh.mesh())?)?);
    Ok(())
}

fn circles(args: &CirclesArgs) -> Result<()> {
    let doc: Loaded<MirroredInterstitialDcel> = load_doc(&args.file, args.decompress)?;
    let x = doc
        .packings
        .as_ref()
        .and_then(|p| p.get(&args.packing))
        .ok_or_else(|| anyhow!("no packing {:?} in {}", args.packing, args.file.display()))?;
    let base = doc
        .edge_lists
        .as_ref()
        .and_then(|l| l.get(&args.edge_list))
        .and_then(|ch| ch.last().copied())
        .ok_or_else(|| anyhow!("no edge list {:?} in {}", args.edge_list, args.file.display()))?;
    if args.all {
        for (v, c) in vertex_circles(&doc.mesh, x, base)? {
            println!("{:>6}  {c}", v.0);
        }
    } else {
        if args.count == 0 {
            bail!("--count must be positive");
        }
        for (k, c) in circles_around_vertex(&doc.mesh, x, base, args.count)?
            .iter()
            .enumerate()
        {
            println!("{k:>3}  {c}");
        }
    }
    Ok(())
}

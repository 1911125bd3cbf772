//! Kobe–Andreev–Thurston packing solve.
//!
//! Purpose
//! - Find a cross-ratio vector `X` whose vertex loops are all flat and whose
//!   generator holonomies have real traces, i.e. a circle packing with a
//!   Fuchsian holonomy representation.
//!
//! Why this design
//! - Search in `log X` so every Newton iterate stays positive.
//! - Residual = `packing_defect(X)` followed by `hol_precond · Im tr(w)` for a
//!   list of trace words `w` over named generator chains. The weight makes
//!   the reality rows comparable to the flatness rows.
//! - Two `lsroot` stages: a damped coarse pass to a loose goal, then undamped
//!   Newton to the fine goal, each abandoned if the residual blows up.

use std::collections::BTreeMap;

use nalgebra::{DMatrix, DVector};
use thiserror::Error;

use crate::cfg::{DIVERGENCE_NORM, TRACE_WEIGHT};
use crate::circle::steiner_chain_xratio;
use crate::cocycle::{CocycleError, InterstitialCocycle};
use crate::dcel::{Chain, TopologyError};
use crate::indexed::IndexedMesh;
use crate::mobius::{trace, Mat2c};
use crate::newton::{abort_above_norm, lsroot, numjac, LeastSquaresProblem, NewtonCfg, SolverError};

/// Controls for `solve_kat`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KatCfg {
    /// Weight of the `Im tr` rows.
    pub hol_precond: f64,
    /// Forward-difference step for the Jacobian (in log coordinates).
    pub deriv_step: f64,
    pub coarse_relax: f64,
    pub fine_relax: f64,
    /// Iteration cap per stage.
    pub maxiter: usize,
    pub maxcond: f64,
    /// Fine goal is `fine_tol · sqrt(n)`; the coarse goal is `sqrt(n)`.
    pub fine_tol: f64,
    /// A stage aborts once the residual norm exceeds this.
    pub abort_norm: f64,
}

impl Default for KatCfg {
    fn default() -> Self {
        Self {
            hol_precond: TRACE_WEIGHT,
            deriv_step: 1e-12,
            coarse_relax: 0.6,
            fine_relax: 1.0,
            maxiter: 200,
            maxcond: 1e20,
            fine_tol: 1e-10,
            abort_norm: DIVERGENCE_NORM,
        }
    }
}

#[derive(Debug, Error)]
pub enum PackingError {
    #[error(transparent)]
    Topology(#[from] TopologyError),
    #[error(transparent)]
    Cocycle(#[from] CocycleError),
    #[error("{stage} stage failed: {source}")]
    Solver {
        stage: &'static str,
        #[source]
        source: SolverError,
    },
    #[error("trace word refers to unknown generator {0:?}")]
    UnknownGenerator(String),
    #[error("empty trace word")]
    EmptyWord,
    #[error("initial cross ratio {value} at uidx {index} is not positive")]
    NonPositive { index: usize, value: f64 },
}

/// An ordered product of named generators, read left to right.
pub type TraceWord = Vec<String>;

/// Trace words for a surface given by its handles `(a_i, b_i)`.
///
/// Per handle `a_i`, `b_i`, `a_i b_i`; then for every `i < j` the cross
/// words `a_i b_j` and `a_j b_i`.
pub fn handle_trace_words(handles: &[(&str, &str)]) -> Vec<TraceWord> {
    let word = |gs: &[&str]| gs.iter().map(|g| g.to_string()).collect::<TraceWord>();
    let mut out = Vec::new();
    for &(a, b) in handles {
        out.push(word(&[a]));
        out.push(word(&[b]));
        out.push(word(&[a, b]));
    }
    for i in 0..handles.len() {
        for j in i + 1..handles.len() {
            out.push(word(&[handles[i].0, handles[j].1]));
            out.push(word(&[handles[j].0, handles[i].1]));
        }
    }
    out
}

/// Steiner-chain guess: each edge gets `2 cos(π/n)` with `n` the larger
/// valence of its two endpoints.
pub fn steiner_initial_guess<M: IndexedMesh>(mesh: &M) -> Vec<f64> {
    let id = mesh.indexed();
    let d = id.mesh();
    id.unoriented_edges()
        .iter()
        .map(|&e| steiner_chain_xratio(d.valence(d.src(e)).max(d.valence(d.dst(e)))))
        .collect()
}

/// Residual of the packing problem in log coordinates.
pub struct KatProblem<'a, C> {
    mesh: &'a C,
    generators: Vec<&'a Chain>,
    words: Vec<Vec<usize>>,
    hol_precond: f64,
    deriv_step: f64,
}

impl<'a, C: InterstitialCocycle> KatProblem<'a, C> {
    pub fn new(
        mesh: &'a C,
        generators: &'a BTreeMap<String, Chain>,
        words: &[TraceWord],
        cfg: &KatCfg,
    ) -> Result<Self, PackingError> {
        let names: Vec<&String> = generators.keys().collect();
        let words = words
            .iter()
            .map(|w| {
                if w.is_empty() {
                    return Err(PackingError::EmptyWord);
                }
                w.iter()
                    .map(|g| {
                        names
                            .iter()
                            .position(|n| *n == g)
                            .ok_or_else(|| PackingError::UnknownGenerator(g.clone()))
                    })
                    .collect()
            })
            .collect::<Result<Vec<Vec<usize>>, _>>()?;
        Ok(Self {
            mesh,
            generators: generators.values().collect(),
            words,
            hol_precond: cfg.hol_precond,
            deriv_step: cfg.deriv_step,
        })
    }

    /// Residual length: `ny` flatness rows plus one row per trace word.
    pub fn len(&self) -> usize {
        self.mesh.ny() + self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn eval(&self, x: &[f64]) -> Result<DVector<f64>, CocycleError> {
        let defect = self.mesh.packing_defect(x)?;
        let hols = self
            .generators
            .iter()
            .map(|ch| self.mesh.hol(ch, x))
            .collect::<Result<Vec<Mat2c>, _>>()?;
        let mut y = DVector::zeros(self.len());
        y.rows_mut(0, defect.len()).copy_from(&defect);
        for (k, w) in self.words.iter().enumerate() {
            let m = w.iter().fold(Mat2c::identity(), |m, &g| m * hols[g]);
            y[defect.len() + k] = self.hol_precond * trace(&m).im;
        }
        Ok(y)
    }
}

impl<C: InterstitialCocycle> LeastSquaresProblem for KatProblem<'_, C> {
    fn residual(&self, lx: &DVector<f64>) -> Result<DVector<f64>, SolverError> {
        let x: Vec<f64> = lx.iter().map(|l| l.exp()).collect();
        self.eval(&x).map_err(|e| SolverError::Residual(Box::new(e)))
    }

    fn jacobian(&self, lx: &DVector<f64>, y: &DVector<f64>) -> Result<DMatrix<f64>, SolverError> {
        numjac(|z| self.residual(z), lx, y, self.deriv_step)
    }
}

/// A solved packing.
#[derive(Clone, Debug)]
pub struct KatSolution {
    /// Cross ratios indexed by `uidx`.
    pub x: Vec<f64>,
    /// Residual norm at `x`.
    pub norm: f64,
    pub coarse_iterations: usize,
    pub fine_iterations: usize,
    /// Holonomy of every generator at `x`.
    pub holonomies: BTreeMap<String, Mat2c>,
}

/// Two-stage KAT solve from the initial cross ratios `x0`.
pub fn solve_kat<C: InterstitialCocycle>(
    mesh: &C,
    generators: &BTreeMap<String, Chain>,
    words: &[TraceWord],
    x0: &[f64],
    cfg: KatCfg,
) -> Result<KatSolution, PackingError> {
    if x0.len() != mesh.nx() {
        return Err(CocycleError::WrongLength {
            expected: mesh.nx(),
            got: x0.len(),
        }
        .into());
    }
    if let Some((index, &value)) = x0.iter().enumerate().find(|(_, v)| !(**v > 0.0)) {
        return Err(PackingError::NonPositive { index, value });
    }
    let problem = KatProblem::new(mesh, generators, words, &cfg)?;
    let n = x0.len() as f64;
    let lx0 = DVector::from_iterator(x0.len(), x0.iter().map(|v| v.ln()));

    let stages = [
        ("coarse", cfg.coarse_relax, n.sqrt()),
        ("fine", cfg.fine_relax, cfg.fine_tol * n.sqrt()),
    ];
    let mut lx = lx0;
    let mut iterations = [0; 2];
    let mut norm = f64::NAN;
    for (k, &(stage, relax, normgoal)) in stages.iter().enumerate() {
        let ncfg = NewtonCfg {
            maxiter: cfg.maxiter,
            relax,
            normgoal,
            maxcond: cfg.maxcond,
        };
        let mut guard = abort_above_norm(cfg.abort_norm);
        let report = lsroot(&problem, lx, ncfg, Some(&mut guard))
            .map_err(|source| PackingError::Solver { stage, source })?;
        tracing::info!(stage, iterations = report.iterations, norm = report.norm, "kat stage done");
        iterations[k] = report.iterations;
        norm = report.norm;
        lx = report.x;
    }

    let x: Vec<f64> = lx.iter().map(|l| l.exp()).collect();
    let holonomies = generators
        .iter()
        .map(|(name, ch)| Ok((name.clone(), mesh.hol(ch, &x)?)))
        .collect::<Result<BTreeMap<_, _>, CocycleError>>()?;
    Ok(KatSolution {
        x,
        norm,
        coarse_iterations: iterations[0],
        fine_iterations: iterations[1],
        holonomies,
    })
}

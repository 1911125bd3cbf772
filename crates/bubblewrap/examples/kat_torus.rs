//! Solve the KAT packing on a twisted torus and print its holonomy traces.
//!
//! Purpose
//! - Smallest end-to-end run: build, freeze, solve, inspect.
//! - `cargo run -p bubblewrap --example kat_torus -- 6 5 2` (width, height, twist).

use bubblewrap::api::*;

fn main() {
    let args: Vec<usize> = std::env::args()
        .skip(1)
        .map(|a| a.parse().expect("integer argument"))
        .collect();
    let (w, h, twist) = match args[..] {
        [w, h, twist] => (w, h, twist),
        _ => (5, 5, 2),
    };
    let (d, t) = torus(w, h, twist).expect("torus");
    let id = InterstitialDcel::new(d).expect("freeze");
    let mt = oriented_manifold_type(id.mesh()).expect("manifold type");
    println!(
        "torus {w}x{h} twist {twist}: genus {} chi {} #uedge {}",
        mt.genus,
        mt.chi,
        id.nx()
    );

    let gens = torus_generators(id.mesh(), t).expect("generators");
    let words = handle_trace_words(&[("a", "b")]);
    let x0 = steiner_initial_guess(&id);
    let sol = solve_kat(&id, &gens, &words, &x0, KatCfg::default()).expect("KAT solve");
    println!(
        "solved: norm {:.3e} after {}+{} iterations",
        sol.norm, sol.coarse_iterations, sol.fine_iterations
    );
    for (name, m) in &sol.holonomies {
        println!("tr({name}) = {}", trace(m));
    }
    let (a, b) = (&sol.holonomies["a"], &sol.holonomies["b"]);
    println!("tr(ab) = {}", trace(&(a * b)));
    println!("tr([a,b]) = {}", trace(&commutator(a, b)));
}

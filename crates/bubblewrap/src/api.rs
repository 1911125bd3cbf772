//! Curated surface for the CLI, benches and examples (UNSTABLE).
//!
//! Prefer these re-exports over reaching into submodules.

// Mesh kernel and freezing
pub use crate::dcel::{
    edge_chain_dfs, manifold_boundary_components, oriented_manifold_type, valence_histogram,
    Chain, Dcel, HalfEdgeId, ManifoldType, Move, TopologyError, VertexId,
};
pub use crate::indexed::{IndexedDcel, IndexedMesh};
// Surfaces
pub use crate::triangulations::{
    cylinder, genus_two, one_holed_torus, pinched_cylinder, ring, torus, GenusTwo,
};
// Holonomy
pub use crate::cocycle::{
    closed_chain, genus_two_generators, holfactor, torus_generators, CocycleError, CylinderStep,
    InterstitialCocycle, InterstitialDcel, MirroredInterstitialDcel,
};
pub use crate::mobius::{commutator, make_sl2, sl2_inv, sl2_rho, trace, transform_point, Mat2c};
pub use crate::circle::{circles_around_vertex, steiner_chain_xratio, vertex_circles, Circle};
// Solvers
pub use crate::newton::{lsroot, LeastSquaresProblem, NewtonCfg, NewtonReport, SolverError};
pub use crate::packing::{
    handle_trace_words, solve_kat, steiner_initial_guess, KatCfg, KatProblem, KatSolution,
    PackingError, TraceWord,
};
// Documents
pub use crate::serialization::{
    is_compressed_path, load, store, Collection, Document, EdgeLists, Loaded, Packings,
    SerializationError, StoreOptions, SCHEMA, SCHEMA_VERSION,
};

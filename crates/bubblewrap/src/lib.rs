//! Circle packings on triangulated surfaces.
//!
//! Layers, leaf to root:
//! - `dcel`: mutable half-edge mesh, surgery and topology.
//! - `indexed`: frozen meshes with stable `idx`/`uidx` numbering.
//! - `cocycle`: interstitial PSL(2,C) holonomy and the flatness defect.
//! - `newton`: mesh-agnostic least-squares Newton solver.
//! - `packing`: the two-stage KAT solve built on the layers above.
//! - `serialization`: `.cpj`/`.cpz` documents.
//!
//! `triangulations`, `mobius` and `circle` hold the surface builders and the
//! Möbius/circle helpers the packing code and its consumers share.
//!
//! API Policy
//! - There is no stable public API; `api` is the curated surface for the CLI
//!   and examples, `prelude` the short list for quick imports.

pub mod api;
pub mod circle;
pub mod cocycle;
pub mod dcel;
pub mod indexed;
pub mod mobius;
pub mod newton;
pub mod packing;
pub mod serialization;
pub mod triangulations;

mod cfg;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cocycle::{InterstitialCocycle, InterstitialDcel, MirroredInterstitialDcel};
    pub use crate::dcel::{Chain, Dcel, HalfEdgeId, Move, VertexId};
    pub use crate::indexed::{IndexedDcel, IndexedMesh};
    pub use crate::mobius::Mat2c;
    pub use crate::packing::{solve_kat, steiner_initial_guess, KatCfg};
}

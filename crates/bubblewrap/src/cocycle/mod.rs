//! Interstitial cocycles: PSL(2,C) holonomy of marked interstices.
//!
//! Purpose
//! - In the dual graph of a circle packing every triangle is an interstice.
//!   A half-edge marks one cusp of the interstice of its face, and the Möbius
//!   map between two marked interstices is a product of elementary factors,
//!   one per move. Only vertex rotations carry data: the cross ratio of the
//!   unoriented edge they cross.
//! - A cross-ratio vector is a packing iff the loop around every vertex
//!   develops to `-I` (flatness); `packing_defect` measures the failure.
//!
//! Why this design
//! - One trait, `InterstitialCocycle`, shared by the closed-surface and the
//!   mirror-boundary variants; they differ only in how the loop around a
//!   vertex is closed.
//! - Cross-ratio vectors are plain `&[f64]` indexed by `uidx`; the frozen mesh
//!   owns the numbering.
//!
//! References
//! - Kamishima, Mizushima, Tan: flatness criterion for interstitial cocycles.

mod error;
mod generators;
mod interstitial;
mod mirrored;

pub use error::CocycleError;
pub use generators::{
    closed_chain, conjugate_loop, connecting_chain, extend_chain, genus_two_generators,
    torus_generators, CylinderStep,
};
pub use interstitial::{
    factor_tri_ccw, factor_tri_cw, factor_vert_ccw, factor_vert_cw, holfactor,
    InterstitialCocycle, InterstitialDcel,
};
pub use mirrored::MirroredInterstitialDcel;

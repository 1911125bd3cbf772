//! Doubly-connected edge list: mutable half-edge mesh plus surgery.
//!
//! Purpose
//! - Hold the combinatorics of a triangulated surface (no geometry) and
//!   provide the construction and surgery primitives used to build closed
//!   surfaces from triangulated cylinders: face creation, twin pairing,
//!   boundary gluing, orientation reversal, disjoint union.
//! - Answer the topological questions the packing code needs: stars and
//!   valences, boundary components, Euler characteristic and genus.
//!
//! Why this design
//! - Arena storage with index handles (`VertexId`, `HalfEdgeId`, `FaceId`):
//!   the `next`/`prev`/`twin` graph is cyclic, and indices keep it free of
//!   ownership cycles and trivially serializable.
//! - Gluing discards vertices by flagging them; half-edges and faces are never
//!   removed, so edge handles stay valid through every operation, including
//!   freezing into an `IndexedDcel`.
//!
//! Layout
//! - `types.rs` (records, navigation), `build.rs` (faces, twins, union),
//!   `surgery.rs` (gluing, reversal), `topology.rs` (stars, manifold type),
//!   `chains.rs` (elementary moves, chain enumeration).

mod build;
mod chains;
mod error;
mod surgery;
mod topology;
mod types;

pub use chains::{edge_chain_dfs, Chain, Move};
pub use error::TopologyError;
pub use topology::{
    manifold_boundary_components, oriented_manifold_type, valence_histogram, ManifoldType,
};
pub use types::{Dcel, Face, FaceId, HalfEdge, HalfEdgeId, IdShift, Vertex, VertexId};

#[cfg(test)]
mod tests;

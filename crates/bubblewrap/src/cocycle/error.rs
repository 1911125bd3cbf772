use thiserror::Error;

use crate::dcel::{HalfEdgeId, VertexId};

/// Failures evaluating holonomy or assembling generator chains.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CocycleError {
    #[error("half-edges {0:?} and {1:?} are not one elementary move apart")]
    InvalidMove(HalfEdgeId, HalfEdgeId),
    #[error("cross-ratio vector has length {got}, mesh has {expected} unoriented edges")]
    WrongLength { expected: usize, got: usize },
    #[error("vertex {0:?} lies on the boundary; flatness there needs a mirror boundary")]
    BoundaryVertex(VertexId),
    #[error("mirror boundary around vertex {0:?} does not close up")]
    MalformedMirror(VertexId),
    #[error("move from {0:?} would cross the boundary")]
    BlockedMove(HalfEdgeId),
    #[error("chain from {0:?} did not return to its start")]
    OpenChain(HalfEdgeId),
    #[error("no chain from {from:?} reaches {to:?}")]
    Unreachable { from: HalfEdgeId, to: HalfEdgeId },
}

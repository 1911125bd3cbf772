use thiserror::Error;

use super::types::{HalfEdgeId, VertexId};

/// Construction and surgery failures. All of them indicate a malformed mesh
/// or a bug in the construction sequence; none is recoverable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopologyError {
    #[error("half-edge twin not involutive: {edge:?} pairs with {twin:?}, which is already paired elsewhere")]
    NonInvolutiveTwin { edge: HalfEdgeId, twin: HalfEdgeId },
    #[error("half-edge {edge:?} has source {vertex:?}, which is no longer in the mesh")]
    DanglingVertex { edge: HalfEdgeId, vertex: VertexId },
    #[error("boundary walk from {0:?} wrapped around without meeting another boundary edge")]
    OpenBoundaryWalk(HalfEdgeId),
    #[error("boundary walk from {0:?} never returned to its start")]
    UnclosedWalk(HalfEdgeId),
    #[error("half-edge {0:?} is not on a consistent next/prev face cycle")]
    BrokenFaceCycle(HalfEdgeId),
    #[error("vertex {vertex:?} lists leaving half-edge {edge:?}, whose source is another vertex")]
    LeavingMismatch { vertex: VertexId, edge: HalfEdgeId },
    #[error("vertex {0:?} has no leaving half-edge")]
    IsolatedVertex(VertexId),
    #[error("impossible parity: {0}")]
    Parity(&'static str),
    #[error("degenerate construction: {0}")]
    Degenerate(&'static str),
}

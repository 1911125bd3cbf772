//! Per-move factors, path holonomy and the vertex flatness defect.

use nalgebra::{DVector, Matrix2};

use super::error::CocycleError;
use crate::dcel::{Dcel, HalfEdgeId, TopologyError, VertexId};
use crate::indexed::{IndexedDcel, IndexedMesh};
use crate::mobius::{c, Mat2c};

/// Rotation inside a triangle, counterclockwise (`e2 = e1.next`).
pub fn factor_tri_ccw() -> Mat2c {
    Mat2c::new(c(0.0, 0.0), c(0.0, 1.0), c(0.0, 1.0), c(1.0, 0.0))
}

/// Rotation inside a triangle, clockwise (`e2 = e1.prev`).
pub fn factor_tri_cw() -> Mat2c {
    Mat2c::new(c(1.0, 0.0), c(0.0, -1.0), c(0.0, -1.0), c(0.0, 0.0))
}

/// Rotation about a vertex, counterclockwise, crossing an edge with cross ratio `x`.
pub fn factor_vert_ccw(x: f64) -> Mat2c {
    Mat2c::new(c(x, 0.0), c(-1.0, 0.0), c(1.0, 0.0), c(0.0, 0.0))
}

/// Rotation about a vertex, clockwise, crossing an edge with cross ratio `x`.
pub fn factor_vert_cw(x: f64) -> Mat2c {
    Mat2c::new(c(0.0, 0.0), c(1.0, 0.0), c(-1.0, 0.0), c(x, 0.0))
}

fn cross_ratio_at(id: &IndexedDcel, x: &[f64], e: HalfEdgeId) -> Result<f64, CocycleError> {
    x.get(id.uidx(e))
        .copied()
        .ok_or(CocycleError::WrongLength {
            expected: id.num_unoriented_edges(),
            got: x.len(),
        })
}

pub(crate) fn check_len(id: &IndexedDcel, x: &[f64]) -> Result<(), CocycleError> {
    let expected = id.num_unoriented_edges();
    if x.len() != expected {
        return Err(CocycleError::WrongLength {
            expected,
            got: x.len(),
        });
    }
    Ok(())
}

/// Factor for the elementary move `e1 → e2`.
///
/// The four cases are tested in a fixed order: `next`, `prev`, `prev.twin`,
/// `twin.next`. Vertex rotations read `x` at the edge being crossed.
pub fn holfactor(
    id: &IndexedDcel,
    e1: HalfEdgeId,
    e2: HalfEdgeId,
    x: &[f64],
) -> Result<Mat2c, CocycleError> {
    let d = id.mesh();
    if e2 == d.next(e1) {
        Ok(factor_tri_ccw())
    } else if e2 == d.prev(e1) {
        Ok(factor_tri_cw())
    } else if d.vert_ccw(e1) == Some(e2) {
        Ok(factor_vert_ccw(cross_ratio_at(id, x, e2)?))
    } else if d.vert_cw(e1) == Some(e2) {
        Ok(factor_vert_cw(cross_ratio_at(id, x, e1)?))
    } else {
        Err(CocycleError::InvalidMove(e1, e2))
    }
}

/// Real part of the holonomy around the full star of an interior vertex.
pub(crate) fn interior_hol(
    id: &IndexedDcel,
    x: &[f64],
    v: VertexId,
) -> Result<Matrix2<f64>, CocycleError> {
    let mut closed = id.mesh().interior_star(v);
    if let Some(&first) = closed.first() {
        closed.push(first);
    }
    Ok(chain_hol(id, &closed, x)?.map(|z| z.re))
}

fn chain_hol(id: &IndexedDcel, chain: &[HalfEdgeId], x: &[f64]) -> Result<Mat2c, CocycleError> {
    chain
        .windows(2)
        .try_fold(Mat2c::identity(), |m, w| Ok(m * holfactor(id, w[0], w[1], x)?))
}

/// PSL(2,C) cocycle on the marked interstices of a frozen mesh.
///
/// `x` is always indexed by `uidx`. Implementors choose how the loop around a
/// vertex is closed; everything else is shared.
pub trait InterstitialCocycle: IndexedMesh {
    /// Number of cross ratios (unoriented edges).
    fn nx(&self) -> usize {
        self.indexed().num_unoriented_edges()
    }

    /// Length of the packing defect, four entries per vertex.
    fn ny(&self) -> usize {
        4 * self.indexed().mesh().num_vertices()
    }

    fn holfactor(&self, e1: HalfEdgeId, e2: HalfEdgeId, x: &[f64]) -> Result<Mat2c, CocycleError> {
        holfactor(self.indexed(), e1, e2, x)
    }

    /// Left-to-right product of the factors along `chain`, starting from the identity.
    fn hol(&self, chain: &[HalfEdgeId], x: &[f64]) -> Result<Mat2c, CocycleError> {
        check_len(self.indexed(), x)?;
        chain_hol(self.indexed(), chain, x)
    }

    /// Real holonomy of the closed loop around `v`; `-I` when `v` is flat.
    fn hol_around_vertex(&self, x: &[f64], v: VertexId) -> Result<Matrix2<f64>, CocycleError>;

    fn hol_around_vertices(&self, x: &[f64]) -> Result<Vec<Matrix2<f64>>, CocycleError> {
        check_len(self.indexed(), x)?;
        self.indexed()
            .mesh()
            .vertex_ids()
            .map(|v| self.hol_around_vertex(x, v))
            .collect()
    }

    /// `hol_around_vertex + I` for every vertex, flattened row-major.
    fn packing_defect(&self, x: &[f64]) -> Result<DVector<f64>, CocycleError> {
        let hols = self.hol_around_vertices(x)?;
        let mut y = DVector::zeros(4 * hols.len());
        for (k, m) in hols.iter().enumerate() {
            y[4 * k] = m[(0, 0)] + 1.0;
            y[4 * k + 1] = m[(0, 1)];
            y[4 * k + 2] = m[(1, 0)];
            y[4 * k + 3] = m[(1, 1)] + 1.0;
        }
        Ok(y)
    }
}

/// Cocycle on a closed surface; boundary vertices are rejected.
#[derive(Clone, Debug)]
pub struct InterstitialDcel(IndexedDcel);

impl InterstitialDcel {
    pub fn new(mesh: Dcel) -> Result<Self, TopologyError> {
        Ok(Self(IndexedDcel::new(mesh)?))
    }

    #[inline]
    pub fn mesh(&self) -> &Dcel {
        self.0.mesh()
    }
}

impl IndexedMesh for InterstitialDcel {
    fn from_indexed(mesh: IndexedDcel) -> Self {
        Self(mesh)
    }
    fn indexed(&self) -> &IndexedDcel {
        &self.0
    }
}

impl InterstitialCocycle for InterstitialDcel {
    fn hol_around_vertex(&self, x: &[f64], v: VertexId) -> Result<Matrix2<f64>, CocycleError> {
        if !self.mesh().is_interior(v) {
            return Err(CocycleError::BoundaryVertex(v));
        }
        interior_hol(&self.0, x, v)
    }
}

//! Cocycle on a surface whose boundary acts as a mirror.

use nalgebra::Matrix2;

use super::error::CocycleError;
use super::interstitial::{factor_vert_ccw, interior_hol, InterstitialCocycle};
use crate::dcel::{Dcel, TopologyError, VertexId};
use crate::indexed::{IndexedDcel, IndexedMesh};
use crate::mobius::Mat2c;

/// Interstitial cocycle whose boundary vertices close up through their mirror image.
///
/// Around a boundary vertex with CCW star `1 2 3 4 5` the loop runs
/// `1 2 3 4 5 P 5 4 3 2`, where `P` is the boundary half-edge ending at the
/// vertex, every step a counterclockwise vertex rotation. Interior vertices
/// use the ordinary star loop.
#[derive(Clone, Debug)]
pub struct MirroredInterstitialDcel(IndexedDcel);

impl MirroredInterstitialDcel {
    pub fn new(mesh: Dcel) -> Result<Self, TopologyError> {
        Ok(Self(IndexedDcel::new(mesh)?))
    }

    #[inline]
    pub fn mesh(&self) -> &Dcel {
        self.0.mesh()
    }

    fn mirrored_hol(&self, x: &[f64], v: VertexId) -> Result<Matrix2<f64>, CocycleError> {
        let d = self.mesh();
        let mut elist = d.star(v);
        let Some(&first) = elist.first() else {
            return Err(CocycleError::MalformedMirror(v));
        };
        let back = d.boundary_prev(first).ok_or(CocycleError::MalformedMirror(v))?;
        if d.boundary_next(back) != Some(first) {
            return Err(CocycleError::MalformedMirror(v));
        }
        elist.push(back);
        let n = elist.len();
        for k in (1..n - 1).rev() {
            elist.push(elist[k]);
        }
        let mut m = Mat2c::identity();
        for &e in &elist {
            let xe = x.get(self.0.uidx(e)).copied().ok_or(CocycleError::WrongLength {
                expected: self.0.num_unoriented_edges(),
                got: x.len(),
            })?;
            m *= factor_vert_ccw(xe);
        }
        Ok(m.map(|z| z.re))
    }
}

impl IndexedMesh for MirroredInterstitialDcel {
    fn from_indexed(mesh: IndexedDcel) -> Self {
        Self(mesh)
    }
    fn indexed(&self) -> &IndexedDcel {
        &self.0
    }
}

impl InterstitialCocycle for MirroredInterstitialDcel {
    fn hol_around_vertex(&self, x: &[f64], v: VertexId) -> Result<Matrix2<f64>, CocycleError> {
        if self.mesh().is_interior(v) {
            interior_hol(&self.0, x, v)
        } else {
            self.mirrored_hol(x, v)
        }
    }
}

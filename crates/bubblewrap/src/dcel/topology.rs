//! Vertex stars, boundary components and the oriented manifold type.

use std::collections::{BTreeMap, HashSet};

use super::error::TopologyError;
use super::types::{Dcel, HalfEdgeId, VertexId};

/// Topological type of a connected oriented surface, possibly with boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifoldType {
    pub genus: i64,
    pub chi: i64,
    pub num_boundary: usize,
    pub boundary_lengths: Vec<usize>,
}

impl Dcel {
    /// Half-edges leaving `v` in CCW order, starting from the clockwise-most one.
    ///
    /// Works on boundary vertices too; for interior vertices the start is
    /// `leaving` itself.
    pub fn star(&self, v: VertexId) -> Vec<HalfEdgeId> {
        let Some(leaving) = self.vertex(v).leaving else {
            return Vec::new();
        };
        let mut e0 = leaving;
        for _ in 0..self.num_edges() {
            match self.vert_cw(e0) {
                Some(c) => {
                    e0 = c;
                    if e0 == leaving {
                        break;
                    }
                }
                None => break,
            }
        }
        self.ccw_from(e0)
    }

    /// Half-edges leaving an interior vertex `v` in CCW order, starting at `leaving`.
    ///
    /// On a boundary vertex this stops at the boundary and misses the edges
    /// clockwise of `leaving`; use `star` there.
    pub fn interior_star(&self, v: VertexId) -> Vec<HalfEdgeId> {
        match self.vertex(v).leaving {
            Some(leaving) => self.ccw_from(leaving),
            None => Vec::new(),
        }
    }

    fn ccw_from(&self, e0: HalfEdgeId) -> Vec<HalfEdgeId> {
        let mut out = vec![e0];
        let mut e = e0;
        while let Some(c) = self.vert_ccw(e) {
            if c == e0 || out.len() > self.num_edges() {
                break;
            }
            out.push(c);
            e = c;
        }
        out
    }

    /// Number of half-edges in the rotational star of `v`.
    pub fn valence(&self, v: VertexId) -> usize {
        self.star(v).len()
    }

    /// True iff the star of `v` closes up without meeting a boundary.
    pub fn is_interior(&self, v: VertexId) -> bool {
        let Some(leaving) = self.vertex(v).leaving else {
            return false;
        };
        let mut e = leaving;
        for _ in 0..self.num_edges() {
            match self.vert_cw(e) {
                Some(c) if c == leaving => return true,
                Some(c) => e = c,
                None => return false,
            }
        }
        false
    }
}

/// Partition the boundary half-edges into maximal boundary cycles.
///
/// Returns one `(representative, cycle length)` pair per component, in order
/// of the first boundary half-edge met when scanning half-edges by index.
pub fn manifold_boundary_components(
    d: &Dcel,
) -> Result<Vec<(HalfEdgeId, usize)>, TopologyError> {
    let mut seen: HashSet<HalfEdgeId> = HashSet::new();
    let mut comps = Vec::new();
    for e0 in d.edge_ids() {
        if seen.contains(&e0) || !d.is_boundary(e0) {
            continue;
        }
        seen.insert(e0);
        let mut k = 1;
        let mut e = d.boundary_next(e0).ok_or(TopologyError::OpenBoundaryWalk(e0))?;
        while e != e0 {
            if k > d.num_edges() {
                return Err(TopologyError::UnclosedWalk(e0));
            }
            seen.insert(e);
            k += 1;
            e = d.boundary_next(e).ok_or(TopologyError::OpenBoundaryWalk(e))?;
        }
        comps.push((e0, k));
    }
    Ok(comps)
}

/// Euler characteristic, genus and boundary data of a connected oriented surface.
///
/// With boundary, every boundary half-edge is counted as half an edge that
/// lacks its twin, so the unoriented edge count is `(|E| + |∂E|) / 2`.
pub fn oriented_manifold_type(d: &Dcel) -> Result<ManifoldType, TopologyError> {
    let comps = manifold_boundary_components(d)?;
    let nv = d.num_vertices() as i64;
    let ne = d.num_edges() as i64;
    let nf = d.num_faces() as i64;
    let chi = if comps.is_empty() {
        if ne % 2 != 0 {
            return Err(TopologyError::Parity(
                "closed surface with odd number of oriented edges",
            ));
        }
        let chi = nv - ne / 2 + nf;
        if chi % 2 != 0 {
            return Err(TopologyError::Parity(
                "closed oriented surface with odd Euler characteristic",
            ));
        }
        chi
    } else {
        let tot_bdry: i64 = comps.iter().map(|&(_, k)| k as i64).sum();
        if (ne + tot_bdry) % 2 != 0 {
            return Err(TopologyError::Parity(
                "oriented edges plus boundary edges not even",
            ));
        }
        nv - (ne + tot_bdry) / 2 + nf
    };
    let num_boundary = comps.len();
    Ok(ManifoldType {
        genus: 1 - (chi + num_boundary as i64).div_euclid(2),
        chi,
        num_boundary,
        boundary_lengths: comps.iter().map(|&(_, k)| k).collect(),
    })
}

/// Number of live vertices per valence.
pub fn valence_histogram(d: &Dcel) -> BTreeMap<usize, usize> {
    let mut hist = BTreeMap::new();
    for v in d.vertex_ids() {
        *hist.entry(d.valence(v)).or_insert(0) += 1;
    }
    hist
}

//! Face construction, twin pairing and disjoint union.

use super::error::TopologyError;
use super::types::{Dcel, Face, FaceId, HalfEdge, HalfEdgeId, IdShift, VertexId};

impl Dcel {
    /// Create one face whose oriented boundary is the closed vertex chain `verts`.
    ///
    /// One half-edge per consecutive pair (wrapping around), `next`/`prev`
    /// wired cyclically, twins left unset. Vertices without a `leaving`
    /// half-edge get the one created here. Chains shorter than three are
    /// rejected.
    pub fn face_from_vertex_chain(
        &mut self,
        verts: &[VertexId],
    ) -> Result<(Vec<HalfEdgeId>, FaceId), TopologyError> {
        if verts.len() < 3 {
            return Err(TopologyError::Degenerate("face needs at least 3 vertices"));
        }
        let n = verts.len();
        let base = self.edges.len();
        let face = FaceId(self.faces.len());
        let ids: Vec<HalfEdgeId> = (0..n).map(|k| HalfEdgeId(base + k)).collect();
        for (k, &v) in verts.iter().enumerate() {
            self.edges.push(HalfEdge {
                src: v,
                next: ids[(k + 1) % n],
                prev: ids[(k + n - 1) % n],
                twin: None,
                face,
            });
            let vert = &mut self.vertices[v.0];
            if vert.leaving.is_none() {
                vert.leaving = Some(ids[k]);
            }
        }
        self.faces.push(Face { edge: ids[0] });
        Ok((ids, face))
    }

    /// Pair every half-edge in `edges` with the one whose endpoints are reversed.
    ///
    /// Complexity: O(n²). Fine at construction scale; keep out of hot paths.
    pub fn set_twins(&mut self, edges: &[HalfEdgeId]) -> Result<(), TopologyError> {
        for &e in edges {
            if self.twin(e).is_some() {
                continue;
            }
            let (s, d) = (self.src(e), self.dst(e));
            let Some(&partner) = edges
                .iter()
                .find(|&&c| self.src(c) == d && self.dst(c) == s)
            else {
                continue;
            };
            self.edge_mut(e).twin = Some(partner);
            if self.twin(partner).is_none() {
                self.edge_mut(partner).twin = Some(e);
            }
            if self.twin(partner) != Some(e) {
                return Err(TopologyError::NonInvolutiveTwin {
                    edge: e,
                    twin: partner,
                });
            }
        }
        Ok(())
    }

    /// Disjoint union: move all records of `other` into `self`.
    ///
    /// Handles into `other` stay valid after translating them with the returned shift.
    pub fn absorb(&mut self, other: Dcel) -> IdShift {
        let shift = IdShift {
            vertices: self.vertices.len(),
            edges: self.edges.len(),
            faces: self.faces.len(),
        };
        self.vertices.extend(other.vertices.into_iter().map(|mut v| {
            v.leaving = v.leaving.map(|e| shift.edge(e));
            v
        }));
        self.edges.extend(other.edges.into_iter().map(|e| HalfEdge {
            src: shift.vertex(e.src),
            next: shift.edge(e.next),
            prev: shift.edge(e.prev),
            twin: e.twin.map(|t| shift.edge(t)),
            face: shift.face(e.face),
        }));
        self.faces.extend(other.faces.into_iter().map(|f| Face {
            edge: shift.edge(f.edge),
        }));
        shift
    }
}

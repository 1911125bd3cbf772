//! In-place surgery: boundary gluing and orientation reversal.
//!
//! Both operations mutate the mesh; callers must not share it while they run.

use std::collections::BTreeSet;

use super::error::TopologyError;
use super::types::{Dcel, HalfEdgeId, VertexId};

impl Dcel {
    /// Redirect every half-edge leaving `kill` so that it leaves `keep` instead.
    ///
    /// Assumes `next`/`prev`/`twin` already describe the merged fan. `kill`
    /// itself is not removed here.
    pub fn coalesce_vertices(&mut self, keep: VertexId, kill: VertexId) {
        for e in self.star(kill) {
            self.edge_mut(e).src = keep;
        }
    }

    /// Weld two boundary walks together.
    ///
    /// Starting with `ea` glued to `eb`, walks forward along the boundary of
    /// `ea` and backward along the boundary of `eb` in lock-step. Stops when
    /// either walk reaches `stop` (never glued), or, without `stop`, when it
    /// returns to its start. Each matched pair becomes a twin pair and its
    /// vertices are coalesced; vertices of the `eb` walk are discarded.
    pub fn glue_boundary(
        &mut self,
        ea: HalfEdgeId,
        eb: HalfEdgeId,
        stop: Option<HalfEdgeId>,
    ) -> Result<(), TopologyError> {
        if stop == Some(ea) || stop == Some(eb) {
            return Ok(());
        }
        let mut walk_a = vec![ea];
        let mut walk_b = vec![eb];
        let mut na = self.boundary_next(ea).ok_or(TopologyError::OpenBoundaryWalk(ea))?;
        let mut nb = self.boundary_prev(eb).ok_or(TopologyError::OpenBoundaryWalk(eb))?;
        while Some(na) != stop && na != ea && Some(nb) != stop && nb != eb {
            if walk_a.len() > self.num_edges() {
                return Err(TopologyError::UnclosedWalk(ea));
            }
            walk_a.push(na);
            walk_b.push(nb);
            na = self.boundary_next(na).ok_or(TopologyError::OpenBoundaryWalk(na))?;
            nb = self.boundary_prev(nb).ok_or(TopologyError::OpenBoundaryWalk(nb))?;
        }

        let mut dead: BTreeSet<VertexId> = BTreeSet::new();
        for &cb in &walk_b {
            dead.insert(self.src(cb));
            dead.insert(self.dst(cb));
        }

        for (&ca, &cb) in walk_a.iter().zip(&walk_b) {
            let (keep, kill) = (self.src(ca), self.dst(cb));
            self.coalesce_vertices(keep, kill);
            self.edge_mut(ca).twin = Some(cb);
            self.edge_mut(cb).twin = Some(ca);
        }
        // The walks glue one more vertex pair than edge pairs.
        let (last_a, last_b) = (walk_a[walk_a.len() - 1], walk_b[walk_b.len() - 1]);
        let (keep, kill) = (self.dst(last_a), self.src(last_b));
        self.coalesce_vertices(keep, kill);

        for v in &dead {
            self.vertices[v.0].removed = true;
        }
        tracing::trace!(
            pairs = walk_a.len(),
            discarded = dead.len(),
            "glued boundary walks"
        );

        for e in self.edge_ids() {
            let v = self.src(e);
            if !self.is_live(v) {
                return Err(TopologyError::DanglingVertex { edge: e, vertex: v });
            }
        }
        Ok(())
    }

    /// Reverse the orientation of every face.
    ///
    /// `leaving` pointers are rewound one step so they keep their vertex as
    /// source; sources are recomputed from the destinations read before any
    /// `next`/`prev` swap.
    pub fn reverse_orientation(&mut self) {
        for k in 0..self.vertices.len() {
            if self.vertices[k].removed {
                continue;
            }
            if let Some(l) = self.vertices[k].leaving {
                let rewound = self.prev(l);
                self.vertices[k].leaving = Some(rewound);
            }
        }
        let destinations: Vec<VertexId> = self
            .edge_ids()
            .map(|e| self.dst_including_boundary(e))
            .collect();
        for (he, dst) in self.edges.iter_mut().zip(destinations) {
            std::mem::swap(&mut he.next, &mut he.prev);
            he.src = dst;
        }
    }

    fn dst_including_boundary(&self, e: HalfEdgeId) -> VertexId {
        if self.twin(e).is_some() {
            return self.dst(e);
        }
        match self.boundary_next(e) {
            Some(b) => self.src(b),
            None => self.dst(e),
        }
    }
}

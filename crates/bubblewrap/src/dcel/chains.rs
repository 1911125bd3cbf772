//! Elementary moves between marked triangles and breadth-first chain enumeration.

use std::collections::HashSet;

use super::types::{Dcel, HalfEdgeId};

/// Edge chain: a path of half-edges, consecutive entries one elementary move apart.
pub type Chain = Vec<HalfEdgeId>;

/// The four elementary moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    TriCcw,
    TriCw,
    VertCcw,
    VertCw,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::TriCcw, Move::TriCw, Move::VertCcw, Move::VertCw];

    /// Target of the move, or `None` if it would cross the boundary.
    #[inline]
    pub fn apply(self, d: &Dcel, e: HalfEdgeId) -> Option<HalfEdgeId> {
        match self {
            Move::TriCcw => Some(d.tri_ccw(e)),
            Move::TriCw => Some(d.tri_cw(e)),
            Move::VertCcw => d.vert_ccw(e),
            Move::VertCw => d.vert_cw(e),
        }
    }
}

/// All chains from `start` found by frontier expansion over `moves`.
///
/// Each half-edge is reached at most once (dedup on the terminal element),
/// so the result holds exactly one chain per reachable half-edge, including
/// the trivial chain `[start]`. Chains come out in breadth-first order.
pub fn edge_chain_dfs(d: &Dcel, start: HalfEdgeId, moves: &[Move]) -> Vec<Chain> {
    let mut reached: HashSet<HalfEdgeId> = HashSet::from([start]);
    let mut interior: Vec<Chain> = Vec::new();
    let mut frontier: Vec<Chain> = vec![vec![start]];
    while !frontier.is_empty() {
        let mut new_frontier = Vec::new();
        for ch in &frontier {
            let e = ch[ch.len() - 1];
            for m in moves {
                if let Some(target) = m.apply(d, e) {
                    if reached.insert(target) {
                        let mut longer = ch.clone();
                        longer.push(target);
                        new_frontier.push(longer);
                    }
                }
            }
        }
        interior.append(&mut frontier);
        frontier = new_frontier;
    }
    interior
}

//! Holonomy generator chains on surfaces built from triangulated cylinders.
//!
//! On a cylinder made of rings (see `triangulations`), three elementary moves
//! carry a marked top edge one square down, up, left or right. Repeating a
//! step until the chain returns to its start gives a closed loop whose
//! holonomy is a generator of the surface group.

use std::collections::BTreeMap;

use super::error::CocycleError;
use crate::dcel::{edge_chain_dfs, Chain, Dcel, HalfEdgeId, Move};

/// One square of motion on a ring-built cylinder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CylinderStep {
    Down,
    Up,
    Left,
    Right,
}

impl CylinderStep {
    pub const fn moves(self) -> [Move; 3] {
        match self {
            CylinderStep::Down => [Move::TriCw, Move::VertCcw, Move::VertCcw],
            CylinderStep::Up => [Move::VertCw, Move::VertCw, Move::TriCcw],
            CylinderStep::Left => [Move::TriCcw, Move::VertCw, Move::VertCw],
            CylinderStep::Right => [Move::VertCcw, Move::VertCcw, Move::TriCw],
        }
    }
}

/// Append the targets of `moves`, applied one after another from the end of `chain`.
pub fn extend_chain(d: &Dcel, chain: &mut Chain, moves: &[Move]) -> Result<(), CocycleError> {
    for m in moves {
        let Some(&e) = chain.last() else {
            return Ok(());
        };
        let next = m.apply(d, e).ok_or(CocycleError::BlockedMove(e))?;
        chain.push(next);
    }
    Ok(())
}

/// Repeat `step` from `start` until the chain comes back to `start`.
pub fn closed_chain(d: &Dcel, start: HalfEdgeId, step: CylinderStep) -> Result<Chain, CocycleError> {
    let mut chain = vec![start];
    let moves = step.moves();
    for _ in 0..d.num_edges() {
        extend_chain(d, &mut chain, &moves)?;
        if chain.last() == Some(&start) {
            return Ok(chain);
        }
    }
    Err(CocycleError::OpenChain(start))
}

/// A shortest chain from `from` to `to` over all four moves.
pub fn connecting_chain(d: &Dcel, from: HalfEdgeId, to: HalfEdgeId) -> Result<Chain, CocycleError> {
    edge_chain_dfs(d, from, &Move::ALL)
        .into_iter()
        .find(|ch| ch.last() == Some(&to))
        .ok_or(CocycleError::Unreachable { from, to })
}

/// Loop `stem · loop · stem⁻¹`, where `stem` is `path` without its final
/// half-edge and `loop` starts and ends there.
pub fn conjugate_loop(path: &[HalfEdgeId], loop_chain: &[HalfEdgeId]) -> Chain {
    let stem = &path[..path.len().saturating_sub(1)];
    let mut out = Vec::with_capacity(2 * stem.len() + loop_chain.len());
    out.extend_from_slice(stem);
    out.extend_from_slice(loop_chain);
    out.extend(stem.iter().rev());
    out
}

/// Generators `a` (rightward loop) and `b` (upward loop) of a torus marked at `t`.
pub fn torus_generators(d: &Dcel, t: HalfEdgeId) -> Result<BTreeMap<String, Chain>, CocycleError> {
    Ok(BTreeMap::from([
        ("a".to_string(), closed_chain(d, t, CylinderStep::Right)?),
        ("b".to_string(), closed_chain(d, t, CylinderStep::Up)?),
    ]))
}

/// Generators `a1`, `b1`, `a2`, `b2` of the genus-two double marked at `t1`, `t2`.
///
/// `a1`/`b1` loop right/up from `t1`. `a2`/`b2` loop left/down from `t2`
/// (whose handle is reversed) and are conjugated back to `t1` along a
/// shortest connecting chain, so all four are based at `t1`.
pub fn genus_two_generators(
    d: &Dcel,
    t1: HalfEdgeId,
    t2: HalfEdgeId,
) -> Result<BTreeMap<String, Chain>, CocycleError> {
    let path = connecting_chain(d, t1, t2)?;
    let a2 = closed_chain(d, t2, CylinderStep::Left)?;
    let b2 = closed_chain(d, t2, CylinderStep::Down)?;
    Ok(BTreeMap::from([
        ("a1".to_string(), closed_chain(d, t1, CylinderStep::Right)?),
        ("b1".to_string(), closed_chain(d, t1, CylinderStep::Up)?),
        ("a2".to_string(), conjugate_loop(&path, &a2)),
        ("b2".to_string(), conjugate_loop(&path, &b2)),
    ]))
}

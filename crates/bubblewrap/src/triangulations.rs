//! Triangulated surfaces built from rings of triangles.
//!
//! Purpose
//! - Provide the standard test and experiment surfaces: annuli, cylinders,
//!   twisted tori, pinched cylinders (one-holed tori), and the genus-two
//!   double.
//!
//! Conventions
//! - A ring of circumference `w` has a top row `00..0(w-1)` and a bottom row
//!   `10..1(w-1)`; square `i` is cut by the diagonal from top `i` down to
//!   bottom `i+1`:
//!
//!   ```text
//!   00---01---02---03
//!   |\   |\   |\   |
//!   | \  | \  | \  |
//!   |  \ |  \ |  \ |
//!   10---11---12---13
//!   ```
//! - Every builder returns the top half-edge `T` (from `01` to `00`) and the
//!   bottom half-edge `B` directly below it (from `10` to `11`), both on the
//!   boundary, as handles for gluing and for generator chains.

use crate::dcel::{Dcel, HalfEdgeId, TopologyError};

/// One-row triangulated annulus of circumference `w`; returns `(mesh, T, B)`.
pub fn ring(w: usize) -> Result<(Dcel, HalfEdgeId, HalfEdgeId), TopologyError> {
    if w < 3 {
        return Err(TopologyError::Degenerate("ring needs circumference at least 3"));
    }
    let mut d = Dcel::new();
    let top: Vec<_> = (0..w).map(|_| d.add_vertex()).collect();
    let bot: Vec<_> = (0..w).map(|_| d.add_vertex()).collect();
    let mut all = Vec::with_capacity(6 * w);
    let mut etop = None;
    let mut ebot = None;
    for i in 0..w {
        let j = (i + 1) % w;
        let (es, _) = d.face_from_vertex_chain(&[bot[j], top[j], top[i]])?;
        if i == 0 {
            etop = es
                .iter()
                .copied()
                .find(|&e| d.src(e) == top[1 % w] && d.dst(e) == top[0]);
        }
        all.extend(es);
    }
    for i in 0..w {
        let j = (i + 1) % w;
        let (es, _) = d.face_from_vertex_chain(&[top[i], bot[i], bot[j]])?;
        if i == 0 {
            ebot = es
                .iter()
                .copied()
                .find(|&e| d.src(e) == bot[0] && d.dst(e) == bot[1 % w]);
        }
        all.extend(es);
    }
    d.set_twins(&all)?;
    let (Some(t), Some(b)) = (etop, ebot) else {
        return Err(TopologyError::Degenerate("ring boundary handles not found"));
    };
    Ok((d, t, b))
}

/// Cylinder of circumference `w` and height `h`: `h` rings glued top-to-bottom.
///
/// Returns the mesh, the top half-edge of the first ring and the bottom
/// half-edge of the last ring.
pub fn cylinder(w: usize, h: usize) -> Result<(Dcel, HalfEdgeId, HalfEdgeId), TopologyError> {
    if h == 0 {
        return Err(TopologyError::Degenerate("cylinder needs height at least 1"));
    }
    let mut d = Dcel::new();
    let mut tops = Vec::with_capacity(h);
    let mut bottoms = Vec::with_capacity(h);
    for _ in 0..h {
        let (r, t, b) = ring(w)?;
        let shift = d.absorb(r);
        tops.push(shift.edge(t));
        bottoms.push(shift.edge(b));
    }
    for i in 0..tops.len() - 1 {
        d.glue_boundary(bottoms[i], tops[i + 1], None)?;
    }
    Ok((d, tops[0], bottoms[bottoms.len() - 1]))
}

/// Closed torus from a `w × h` cylinder.
///
/// The top circle is glued all the way round onto the bottom circle, with
/// `T` landing on `B.boundary_forward(twist)`. Returns the mesh and `T`.
pub fn torus(w: usize, h: usize, twist: usize) -> Result<(Dcel, HalfEdgeId), TopologyError> {
    let (mut d, t, b) = cylinder(w, h)?;
    let shifted = d
        .boundary_forward(b, twist)
        .ok_or(TopologyError::OpenBoundaryWalk(b))?;
    d.glue_boundary(t, shifted, None)?;
    Ok((d, t))
}

/// Cylinder whose boundary circles are glued along `k` edges only, starting
/// at `T` over `B`.
///
/// The result has genus one and a single boundary circle of length
/// `2w - 2k`. Returns the mesh, `T`, and `T.boundary_forward(k)`, the first
/// half-edge left on the boundary.
pub fn pinched_cylinder(
    w: usize,
    h: usize,
    k: usize,
) -> Result<(Dcel, HalfEdgeId, HalfEdgeId), TopologyError> {
    let (mut d, t, b) = cylinder(w, h)?;
    let stop = d
        .boundary_forward(t, k)
        .ok_or(TopologyError::OpenBoundaryWalk(t))?;
    d.glue_boundary(t, b, Some(stop))?;
    Ok((d, t, stop))
}

/// One-holed torus: [`pinched_cylinder`] glued along a single edge.
pub fn one_holed_torus(
    w: usize,
    h: usize,
) -> Result<(Dcel, HalfEdgeId, HalfEdgeId), TopologyError> {
    pinched_cylinder(w, h, 1)
}

/// Handles into the genus-two double.
#[derive(Clone, Copy, Debug)]
pub struct GenusTwo {
    /// Top half-edge of the first one-holed torus.
    pub t1: HalfEdgeId,
    /// Top half-edge of the second (orientation-reversed) one-holed torus.
    pub t2: HalfEdgeId,
}

/// Closed genus-two surface: two one-holed tori, the second reversed, glued
/// along their boundary circles.
pub fn genus_two(w: usize, h: usize) -> Result<(Dcel, GenusTwo), TopologyError> {
    let (mut d, t1, t1stop) = one_holed_torus(w, h)?;
    let (mut d2, t2, t2stop) = one_holed_torus(w, h)?;
    d2.reverse_orientation();
    let shift = d.absorb(d2);
    d.glue_boundary(t1stop, shift.edge(t2stop), None)?;
    Ok((
        d,
        GenusTwo {
            t1,
            t2: shift.edge(t2),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dcel::{oriented_manifold_type, valence_histogram};

    #[test]
    fn ring_is_annulus_with_two_boundary_circles() {
        let (d, t, b) = ring(5).unwrap();
        assert_eq!(d.num_vertices(), 10);
        assert_eq!(d.num_faces(), 10);
        let topo = oriented_manifold_type(&d).unwrap();
        assert_eq!(topo.genus, 0);
        assert_eq!(topo.chi, 0);
        assert_eq!(topo.num_boundary, 2);
        assert_eq!(topo.boundary_lengths, vec![5, 5]);
        assert!(d.is_boundary(t) && d.is_boundary(b));
        // B sits directly below T: both touch the square between columns 0 and 1.
        assert_eq!(d.boundary_forward(t, 5), Some(t));
    }

    #[test]
    fn degenerate_sizes_are_rejected() {
        for w in 0..3 {
            assert!(matches!(ring(w), Err(TopologyError::Degenerate(_))), "ring({w})");
        }
        assert!(matches!(cylinder(5, 0), Err(TopologyError::Degenerate(_))));
        assert!(matches!(torus(2, 3, 0), Err(TopologyError::Degenerate(_))));
        assert_eq!(cylinder(3, 1).unwrap().0.num_faces(), 6);
    }

    #[test]
    fn cylinder_counts() {
        let (d, t, b) = cylinder(5, 4).unwrap();
        assert_eq!(d.num_vertices(), 5 * 5);
        assert_eq!(d.num_faces(), 2 * 5 * 4);
        let topo = oriented_manifold_type(&d).unwrap();
        assert_eq!((topo.genus, topo.num_boundary), (0, 2));
        assert!(d.is_boundary(t) && d.is_boundary(b));
    }

    #[test]
    fn twisted_torus_is_closed_genus_one_all_valence_six() {
        for twist in 0..3 {
            let (d, t) = torus(5, 5, twist).unwrap();
            let topo = oriented_manifold_type(&d).unwrap();
            assert_eq!(topo.genus, 1);
            assert_eq!(topo.chi, 0);
            assert_eq!(topo.num_boundary, 0);
            assert!(!d.is_boundary(t));
            let hist = valence_histogram(&d);
            assert_eq!(hist.get(&6), Some(&25));
            assert_eq!(hist.len(), 1);
        }
    }

    #[test]
    fn one_holed_torus_has_one_boundary_circle() {
        let (d, _t, stop) = one_holed_torus(5, 5).unwrap();
        let topo = oriented_manifold_type(&d).unwrap();
        assert_eq!(topo.genus, 1);
        assert_eq!(topo.num_boundary, 1);
        assert_eq!(topo.boundary_lengths, vec![8]);
        assert!(d.is_boundary(stop));
    }

    #[test]
    fn pinched_along_two_edges() {
        let (d, _t, stop) = pinched_cylinder(5, 5, 2).unwrap();
        let topo = oriented_manifold_type(&d).unwrap();
        assert_eq!((topo.genus, topo.chi), (1, -1));
        assert_eq!(topo.boundary_lengths, vec![6]);
        assert!(d.is_boundary(stop));
        let hist = valence_histogram(&d);
        assert_eq!(hist.get(&6), Some(&23));
        assert_eq!(hist.get(&3), Some(&4));
    }

    #[test]
    fn genus_two_double() {
        let (d, g) = genus_two(5, 5).unwrap();
        let topo = oriented_manifold_type(&d).unwrap();
        assert_eq!(topo.genus, 2);
        assert_eq!(topo.chi, -2);
        assert_eq!(topo.num_boundary, 0);
        assert!(!d.is_boundary(g.t1) && !d.is_boundary(g.t2));
        let hist = valence_histogram(&d);
        assert_eq!(hist.get(&6), Some(&46));
        assert_eq!(hist.get(&12), Some(&2));
    }
}

use super::*;
use crate::triangulations::{cylinder, genus_two, one_holed_torus, ring, torus};
use proptest::prelude::*;

fn assert_invariants(d: &Dcel) {
    for e in d.edge_ids() {
        assert_eq!(d.prev(d.next(e)), e, "next.prev at {e:?}");
        assert_eq!(d.next(d.prev(e)), e, "prev.next at {e:?}");
        if let Some(t) = d.twin(e) {
            assert_eq!(d.twin(t), Some(e), "twin involution at {e:?}");
            assert_eq!(d.src(t), d.dst(e));
        }
        assert!(d.is_live(d.src(e)), "dangling src at {e:?}");
    }
    for v in d.vertex_ids() {
        let l = d.vertex(v).leaving.expect("live vertex without leaving");
        assert_eq!(d.src(l), v);
    }
    for f in d.face_ids() {
        assert_eq!(d.face_num_edges(f), 3);
        assert_eq!(d.edge(d.face(f).edge).face, f);
    }
}

#[test]
fn single_triangle_is_a_disc() {
    let mut d = Dcel::new();
    let vs: Vec<_> = (0..3).map(|_| d.add_vertex()).collect();
    let (es, f) = d.face_from_vertex_chain(&vs).unwrap();
    d.set_twins(&es).unwrap();
    assert_eq!(d.face(f).edge, es[0]);
    assert!(es.iter().all(|&e| d.is_boundary(e)));
    assert_eq!(d.boundary_next(es[0]), Some(es[1]));
    assert_eq!(d.boundary_prev(es[0]), Some(es[2]));
    let topo = oriented_manifold_type(&d).unwrap();
    assert_eq!((topo.genus, topo.chi, topo.num_boundary), (0, 1, 1));
    assert_eq!(topo.boundary_lengths, vec![3]);
    for &v in &vs {
        assert_eq!(d.valence(v), 1);
        assert!(!d.is_interior(v));
    }
}

#[test]
fn short_vertex_chains_are_rejected() {
    let mut d = Dcel::new();
    let vs: Vec<_> = (0..2).map(|_| d.add_vertex()).collect();
    for chain in [&vs[..0], &vs[..1], &vs[..]] {
        assert!(matches!(
            d.face_from_vertex_chain(chain),
            Err(TopologyError::Degenerate(_))
        ));
    }
    assert_eq!(d.num_edges(), 0);
    assert_eq!(d.num_faces(), 0);
}

#[test]
fn set_twins_rejects_duplicate_edges() {
    // Two faces both containing the half-edge 0 -> 1 and one containing 1 -> 0.
    let mut d = Dcel::new();
    let vs: Vec<_> = (0..4).map(|_| d.add_vertex()).collect();
    let (mut all, _) = d.face_from_vertex_chain(&[vs[0], vs[1], vs[2]]).unwrap();
    let (b, _) = d.face_from_vertex_chain(&[vs[0], vs[1], vs[3]]).unwrap();
    let (c, _) = d.face_from_vertex_chain(&[vs[1], vs[0], vs[3]]).unwrap();
    all.extend(b);
    all.extend(c);
    let err = d.set_twins(&all).unwrap_err();
    assert!(matches!(err, TopologyError::NonInvolutiveTwin { .. }));
}

#[test]
fn ring_invariants_and_stars() {
    let (d, _, _) = ring(6).unwrap();
    assert_invariants(&d);
    // Every ring vertex is on the boundary and meets three faces.
    for v in d.vertex_ids() {
        assert!(!d.is_interior(v));
        assert_eq!(d.valence(v), 3);
        let star = d.star(v);
        assert!(d.is_boundary(star[0]), "star starts at the boundary");
        let last = star[star.len() - 1];
        assert_eq!(d.vert_ccw(last), None);
    }
}

#[test]
fn interior_star_closes_up() {
    let (d, _) = torus(5, 3, 0).unwrap();
    for v in d.vertex_ids() {
        assert!(d.is_interior(v));
        let s = d.interior_star(v);
        assert_eq!(s.len(), 6);
        assert_eq!(s[0], d.vertex(v).leaving.unwrap());
        assert_eq!(d.vert_ccw(s[s.len() - 1]), Some(s[0]));
        assert!(s.iter().all(|&e| d.src(e) == v));
    }
}

#[test]
fn boundary_walks_invert_each_other() {
    let (d, t, b) = cylinder(4, 3).unwrap();
    for e in [t, b] {
        for k in 0..6 {
            let f = d.boundary_forward(e, k).unwrap();
            assert_eq!(d.boundary_backward(f, k), Some(e));
        }
        assert_eq!(d.boundary_forward(e, 4), Some(e));
    }
}

#[test]
fn boundary_next_is_none_on_closed_surface() {
    let (d, t) = torus(4, 2, 1).unwrap();
    assert!(!d.is_boundary(t));
    assert!(manifold_boundary_components(&d).unwrap().is_empty());
}

#[test]
fn absorb_shifts_handles() {
    let (mut d, t, _) = ring(3).unwrap();
    let (r, t2, b2) = ring(4).unwrap();
    let shift = d.absorb(r);
    assert_eq!(shift.vertices, 6);
    assert_eq!(shift.edges, 18);
    assert_eq!(shift.faces, 6);
    assert_invariants(&d);
    assert!(d.is_boundary(t) && d.is_boundary(shift.edge(t2)));
    assert_eq!(d.boundary_forward(shift.edge(b2), 4), Some(shift.edge(b2)));
    let topo = manifold_boundary_components(&d).unwrap();
    assert_eq!(topo.len(), 4);
}

#[test]
fn gluing_discards_vertices_and_keeps_edges() {
    let (mut d, t, b) = cylinder(5, 2).unwrap();
    let (ne, nf) = (d.num_edges(), d.num_faces());
    d.glue_boundary(t, b, None).unwrap();
    assert_eq!(d.num_vertices(), 10);
    assert_eq!((d.num_edges(), d.num_faces()), (ne, nf));
    assert_eq!(d.twin(t), Some(b));
    assert_invariants(&d);
}

#[test]
fn glue_with_stop_at_start_is_a_no_op() {
    let (mut d, t, b) = cylinder(5, 1).unwrap();
    d.glue_boundary(t, b, Some(t)).unwrap();
    assert!(d.is_boundary(t) && d.is_boundary(b));
    assert_eq!(d.num_vertices(), 10);
}

#[test]
fn reverse_orientation_keeps_invariants_and_type() {
    let (mut d, _, stop) = one_holed_torus(5, 4).unwrap();
    let before = oriented_manifold_type(&d).unwrap();
    let hist = valence_histogram(&d);
    d.reverse_orientation();
    assert_invariants(&d);
    assert_eq!(oriented_manifold_type(&d).unwrap(), before);
    assert_eq!(valence_histogram(&d), hist);
    assert!(d.is_boundary(stop));
}

#[test]
fn reverse_orientation_twice_restores_the_mesh() {
    let (d0, _, _) = cylinder(4, 2).unwrap();
    let mut d = d0.clone();
    d.reverse_orientation();
    d.reverse_orientation();
    for e in d.edge_ids() {
        assert_eq!(d.edge(e), d0.edge(e));
    }
}

#[test]
fn doubling_matches_valence_histograms() {
    // Same orientation and reversed orientation give identical statistics.
    let (a, _, _) = one_holed_torus(5, 5).unwrap();
    let (mut b, _, _) = one_holed_torus(5, 5).unwrap();
    b.reverse_orientation();
    assert_eq!(valence_histogram(&a), valence_histogram(&b));

    let (d, _) = genus_two(5, 5).unwrap();
    assert_invariants(&d);
    let topo = oriented_manifold_type(&d).unwrap();
    assert_eq!(topo.genus, 2);
    assert_eq!(d.num_vertices(), 48);
}

#[test]
fn chain_enumeration_reaches_every_half_edge_once() {
    let (d, t) = torus(4, 3, 0).unwrap();
    let chains = edge_chain_dfs(&d, t, &Move::ALL);
    assert_eq!(chains.len(), d.num_edges());
    assert_eq!(chains[0], vec![t]);
    let mut ends: Vec<_> = chains.iter().map(|c| c[c.len() - 1]).collect();
    ends.sort();
    ends.dedup();
    assert_eq!(ends.len(), d.num_edges());
    for ch in &chains {
        assert_eq!(ch[0], t);
        for w in ch.windows(2) {
            assert!(
                Move::ALL.iter().any(|m| m.apply(&d, w[0]) == Some(w[1])),
                "{:?} -> {:?} is not one move",
                w[0],
                w[1]
            );
        }
    }
    // Breadth-first: chain lengths never decrease.
    assert!(chains.windows(2).all(|w| w[0].len() <= w[1].len()));
}

#[test]
fn chain_enumeration_with_triangle_moves_stays_in_face() {
    let (d, t) = torus(4, 3, 0).unwrap();
    let chains = edge_chain_dfs(&d, t, &[Move::TriCcw, Move::TriCw]);
    assert_eq!(chains.len(), 3);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn cylinders_are_annuli(w in 3usize..9, h in 1usize..6) {
        let (d, _, _) = cylinder(w, h).unwrap();
        assert_invariants(&d);
        let topo = oriented_manifold_type(&d).unwrap();
        prop_assert_eq!(topo.genus, 0);
        prop_assert_eq!(topo.chi, 0);
        prop_assert_eq!(topo.boundary_lengths, vec![w, w]);
        prop_assert_eq!(d.num_vertices(), w * (h + 1));
        prop_assert_eq!(d.num_faces(), 2 * w * h);
    }

    #[test]
    fn tori_are_closed(w in 3usize..8, h in 1usize..5, twist in 0usize..4) {
        let (d, _) = torus(w, h, twist).unwrap();
        assert_invariants(&d);
        let topo = oriented_manifold_type(&d).unwrap();
        prop_assert_eq!((topo.genus, topo.num_boundary), (1, 0));
        prop_assert_eq!(valence_histogram(&d).get(&6).copied(), Some(w * h));
    }
}

use super::cell::chord;
use super::*;
use crate::geom2::rand::{scatter_regions, ScatterCfg};
use crate::geom2::{convex_hull, segments_cross, ConvexPolygon, Rect, VertexArena};
use proptest::prelude::*;

fn v(x: f64, y: f64) -> Vec2 {
    Vec2::new(x, y)
}

fn hull(arena: &mut VertexArena, coords: &[(f64, f64)]) -> ConvexPolygon {
    convex_hull(&arena.points(coords)).unwrap()
}

fn vertices(polys: &[ConvexPolygon]) -> Vec<Vec2> {
    polys.iter().flat_map(|p| p.positions()).collect()
}

fn index_of(kind: PartitionKind, polys: &[ConvexPolygon]) -> PartitionIndex {
    let mut idx = PartitionIndex::build(kind, &vertices(polys));
    for (k, p) in polys.iter().enumerate() {
        idx.insert_polygon(p, RegionId(k as u32));
    }
    idx
}

#[test]
fn kd_median_lands_at_root() {
    let pts = [v(400.0, 400.0), v(200.0, 200.0), v(100.0, 300.0)];
    let tree = PartitionTree::build(&pts, AxisSplit);
    assert_eq!(tree.pivot(&[]), Some(v(200.0, 200.0)));
    assert_eq!(tree.pivot(&[Branch::Low]), Some(v(100.0, 300.0)));
    assert_eq!(tree.pivot(&[Branch::High]), Some(v(400.0, 400.0)));
    assert_eq!(tree.pivot(&[Branch::Low, Branch::Low]), None);
    assert_eq!(tree.node_count(), 3);
    assert_eq!(tree.depth(), 2);
}

#[test]
fn empty_tree_answers_nothing() {
    let mut arena = VertexArena::new();
    let p = arena.point(0.0, 0.0);
    let q = arena.point(1.0, 1.0);
    let tree = PartitionTree::build(&[], ConjugateSplit);
    assert!(!tree.intersects(&p, &q));
    assert!(tree.is_empty());
    assert_eq!(tree.depth(), 0);
}

#[test]
fn crossing_bridge_is_reported_for_both_variants() {
    for kind in [PartitionKind::AxisSplit, PartitionKind::Conjugate] {
        let mut arena = VertexArena::new();
        let a = hull(&mut arena, &[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
        let wall = hull(&mut arena, &[(4.0, -1.0), (5.0, -1.0), (5.0, 5.0), (4.0, 5.0)]);
        let b = hull(&mut arena, &[(7.0, 0.0), (9.0, 0.0), (9.0, 2.0), (7.0, 2.0)]);
        let idx = index_of(kind, &[a.clone(), wall, b.clone()]);
        assert_eq!(idx.len(), 12);
        let (p, q) = (a.vertex(1), b.vertex(0));
        assert!(idx.intersects(&p, &q), "{kind:?}");
        assert!(idx.intersects(&q, &p), "{kind:?}");
        // The wall is the only obstacle.
        assert!(!idx.intersects_except(&p, &q, &[RegionId(1)]), "{kind:?}");
    }
}

#[test]
fn shared_endpoint_and_coincident_segments_do_not_cross() {
    let mut arena = VertexArena::new();
    let a = hull(&mut arena, &[(0.0, 0.0), (3.0, 0.0), (3.0, 3.0), (0.0, 3.0)]);
    let idx = index_of(PartitionKind::AxisSplit, &[a.clone()]);
    // Every edge against the index: coincident with itself, touching its neighbours.
    for (p, q) in a.edges() {
        assert!(!idx.intersects(&p, &q));
    }
    // Diagonal touches corners only.
    assert!(!idx.intersects(&a.vertex(0), &a.vertex(2)));
    // A segment leaving from a vertex through the far edge does cross.
    let out = arena.point(6.0, 1.0);
    let inside = arena.point(1.0, 1.0);
    assert!(idx.intersects(&inside, &out));
    assert!(!idx.intersects(&a.vertex(1), &out));
}

#[test]
fn removal_is_by_identity() {
    let mut arena = VertexArena::new();
    let a = hull(&mut arena, &[(0.0, 0.0), (2.0, 0.0), (1.0, 2.0)]);
    let b = hull(&mut arena, &[(5.0, 0.0), (7.0, 0.0), (6.0, 2.0)]);
    let mut idx = index_of(PartitionKind::Conjugate, &[a.clone(), b.clone()]);
    // Same coordinates, different vertices: nothing to remove.
    let twin = arena.points(&[(0.0, 0.0), (2.0, 0.0)]);
    assert!(!idx.remove_segment(&twin[0], &twin[1]));
    assert!(idx.remove_segment(&a.vertex(1), &a.vertex(0)));
    assert!(!idx.remove_segment(&a.vertex(0), &a.vertex(1)));
    assert_eq!(idx.remove_polygon(&a), 2);
    assert_eq!(idx.len(), 3);
    let probe = arena.points(&[(1.0, -1.0), (1.0, 3.0)]);
    assert!(!idx.intersects(&probe[0], &probe[1]));
    assert_eq!(idx.remove_polygon(&b), 3);
    assert!(idx.is_empty());
}

#[test]
fn straddling_segment_stays_at_the_cutting_node() {
    let pts = [v(0.0, 0.0), v(10.0, 0.0), v(5.0, 5.0)];
    let mut tree = PartitionTree::build(&pts, AxisSplit);
    let mut arena = VertexArena::new();
    let s = arena.points(&[(1.0, 1.0), (9.0, 1.0)]);
    tree.insert_segment(Segment::new(s[0], s[1], RegionId(0)));
    let q = arena.points(&[(2.0, -1.0), (2.0, 3.0)]);
    assert!(tree.intersects(&q[0], &q[1]));
    assert!(tree.remove_segment(&s[1], &s[0]));
    assert!(!tree.intersects(&q[0], &q[1]));
}

fn brute_force(polys: &[ConvexPolygon], p: &Point, q: &Point) -> bool {
    polys
        .iter()
        .flat_map(|poly| poly.edges())
        .any(|(a, b)| segments_cross(p, q, &a, &b))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn index_agrees_with_brute_force(seed in any::<u64>(), picks in prop::collection::vec((any::<prop::sample::Index>(), any::<prop::sample::Index>()), 1..24)) {
        let mut arena = VertexArena::new();
        let cfg = ScatterCfg { cols: 3, rows: 3, ..ScatterCfg::default() };
        let polys = scatter_regions(&mut arena, Rect::new(0.0, 0.0, 600.0, 600.0), cfg, seed);
        prop_assume!(polys.len() >= 2);
        let all: Vec<Point> = polys.iter().flat_map(|p| p.points().to_vec()).collect();
        let axis = index_of(PartitionKind::AxisSplit, &polys);
        let conj = index_of(PartitionKind::Conjugate, &polys);
        for (i, j) in picks {
            let (p, q) = (all[i.index(all.len())], all[j.index(all.len())]);
            if p.id == q.id {
                continue;
            }
            let expected = brute_force(&polys, &p, &q);
            prop_assert_eq!(axis.intersects(&p, &q), expected);
            prop_assert_eq!(conj.intersects(&p, &q), expected);
            prop_assert_eq!(axis.intersects(&q, &p), axis.intersects(&p, &q));
            prop_assert_eq!(conj.intersects(&q, &p), conj.intersects(&p, &q));
        }
    }

    #[test]
    fn conjugate_tree_splits_every_point_once(seed in any::<u64>()) {
        let mut arena = VertexArena::new();
        let polys = scatter_regions(&mut arena, Rect::new(0.0, 0.0, 400.0, 400.0), ScatterCfg::default(), seed);
        let pts = vertices(&polys);
        let tree = PartitionTree::build(&pts, ConjugateSplit);
        prop_assert_eq!(tree.node_count(), pts.len());
        prop_assert!(tree.depth() <= pts.len());
    }

    #[test]
    fn conjugate_cuts_meet_parent_chord_inside_parent_cell(seed in any::<u64>()) {
        let mut arena = VertexArena::new();
        let polys = scatter_regions(&mut arena, Rect::new(0.0, 0.0, 400.0, 400.0), ScatterCfg::default(), seed);
        let tree = PartitionTree::build(&vertices(&polys), ConjugateSplit);
        let mut checked = 0;
        for (parent, parent_cell, child, child_cell) in tree.nested_cuts() {
            // Degenerate child cells fall back to an axis cut.
            let Some((c0, c1)) = chord(child_cell, &parent) else { continue };
            let m = (c0 + c1) * 0.5;
            prop_assert!(child.side(m).abs() <= 1e-6, "child cut misses the chord midpoint");
            let (a, b) = chord(parent_cell, &parent).expect("parent cell holds its own cut");
            let len2 = (b - a).norm_squared();
            prop_assert!(len2 > 0.0);
            let t = (m - a).dot(&(b - a)) / len2;
            prop_assert!((-1e-6..=1.0 + 1e-6).contains(&t), "meeting point leaves the parent cell: t = {}", t);
            checked += 1;
        }
        prop_assert!(checked > 0);
    }
}

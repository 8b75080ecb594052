use super::*;
use std::collections::HashSet;

#[test]
fn points_compare_by_identity() {
    let mut arena = VertexArena::new();
    let p = arena.point(1.0, 2.0);
    let twin = arena.point(1.0, 2.0);
    assert_ne!(p, twin);
    assert_eq!(p, p);
    let set: HashSet<Point> = [p, twin, p].into_iter().collect();
    assert_eq!(set.len(), 2);
    assert_eq!(arena.len(), 2);
    let seg = Segment::new(p, twin, RegionId(0));
    assert!(seg.same_endpoints(&twin, &p));
    assert!(!seg.same_endpoints(&p, &p));
}

#[test]
fn lexicographic_order_breaks_x_ties_on_y() {
    assert!(lex_less(Vec2::new(0.0, 5.0), Vec2::new(1.0, 0.0)));
    assert!(lex_less(Vec2::new(1.0, 0.0), Vec2::new(1.0, 0.5)));
    assert!(!lex_less(Vec2::new(1.0, 0.5), Vec2::new(1.0, 0.5)));
}

#[test]
fn rect_bounds_and_containment() {
    let r = Rect::bounding([Vec2::new(3.0, 1.0), Vec2::new(-1.0, 4.0)]).unwrap();
    assert_eq!(r, Rect::new(-1.0, 1.0, 3.0, 4.0));
    assert!(Rect::bounding(std::iter::empty()).is_none());
    assert!(r.contains(Vec2::new(3.0, 4.0)));
    assert!(!r.contains_strict(Vec2::new(3.0, 4.0)));
    let big = r.inflate(1.0);
    assert_eq!((big.width(), big.height()), (6.0, 5.0));
    assert!(big.overlaps(&r));
    assert!(!r.overlaps(&Rect::new(5.0, 5.0, 6.0, 6.0)));
    assert_eq!(signed_area(&r.corners()), 12.0);
}

#[test]
fn hull_of_playfield_points_is_a_valid_region() {
    let mut arena = VertexArena::new();
    let pts = arena.points(&[
        (33.0, 118.0),
        (57.0, 178.0),
        (98.0, 236.0),
        (180.0, 270.0),
        (204.0, 171.0),
        (175.0, 106.0),
        (146.0, 77.0),
        (116.0, 65.0),
        (38.0, 70.0),
        (120.0, 150.0),
    ]);
    let poly = convex_hull(&pts).unwrap();
    assert!(poly.check_invariants().is_ok());
    assert_eq!(poly.len(), 9);
    assert_eq!(poly.first(), pts[0]);
    // The interior point is dropped but still contained.
    assert!(poly.index_of(&pts[9]).is_none());
    assert!(poly.contains(pts[9].pos));
    let c = poly.centroid().unwrap();
    assert!(poly.contains(c));
    assert!(poly.area() > 0.0);
    assert!(poly.bbox().contains(c));
    assert!(!poly.contains(Vec2::new(0.0, 0.0)));
}

#[test]
fn shared_tolerance_absorbs_rounding() {
    let a = Vec2::new(0.0, 0.0);
    let b = Vec2::new(100.0, 100.0);
    let c = Vec2::new(200.0, 200.0 + 1e-9);
    assert!(collinear(a, b, c));
    assert_eq!(orientation(a, b, c), Orientation::Collinear);
    assert_eq!(orientation(a, b, Vec2::new(200.0, 201.0)), Orientation::Left);
    assert!(EPS > 0.0 && EPS < 1e-4);
}

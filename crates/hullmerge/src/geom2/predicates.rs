//! Orientation, collinearity, line intersection and angle predicates.
//!
//! All tolerance decisions go through `cfg::EPS`.

use std::f64::consts::{FRAC_PI_2, TAU};

use super::cfg::EPS;
use super::types::{Point, Vec2};

/// Turn direction at `b` when walking `a → b → c`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Left,
    Right,
    Collinear,
}

/// z-component of `u × v`.
#[inline]
pub fn cross(u: Vec2, v: Vec2) -> f64 {
    u.x * v.y - u.y * v.x
}

/// Sign of `u × v` with the shared tolerance applied to the sine of the angle
/// between `u` and `v`. Returns 0 for (near-)parallel or zero-length input.
#[inline]
pub fn cross_sign(u: Vec2, v: Vec2) -> i8 {
    let c = cross(u, v);
    let scale = u.norm() * v.norm();
    if scale == 0.0 || c.abs() <= EPS * scale {
        0
    } else if c > 0.0 {
        1
    } else {
        -1
    }
}

/// Turn at `b` going `a → b → c` (sign of `(b-a) × (c-b)`).
#[inline]
pub fn orientation(a: Vec2, b: Vec2, c: Vec2) -> Orientation {
    match cross_sign(b - a, c - b) {
        1 => Orientation::Left,
        -1 => Orientation::Right,
        _ => Orientation::Collinear,
    }
}

/// Collinearity within `EPS` (absorbs rounding from repeated merges).
#[inline]
pub fn collinear(a: Vec2, b: Vec2, c: Vec2) -> bool {
    orientation(a, b, c) == Orientation::Collinear
}

/// Intersection point of the infinite lines through `p1p2` and `p3p4`.
///
/// Returns `None` when the determinant vanishes (parallel or degenerate).
pub fn line_intersection(p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2) -> Option<Vec2> {
    let d1 = p2 - p1;
    let d2 = p4 - p3;
    let det = cross(d1, d2);
    if det == 0.0 || cross_sign(d1, d2) == 0 {
        return None;
    }
    let t = cross(p3 - p1, d2) / det;
    Some(p1 + d1 * t)
}

/// Closed extent check with `EPS` slack on each bound.
#[inline]
fn within_extent(p: Vec2, a: Vec2, b: Vec2) -> bool {
    p.x >= a.x.min(b.x) - EPS
        && p.x <= a.x.max(b.x) + EPS
        && p.y >= a.y.min(b.y) - EPS
        && p.y <= a.y.max(b.y) + EPS
}

/// Bounded variant of `line_intersection`: the point must also lie within
/// both segments' closed extents.
pub fn segment_intersection(p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2) -> Option<Vec2> {
    let x = line_intersection(p1, p2, p3, p4)?;
    if within_extent(x, p1, p2) && within_extent(x, p3, p4) {
        Some(x)
    } else {
        None
    }
}

/// Crossing test used for bridge validation.
///
/// Segments sharing an endpoint by identity (including the identical
/// segment) do not cross; parallel segments do not cross. Otherwise the
/// bounded intersection decides.
pub fn segments_cross(p: &Point, q: &Point, r: &Point, s: &Point) -> bool {
    if p == r || p == s || q == r || q == s {
        return false;
    }
    // Canonical order keeps the verdict symmetric down to the last bit.
    let (p, q) = if q.id < p.id { (q, p) } else { (p, q) };
    let (r, s) = if s.id < r.id { (s, r) } else { (r, s) };
    let ((p, q), (r, s)) = if r.id < p.id { ((r, s), (p, q)) } else { ((p, q), (r, s)) };
    segment_intersection(p.pos, q.pos, r.pos, s.pos).is_some()
}

/// Angle in `[0, 2π)` swept counter-clockwise from the downward vertical to
/// the direction `p → q`.
#[inline]
pub fn angle_from_vertical(p: Vec2, q: Vec2) -> f64 {
    let d = q - p;
    let a = d.y.atan2(d.x) + FRAC_PI_2;
    let a = if a < 0.0 { a + TAU } else { a };
    if a >= TAU {
        a - TAU
    } else {
        a
    }
}

/// Unit direction at sweep angle `theta` (measured like `angle_from_vertical`).
#[inline]
pub fn direction_at(theta: f64) -> Vec2 {
    Vec2::new(theta.sin(), -theta.cos())
}

/// Signed shoelace area (positive for counter-clockwise winding).
pub fn signed_area(pts: &[Vec2]) -> f64 {
    let n = pts.len();
    if n < 3 {
        return 0.0;
    }
    let mut acc = 0.0;
    for k in 0..n {
        acc += cross(pts[k], pts[(k + 1) % n]);
    }
    acc / 2.0
}

/// Area-weighted centroid. `None` for zero-area input.
pub fn centroid(pts: &[Vec2]) -> Option<Vec2> {
    let n = pts.len();
    let a = signed_area(pts);
    if n < 3 || a.abs() <= f64::MIN_POSITIVE {
        return None;
    }
    let mut c = Vec2::zeros();
    for k in 0..n {
        let p = pts[k];
        let q = pts[(k + 1) % n];
        c += (p + q) * cross(p, q);
    }
    Some(c / (6.0 * a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn v(x: f64, y: f64) -> Vec2 {
        Vec2::new(x, y)
    }

    #[test]
    fn angle_from_vertical_cardinal_directions() {
        let o = v(0.0, 0.0);
        assert!(angle_from_vertical(o, v(0.0, -10.0)).abs() < 1e-12);
        assert!((angle_from_vertical(o, v(10.0, 0.0)) - PI / 2.0).abs() < 1e-12);
        assert!((angle_from_vertical(o, v(0.0, 10.0)) - PI).abs() < 1e-12);
        assert!((angle_from_vertical(o, v(-10.0, 0.0)) - 3.0 * PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn direction_matches_angle() {
        for &(x, y) in &[(3.0, -1.0), (-2.0, 5.0), (0.5, 0.5), (-1.0, -4.0)] {
            let d = direction_at(angle_from_vertical(v(0.0, 0.0), v(x, y)));
            let u = v(x, y).normalize();
            assert!((d - u).norm() < 1e-12);
        }
    }

    #[test]
    fn orientation_and_collinear_tolerance() {
        assert_eq!(
            orientation(v(0.0, 0.0), v(1.0, 0.0), v(1.0, 1.0)),
            Orientation::Left
        );
        assert_eq!(
            orientation(v(0.0, 0.0), v(1.0, 0.0), v(1.0, -1.0)),
            Orientation::Right
        );
        // Rounding-level deviation is absorbed.
        assert!(collinear(v(0.0, 0.0), v(100.0, 100.0), v(200.0, 200.0 + 1e-7)));
        assert!(!collinear(v(0.0, 0.0), v(100.0, 100.0), v(200.0, 201.0)));
    }

    #[test]
    fn line_and_segment_intersection() {
        let x = line_intersection(v(0.0, 0.0), v(1.0, 1.0), v(0.0, 2.0), v(2.0, 0.0)).unwrap();
        assert!((x - v(1.0, 1.0)).norm() < 1e-12);
        assert!(line_intersection(v(0.0, 0.0), v(1.0, 0.0), v(0.0, 1.0), v(1.0, 1.0)).is_none());
        // Lines meet at (3,3) which lies outside the first segment.
        assert!(segment_intersection(v(0.0, 0.0), v(1.0, 1.0), v(0.0, 6.0), v(6.0, 0.0)).is_none());
        // Touching at an endpoint counts for the bounded variant.
        assert!(segment_intersection(v(0.0, 0.0), v(1.0, 1.0), v(1.0, 1.0), v(2.0, 0.0)).is_some());
    }

    #[test]
    fn area_and_centroid_of_square() {
        let sq = [v(0.0, 0.0), v(2.0, 0.0), v(2.0, 2.0), v(0.0, 2.0)];
        assert!((signed_area(&sq) - 4.0).abs() < 1e-12);
        let c = centroid(&sq).unwrap();
        assert!((c - v(1.0, 1.0)).norm() < 1e-12);
        let cw: Vec<Vec2> = sq.iter().rev().copied().collect();
        assert!((signed_area(&cw) + 4.0).abs() < 1e-12);
        assert!(centroid(&[v(0.0, 0.0), v(1.0, 1.0), v(2.0, 2.0)]).is_none());
    }
}

//! Convex hull of identity-carrying points.
//!
//! Used to build regions from raw coordinates. The result is already in the
//! `ConvexPolygon` normal form: counter-clockwise from the bottom-left point,
//! with collinear and duplicate points removed.

use std::cmp::Ordering;

use super::polygon::ConvexPolygon;
use super::predicates::{orientation, Orientation};
use super::types::Point;
use crate::error::GeometryError;

fn lex_cmp(a: &Point, b: &Point) -> Ordering {
    match a.x().partial_cmp(&b.x()).unwrap_or(Ordering::Equal) {
        Ordering::Equal => a.y().partial_cmp(&b.y()).unwrap_or(Ordering::Equal),
        o => o,
    }
}

/// Andrew's monotone chain over identity-carrying points.
///
/// Returns the hull in counter-clockwise order starting at the bottom-leftmost
/// point. Collinear points (within `EPS`) and coordinate duplicates are
/// dropped; the surviving points keep their identity.
pub fn convex_hull(points: &[Point]) -> Result<ConvexPolygon, GeometryError> {
    let mut pts: Vec<Point> = points.to_vec();
    pts.sort_by(lex_cmp);
    pts.dedup_by(|a, b| a.pos == b.pos);
    if pts.len() < 3 {
        return Err(GeometryError::polygon(format!(
            "hull needs at least 3 distinct points, got {}",
            pts.len()
        )));
    }
    let mut lower: Vec<Point> = Vec::with_capacity(pts.len());
    for p in &pts {
        while lower.len() >= 2
            && orientation(lower[lower.len() - 2].pos, lower[lower.len() - 1].pos, p.pos)
                != Orientation::Left
        {
            lower.pop();
        }
        lower.push(*p);
    }
    let mut upper: Vec<Point> = Vec::with_capacity(pts.len());
    for p in pts.iter().rev() {
        while upper.len() >= 2
            && orientation(upper[upper.len() - 2].pos, upper[upper.len() - 1].pos, p.pos)
                != Orientation::Left
        {
            upper.pop();
        }
        upper.push(*p);
    }
    lower.pop();
    upper.pop();
    let mut hull = lower;
    hull.extend(upper);
    ConvexPolygon::new(hull)
}

//! Convex polygon with checked invariants.
//!
//! Invariants (checked by `ConvexPolygon::new`, `check_invariants`):
//! - at least 3 points and strictly positive area;
//! - no three cyclically consecutive points collinear (within `EPS`);
//! - the first point is the bottom-leftmost one (min x, then min y);
//! - counter-clockwise, convex winding (every turn is a left turn and the
//!   edge directions sweep exactly one full turn).
//!
//! Polygons are never mutated in place; merges build new ones.

use std::f64::consts::TAU;

use super::cfg::{ANGLE_EPS, EPS};
use super::predicates::{angle_from_vertical, orientation, signed_area, Orientation};
use super::types::{Point, Rect, Vec2};
use crate::error::GeometryError;

#[derive(Clone, Debug)]
pub struct ConvexPolygon {
    pts: Vec<Point>,
}

impl ConvexPolygon {
    /// Validate and wrap a point cycle.
    pub fn new(pts: Vec<Point>) -> Result<Self, GeometryError> {
        let poly = Self { pts };
        poly.check_invariants()?;
        Ok(poly)
    }

    /// Rotate the cycle so the bottom-leftmost point comes first, then validate.
    pub fn from_cycle(mut pts: Vec<Point>) -> Result<Self, GeometryError> {
        if let Some(k) = lower_left_index(&pts) {
            pts.rotate_left(k);
        }
        Self::new(pts)
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.pts
    }
    #[inline]
    pub fn len(&self) -> usize {
        self.pts.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pts.is_empty()
    }
    /// Bottom-leftmost vertex.
    #[inline]
    pub fn first(&self) -> Point {
        self.pts[0]
    }
    /// Vertex `k` modulo the vertex count.
    #[inline]
    pub fn vertex(&self, k: usize) -> Point {
        self.pts[k % self.pts.len()]
    }
    /// Position of `p` in the cycle, by identity.
    pub fn index_of(&self, p: &Point) -> Option<usize> {
        self.pts.iter().position(|q| q == p)
    }
    /// Directed boundary edges `(v_k, v_{k+1})`.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.pts.len();
        (0..n).map(move |k| (self.pts[k], self.pts[(k + 1) % n]))
    }
    pub fn positions(&self) -> Vec<Vec2> {
        self.pts.iter().map(|p| p.pos).collect()
    }
    pub fn area(&self) -> f64 {
        signed_area(&self.positions())
    }
    pub fn centroid(&self) -> Option<Vec2> {
        super::predicates::centroid(&self.positions())
    }
    pub fn bbox(&self) -> Rect {
        let first = self.pts[0].pos;
        let mut r = Rect {
            min: first,
            max: first,
        };
        for p in &self.pts[1..] {
            r.min = Vec2::new(r.min.x.min(p.x()), r.min.y.min(p.y()));
            r.max = Vec2::new(r.max.x.max(p.x()), r.max.y.max(p.y()));
        }
        r
    }

    /// Closed containment with `EPS` slack (boundary counts as inside).
    pub fn contains(&self, q: Vec2) -> bool {
        self.edges().all(|(a, b)| {
            let e = b.pos - a.pos;
            let w = q - a.pos;
            super::predicates::cross(e, w) >= -EPS * e.norm().max(1.0)
        })
    }

    /// Check every invariant, reporting the first violation.
    pub fn check_invariants(&self) -> Result<(), GeometryError> {
        let n = self.pts.len();
        if n < 3 {
            return Err(GeometryError::polygon(format!(
                "needs at least 3 points, got {n}"
            )));
        }
        if self.pts.iter().any(|p| !(p.x().is_finite() && p.y().is_finite())) {
            return Err(GeometryError::polygon("non-finite coordinate"));
        }
        let area = self.area();
        if area <= 0.0 {
            return Err(GeometryError::polygon(format!(
                "area must be strictly positive (counter-clockwise), got {area}"
            )));
        }
        if lower_left_index(&self.pts) != Some(0) {
            return Err(GeometryError::polygon(
                "first point is not the bottom-leftmost point",
            ));
        }
        for k in 0..n {
            let a = self.pts[k].pos;
            let b = self.pts[(k + 1) % n].pos;
            let c = self.pts[(k + 2) % n].pos;
            match orientation(a, b, c) {
                Orientation::Left => {}
                Orientation::Collinear => {
                    return Err(GeometryError::polygon(format!(
                        "collinear triple at vertex {}",
                        (k + 1) % n
                    )))
                }
                Orientation::Right => {
                    return Err(GeometryError::polygon(format!(
                        "right turn at vertex {} (not convex)",
                        (k + 1) % n
                    )))
                }
            }
        }
        // Left turns everywhere still admit a boundary winding twice; the edge
        // angles from the downward vertical must increase through one turn.
        let angles = edge_angles(&self.pts);
        for w in angles.windows(2) {
            if w[1] <= w[0] + ANGLE_EPS {
                return Err(GeometryError::polygon(
                    "edge directions do not sweep a single turn",
                ));
            }
        }
        Ok(())
    }
}

/// Index of the bottom-leftmost point.
pub(crate) fn lower_left_index(pts: &[Point]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (k, p) in pts.iter().enumerate() {
        match best {
            None => best = Some(k),
            Some(b) if p.is_lower_left_of(&pts[b]) => best = Some(k),
            _ => {}
        }
    }
    best
}

/// Edge angles from the downward vertical, unwrapped to be monotone for a
/// convex polygon starting at its bottom-leftmost point. The closing edge may
/// point straight down; it is reported as `2π`.
pub(crate) fn edge_angles(pts: &[Point]) -> Vec<f64> {
    let n = pts.len();
    let mut out = Vec::with_capacity(n);
    for k in 0..n {
        let mut a = angle_from_vertical(pts[k].pos, pts[(k + 1) % n].pos);
        if k == n - 1 && a < ANGLE_EPS {
            a = TAU;
        }
        out.push(a);
    }
    out
}

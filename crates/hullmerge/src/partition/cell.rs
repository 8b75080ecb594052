//! Convex cells and cut lines for the partition trees.
//!
//! A cell is a counter-clockwise convex polygon of plain coordinates; the
//! root cell is an inflated bounding rectangle and every split clips it by a
//! half-plane, so cells stay convex.

use crate::geom2::{cross, Vec2, EPS};

/// Directed splitting line through `origin`. Points left of `dir` go low.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cut {
    pub origin: Vec2,
    /// Unit direction.
    pub dir: Vec2,
}

impl Cut {
    /// Cut through `origin` along `dir`; `None` for a zero direction.
    pub fn new(origin: Vec2, dir: Vec2) -> Option<Self> {
        let n = dir.norm();
        if !(n.is_finite()) || n <= f64::MIN_POSITIVE {
            return None;
        }
        Some(Self {
            origin,
            dir: dir / n,
        })
    }
    /// Signed distance: positive on the low (left) side.
    #[inline]
    pub fn side(&self, p: Vec2) -> f64 {
        cross(self.dir, p - self.origin)
    }
    #[inline]
    pub fn reversed(&self) -> Self {
        Self {
            origin: self.origin,
            dir: -self.dir,
        }
    }
}

pub(crate) fn rect_cell(min: Vec2, max: Vec2) -> Vec<Vec2> {
    vec![
        min,
        Vec2::new(max.x, min.y),
        max,
        Vec2::new(min.x, max.y),
    ]
}

/// Closed containment with `EPS` slack.
pub(crate) fn contains(cell: &[Vec2], p: Vec2) -> bool {
    let n = cell.len();
    if n < 3 {
        return false;
    }
    (0..n).all(|k| {
        let a = cell[k];
        let e = cell[(k + 1) % n] - a;
        cross(e, p - a) >= -EPS * e.norm()
    })
}

/// Does segment `pq` touch the cell? Cyrus–Beck clipping with `EPS` slack.
pub(crate) fn meets_segment(cell: &[Vec2], p: Vec2, q: Vec2) -> bool {
    let n = cell.len();
    if n < 3 {
        return false;
    }
    let d = q - p;
    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    for k in 0..n {
        let a = cell[k];
        let e = cell[(k + 1) % n] - a;
        let fp = cross(e, p - a) + EPS * e.norm();
        let g = cross(e, d);
        if g == 0.0 {
            if fp < 0.0 {
                return false;
            }
            continue;
        }
        let t = -fp / g;
        if g > 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return false;
        }
    }
    true
}

/// Keep the part of `cell` on the low (`low = true`) or high side of `cut`.
pub(crate) fn clip(cell: &[Vec2], cut: &Cut, low: bool) -> Vec<Vec2> {
    let n = cell.len();
    let sgn = if low { 1.0 } else { -1.0 };
    let mut out: Vec<Vec2> = Vec::with_capacity(n + 1);
    for k in 0..n {
        let a = cell[k];
        let b = cell[(k + 1) % n];
        let sa = sgn * cut.side(a);
        let sb = sgn * cut.side(b);
        if sa >= 0.0 {
            out.push(a);
        }
        if (sa > 0.0 && sb < 0.0) || (sa < 0.0 && sb > 0.0) {
            out.push(a + (b - a) * (sa / (sa - sb)));
        }
    }
    out.dedup_by(|x, y| (*x - *y).norm() <= EPS);
    if out.len() > 1 && (out[0] - out[out.len() - 1]).norm() <= EPS {
        out.pop();
    }
    out
}

/// The part of the cut line inside the cell, as its two end points.
pub(crate) fn chord(cell: &[Vec2], cut: &Cut) -> Option<(Vec2, Vec2)> {
    let n = cell.len();
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    let mut take = |p: Vec2| {
        let t = cut.dir.dot(&(p - cut.origin));
        lo = lo.min(t);
        hi = hi.max(t);
    };
    for k in 0..n {
        let a = cell[k];
        let b = cell[(k + 1) % n];
        let sa = cut.side(a);
        let sb = cut.side(b);
        if sa.abs() <= EPS {
            take(a);
        }
        if (sa > EPS && sb < -EPS) || (sa < -EPS && sb > EPS) {
            take(a + (b - a) * (sa / (sa - sb)));
        }
    }
    if lo.is_finite() && hi.is_finite() {
        Some((cut.origin + cut.dir * lo, cut.origin + cut.dir * hi))
    } else {
        None
    }
}

/// Vertex average; enough to tell which side of a cut a convex cell lies on.
pub(crate) fn center(cell: &[Vec2]) -> Vec2 {
    if cell.is_empty() {
        return Vec2::zeros();
    }
    cell.iter().fold(Vec2::zeros(), |acc, p| acc + p) / cell.len() as f64
}

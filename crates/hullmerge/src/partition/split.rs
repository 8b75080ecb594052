//! Split rules: how a node picks its pivot and cut line.
//!
//! A rule reorders the node's points in place so that `pts[pts.len() / 2]` is
//! the pivot, points before it belong on the low (left) side of the returned
//! cut and points after it on the high side.

use std::cmp::Ordering;

use super::cell::{center, chord, Cut};
use crate::geom2::Vec2;

/// Shared contract of the two partition variants.
pub trait SplitRule {
    fn split(&self, pts: &mut [Vec2], cell: &[Vec2], parent: Option<&Cut>, depth: usize) -> Cut;
}

fn by_key(pts: &mut [Vec2], key: impl Fn(&Vec2) -> f64) {
    pts.sort_by(|a, b| key(a).partial_cmp(&key(b)).unwrap_or(Ordering::Equal));
}

/// Median split alternating on x (even depth) and y (odd depth).
#[derive(Clone, Copy, Debug, Default)]
pub struct AxisSplit;

impl AxisSplit {
    fn axis_cut(pts: &mut [Vec2], depth: usize) -> Cut {
        let mid = pts.len() / 2;
        let dir = if depth % 2 == 0 {
            by_key(pts, |p| p.x);
            Vec2::new(0.0, 1.0)
        } else {
            by_key(pts, |p| p.y);
            Vec2::new(-1.0, 0.0)
        };
        Cut {
            origin: pts[mid],
            dir,
        }
    }
}

impl SplitRule for AxisSplit {
    fn split(&self, pts: &mut [Vec2], _cell: &[Vec2], _parent: Option<&Cut>, depth: usize) -> Cut {
        Self::axis_cut(pts, depth)
    }
}

/// Point-conjugate split.
///
/// The cut of a child passes through its pivot and through the midpoint `m`
/// of the parent's cut inside the child's cell, so parent and child lines meet
/// within the retained region. The pivot is the angular median of the child's
/// points around `m`; all of them lie on one side of the parent line, so the
/// angles form a linear order and the cut bisects the set.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConjugateSplit;

impl SplitRule for ConjugateSplit {
    fn split(&self, pts: &mut [Vec2], cell: &[Vec2], parent: Option<&Cut>, depth: usize) -> Cut {
        let Some(parent) = parent else {
            return AxisSplit::axis_cut(pts, depth);
        };
        let Some((c0, c1)) = chord(cell, parent) else {
            return AxisSplit::axis_cut(pts, depth);
        };
        let m = (c0 + c1) * 0.5;
        let up = parent.dir;
        let side = if parent.side(center(cell)) >= 0.0 { 1.0 } else { -1.0 };
        let normal = Vec2::new(-up.y, up.x) * side;
        by_key(pts, |p| {
            let w = *p - m;
            normal.dot(&w).max(0.0).atan2(up.dot(&w))
        });
        let mid = pts.len() / 2;
        let pivot = pts[mid];
        let Some(mut cut) = Cut::new(pivot, pivot - m).or_else(|| Cut::new(pivot, normal)) else {
            return AxisSplit::axis_cut(pts, depth);
        };
        // Orient the cut so the earlier half falls on the low side.
        let probe = if mid > 0 { Some((pts[0], 1.0)) } else { pts.get(1).map(|p| (*p, -1.0)) };
        if let Some((p, want)) = probe {
            if cut.side(p) * want < 0.0 {
                cut = cut.reversed();
            }
        }
        cut
    }
}

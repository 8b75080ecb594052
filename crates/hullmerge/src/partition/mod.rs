//! Spatial partition trees answering "does this segment cross any stored
//! boundary edge?".
//!
//! Purpose
//! - Index the boundary segments of all live regions so a candidate bridge
//!   can be rejected when it crosses a third region.
//!
//! Variants
//! - `AxisSplit`: kd-style median cuts alternating between x and y.
//! - `ConjugateSplit`: each child's cut passes through its pivot and the
//!   midpoint of the parent's cut within the child cell.
//!
//! Both share `PartitionTree`; only the split rule differs. Shape is fixed at
//! construction from the vertex set, segments come and go afterwards.
//!
//! References
//! - de Berg et al., Computational Geometry, ch. 5 (kd-trees) and ch. 16
//!   (partition trees).

mod cell;
mod split;
mod tree;

#[cfg(test)]
mod tests;

pub use cell::Cut;
pub use split::{AxisSplit, ConjugateSplit, SplitRule};
pub use tree::{Branch, PartitionTree};

use crate::geom2::{ConvexPolygon, Point, RegionId, Segment, Vec2};

/// Operations shared by every segment index.
pub trait SegmentIndex {
    /// Store `seg` at the deepest node whose cell contains both endpoints.
    fn insert_segment(&mut self, seg: Segment);

    /// Remove the segment with endpoints `p`, `q` (either order, by identity).
    /// Returns `false` when no such segment is stored.
    fn remove_segment(&mut self, p: &Point, q: &Point) -> bool;

    /// True when `pq` properly crosses a stored segment whose owner is not in
    /// `skip`. Sharing an endpoint is not a crossing.
    fn intersects_except(&self, p: &Point, q: &Point, skip: &[RegionId]) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn intersects(&self, p: &Point, q: &Point) -> bool {
        self.intersects_except(p, q, &[])
    }

    /// Insert every edge of `poly` tagged with `owner`.
    fn insert_polygon(&mut self, poly: &ConvexPolygon, owner: RegionId) {
        for (a, b) in poly.edges() {
            self.insert_segment(Segment::new(a, b, owner));
        }
    }

    /// Remove every edge of `poly`; returns how many were found.
    fn remove_polygon(&mut self, poly: &ConvexPolygon) -> usize {
        poly.edges()
            .filter(|(a, b)| self.remove_segment(a, b))
            .count()
    }
}

/// Selects the split rule of a `PartitionIndex`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PartitionKind {
    #[default]
    AxisSplit,
    Conjugate,
}

/// Runtime choice between the two tree variants.
#[derive(Clone, Debug)]
pub enum PartitionIndex {
    Axis(PartitionTree<AxisSplit>),
    Conjugate(PartitionTree<ConjugateSplit>),
}

impl PartitionIndex {
    pub fn build(kind: PartitionKind, vertices: &[Vec2]) -> Self {
        match kind {
            PartitionKind::AxisSplit => Self::Axis(PartitionTree::build(vertices, AxisSplit)),
            PartitionKind::Conjugate => {
                Self::Conjugate(PartitionTree::build(vertices, ConjugateSplit))
            }
        }
    }

    pub fn kind(&self) -> PartitionKind {
        match self {
            Self::Axis(_) => PartitionKind::AxisSplit,
            Self::Conjugate(_) => PartitionKind::Conjugate,
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            Self::Axis(t) => t.depth(),
            Self::Conjugate(t) => t.depth(),
        }
    }

    pub fn pivot(&self, path: &[Branch]) -> Option<Vec2> {
        match self {
            Self::Axis(t) => t.pivot(path),
            Self::Conjugate(t) => t.pivot(path),
        }
    }
}

impl SegmentIndex for PartitionIndex {
    fn insert_segment(&mut self, seg: Segment) {
        match self {
            Self::Axis(t) => t.insert_segment(seg),
            Self::Conjugate(t) => t.insert_segment(seg),
        }
    }

    fn remove_segment(&mut self, p: &Point, q: &Point) -> bool {
        match self {
            Self::Axis(t) => t.remove_segment(p, q),
            Self::Conjugate(t) => t.remove_segment(p, q),
        }
    }

    fn intersects_except(&self, p: &Point, q: &Point, skip: &[RegionId]) -> bool {
        match self {
            Self::Axis(t) => t.intersects_except(p, q, skip),
            Self::Conjugate(t) => t.intersects_except(p, q, skip),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Axis(t) => t.len(),
            Self::Conjugate(t) => t.len(),
        }
    }
}

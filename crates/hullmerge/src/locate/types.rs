//! Arena records of the trapezoidal map: segments, cells, search nodes.

use crate::geom2::{cross, lex_less, RegionId, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct SegId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct TrapId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub usize);

/// A boundary edge stored left to right in lexicographic (x, y) order.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Seg {
    pub left: Vec2,
    pub right: Vec2,
    pub owner: Option<RegionId>,
    /// The owning region lies above this edge.
    pub interior_above: bool,
}

impl Seg {
    /// Edge `a -> b` of a counter-clockwise polygon.
    pub fn from_edge(a: Vec2, b: Vec2, owner: RegionId) -> Self {
        let rightward = lex_less(a, b);
        let (left, right) = if rightward { (a, b) } else { (b, a) };
        Self {
            left,
            right,
            owner: Some(owner),
            interior_above: rightward,
        }
    }

    pub fn boundary(left: Vec2, right: Vec2) -> Self {
        Self {
            left,
            right,
            owner: None,
            interior_above: false,
        }
    }

    /// Positive when `p` is above the supporting line. Exact sign, no tolerance.
    #[inline]
    pub fn side(&self, p: Vec2) -> f64 {
        cross(self.right - self.left, p - self.left)
    }

    pub fn region_above(&self) -> Option<RegionId> {
        if self.interior_above {
            self.owner
        } else {
            None
        }
    }
}

/// Cell of the decomposition.
///
/// The left wall is the vertical through `leftp`; `upper_left` is the
/// neighbour across the part of that wall above `leftp`, `lower_left` across
/// the part below. A neighbour covering both parts appears in both fields;
/// an empty part has `None`. The right side mirrors this around `rightp`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Trapezoid {
    pub top: SegId,
    pub bottom: SegId,
    pub leftp: Vec2,
    pub rightp: Vec2,
    pub upper_left: Option<TrapId>,
    pub lower_left: Option<TrapId>,
    pub upper_right: Option<TrapId>,
    pub lower_right: Option<TrapId>,
    /// Leaf of the search structure pointing here.
    pub node: NodeId,
    pub alive: bool,
}

impl Trapezoid {
    pub fn new(top: SegId, bottom: SegId, leftp: Vec2, rightp: Vec2) -> Self {
        Self {
            top,
            bottom,
            leftp,
            rightp,
            upper_left: None,
            lower_left: None,
            upper_right: None,
            lower_right: None,
            node: NodeId(0),
            alive: true,
        }
    }
}

/// Search structure node (history DAG).
#[derive(Clone, Copy, Debug)]
pub(crate) enum Node {
    /// Left of `p` (lexicographically) goes `left`; `p` itself goes `right`.
    X { p: Vec2, left: NodeId, right: NodeId },
    Y { seg: SegId, above: NodeId, below: NodeId },
    Leaf(TrapId),
}

/// Everything needed to take back one polygon insertion.
#[derive(Clone, Debug, Default)]
pub(crate) struct Journal {
    pub segs: usize,
    pub traps: usize,
    pub nodes: usize,
    pub saved_traps: Vec<(TrapId, Trapezoid)>,
    pub saved_nodes: Vec<(NodeId, Node)>,
}

/// Id-free description of one live cell, for structural comparison.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellSig {
    /// Raw bits of `leftp`, `rightp`, then top and bottom endpoints.
    pub corners: [u64; 12],
    pub owner: Option<RegionId>,
    /// Ranks (in signature order) of upper-left, lower-left, upper-right and
    /// lower-right neighbours.
    pub neighbours: [Option<usize>; 4],
}

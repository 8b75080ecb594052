//! Arena-backed partition tree over a static vertex set.
//!
//! The shape is fixed at construction by a `SplitRule`; boundary segments are
//! inserted afterwards and stored at the deepest node whose cell contains both
//! endpoints. A segment straddling a cut stays at the cutting node.

use tracing::debug;

use super::cell::{self, Cut};
use super::split::SplitRule;
use super::SegmentIndex;
use crate::geom2::{segments_cross, Point, Rect, RegionId, Segment, Vec2, EPS};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct NodeIdx(usize);

/// Which child to follow when inspecting the tree shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Branch {
    Low,
    High,
}

#[derive(Clone, Debug)]
struct Node {
    pivot: Vec2,
    cut: Cut,
    cell: Vec<Vec2>,
    segments: Vec<Segment>,
    low: Option<NodeIdx>,
    high: Option<NodeIdx>,
}

/// Partition tree parameterized by its split rule.
#[derive(Clone, Debug)]
pub struct PartitionTree<S: SplitRule> {
    rule: S,
    root: Option<NodeIdx>,
    arena: Vec<Node>,
    root_cell: Vec<Vec2>,
    /// Segments of a tree built without vertices.
    loose: Vec<Segment>,
    count: usize,
}

impl<S: SplitRule> PartitionTree<S> {
    /// Build the tree shape from `vertices` (no segments yet).
    pub fn build(vertices: &[Vec2], rule: S) -> Self {
        let root_cell = match Rect::bounding(vertices.iter().copied()) {
            Some(r) => {
                let margin = 1.0 + 0.05 * r.width().max(r.height());
                let r = r.inflate(margin);
                cell::rect_cell(r.min, r.max)
            }
            None => Vec::new(),
        };
        let mut tree = Self {
            rule,
            root: None,
            arena: Vec::with_capacity(vertices.len()),
            root_cell,
            loose: Vec::new(),
            count: 0,
        };
        let mut pts = vertices.to_vec();
        let cell = tree.root_cell.clone();
        tree.root = tree.build_node(&mut pts, cell, None, 0);
        debug!(
            vertices = vertices.len(),
            nodes = tree.arena.len(),
            depth = tree.depth(),
            "partition tree built"
        );
        tree
    }

    fn build_node(
        &mut self,
        pts: &mut [Vec2],
        cell: Vec<Vec2>,
        parent: Option<&Cut>,
        depth: usize,
    ) -> Option<NodeIdx> {
        if pts.is_empty() {
            return None;
        }
        let cut = self.rule.split(pts, &cell, parent, depth);
        let mid = pts.len() / 2;
        let pivot = pts[mid];
        let mut low = Vec::with_capacity(mid);
        let mut high = Vec::with_capacity(pts.len() - mid);
        for (k, p) in pts.iter().enumerate() {
            if k == mid {
                continue;
            }
            let s = cut.side(*p);
            if s > EPS || (s >= -EPS && k < mid) {
                low.push(*p);
            } else {
                high.push(*p);
            }
        }
        let idx = NodeIdx(self.arena.len());
        self.arena.push(Node {
            pivot,
            cut,
            cell: cell.clone(),
            segments: Vec::new(),
            low: None,
            high: None,
        });
        let low_cell = cell::clip(&cell, &cut, true);
        let high_cell = cell::clip(&cell, &cut, false);
        let lo = self.build_node(&mut low, low_cell, Some(&cut), depth + 1);
        let hi = self.build_node(&mut high, high_cell, Some(&cut), depth + 1);
        self.arena[idx.0].low = lo;
        self.arena[idx.0].high = hi;
        Some(idx)
    }

    /// Pivot reached by following `path` from the root.
    pub fn pivot(&self, path: &[Branch]) -> Option<Vec2> {
        let mut cur = self.root?;
        for b in path {
            let node = &self.arena[cur.0];
            cur = match b {
                Branch::Low => node.low?,
                Branch::High => node.high?,
            };
        }
        Some(self.arena[cur.0].pivot)
    }

    /// Longest root-to-leaf path, counted in nodes.
    pub fn depth(&self) -> usize {
        fn go<S: SplitRule>(t: &PartitionTree<S>, n: Option<NodeIdx>) -> usize {
            match n {
                None => 0,
                Some(i) => {
                    let node = &t.arena[i.0];
                    1 + go(t, node.low).max(go(t, node.high))
                }
            }
        }
        go(self, self.root)
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// `(parent cut, parent cell, child cut, child cell)` for every tree edge.
    #[cfg(test)]
    pub(crate) fn nested_cuts(&self) -> Vec<(Cut, &[Vec2], Cut, &[Vec2])> {
        let mut out = Vec::new();
        for node in &self.arena {
            for child in [node.low, node.high].into_iter().flatten() {
                let c = &self.arena[child.0];
                out.push((node.cut, node.cell.as_slice(), c.cut, c.cell.as_slice()));
            }
        }
        out
    }

    /// Path of nodes a segment descends through; the last one stores it.
    fn descent(&self, a: Vec2, b: Vec2) -> Vec<NodeIdx> {
        let mut path = Vec::new();
        let Some(mut cur) = self.root else {
            return path;
        };
        loop {
            path.push(cur);
            let node = &self.arena[cur.0];
            let (sa, sb) = (node.cut.side(a), node.cut.side(b));
            let fits = |child: Option<NodeIdx>| {
                child.filter(|c| {
                    let cell = &self.arena[c.0].cell;
                    cell::contains(cell, a) && cell::contains(cell, b)
                })
            };
            let next = if sa >= -EPS && sb >= -EPS {
                fits(node.low)
            } else {
                None
            }
            .or_else(|| {
                if sa <= EPS && sb <= EPS {
                    fits(node.high)
                } else {
                    None
                }
            });
            match next {
                Some(n) => cur = n,
                None => return path,
            }
        }
    }
}

impl<S: SplitRule> SegmentIndex for PartitionTree<S> {
    fn insert_segment(&mut self, seg: Segment) {
        match self.descent(seg.a.pos, seg.b.pos).last() {
            Some(at) => self.arena[at.0].segments.push(seg),
            None => self.loose.push(seg),
        }
        self.count += 1;
    }

    fn remove_segment(&mut self, p: &Point, q: &Point) -> bool {
        if let Some(k) = self.loose.iter().position(|s| s.same_endpoints(p, q)) {
            self.loose.swap_remove(k);
            self.count -= 1;
            return true;
        }
        for at in self.descent(p.pos, q.pos).into_iter().rev() {
            let segs = &mut self.arena[at.0].segments;
            if let Some(k) = segs.iter().position(|s| s.same_endpoints(p, q)) {
                segs.swap_remove(k);
                self.count -= 1;
                return true;
            }
        }
        false
    }

    fn intersects_except(&self, p: &Point, q: &Point, skip: &[RegionId]) -> bool {
        let (p, q) = if q.id < p.id { (q, p) } else { (p, q) };
        let crosses = |s: &Segment| !skip.contains(&s.owner) && segments_cross(p, q, &s.a, &s.b);
        if self.loose.iter().any(crosses) {
            return true;
        }
        let Some(root) = self.root else {
            return false;
        };
        let mut stack = vec![root];
        while let Some(cur) = stack.pop() {
            let node = &self.arena[cur.0];
            if node.segments.iter().any(crosses) {
                return true;
            }
            for child in [node.low, node.high].into_iter().flatten() {
                if cell::meets_segment(&self.arena[child.0].cell, p.pos, q.pos) {
                    stack.push(child);
                }
            }
        }
        false
    }

    fn len(&self) -> usize {
        self.count
    }
}

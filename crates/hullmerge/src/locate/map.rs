use std::collections::HashMap;

use rand::seq::SliceRandom;
use tracing::{debug, trace};

use super::types::{CellSig, Journal, Node, NodeId, Seg, SegId, TrapId, Trapezoid};
use crate::error::GeometryError;
use crate::geom2::rand::ReplayToken;
use crate::geom2::{lex_less, ConvexPolygon, Rect, RegionId, Vec2};

const ROOT: NodeId = NodeId(0);

/// Trapezoidal decomposition of a fixed bounding rectangle by the edges of
/// disjoint convex regions, with a history DAG for point location.
///
/// Regions are kept in insertion order. Each insertion records a journal so
/// that removing the most recent region is an exact undo; removing an older
/// one rebuilds from the remaining regions. The decomposition itself does not
/// depend on insertion order, so both paths produce the same cells.
#[derive(Clone, Debug)]
pub struct TrapezoidMap {
    bounds: Rect,
    seed: u64,
    segs: Vec<Seg>,
    traps: Vec<Trapezoid>,
    nodes: Vec<Node>,
    live: Vec<(RegionId, ConvexPolygon)>,
    journals: Vec<Journal>,
}

impl TrapezoidMap {
    /// Empty map over `bounds`; `seed` drives the per-region edge shuffle.
    pub fn new(bounds: Rect, seed: u64) -> Self {
        let (lo, hi) = (bounds.min, bounds.max);
        let segs = vec![
            Seg::boundary(lo, Vec2::new(hi.x, lo.y)),
            Seg::boundary(Vec2::new(lo.x, hi.y), hi),
        ];
        let traps = vec![Trapezoid::new(SegId(1), SegId(0), lo, hi)];
        Self {
            bounds,
            seed,
            segs,
            traps,
            nodes: vec![Node::Leaf(TrapId(0))],
            live: Vec::new(),
            journals: Vec::new(),
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Number of live regions.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn contains_region(&self, owner: RegionId) -> bool {
        self.position(owner).is_some()
    }

    /// Live regions in insertion order.
    pub fn regions(&self) -> impl Iterator<Item = RegionId> + '_ {
        self.live.iter().map(|(id, _)| *id)
    }

    fn position(&self, owner: RegionId) -> Option<usize> {
        self.live.iter().position(|(id, _)| *id == owner)
    }

    fn check_bounds(&self, polygon: &ConvexPolygon) -> Result<(), GeometryError> {
        match polygon
            .points()
            .iter()
            .find(|p| !self.bounds.contains_strict(p.pos))
        {
            Some(p) => Err(GeometryError::polygon(format!(
                "vertex ({}, {}) is not strictly inside the bounding rectangle",
                p.x(),
                p.y()
            ))),
            None => Ok(()),
        }
    }

    fn unknown(owner: RegionId) -> GeometryError {
        GeometryError::polygon(format!("region {} is not in the map", owner.0))
    }

    fn duplicate(owner: RegionId) -> GeometryError {
        GeometryError::polygon(format!("region {} is already in the map", owner.0))
    }

    /// Add `polygon` tagged with `owner`. Nothing changes on error.
    pub fn insert(&mut self, polygon: &ConvexPolygon, owner: RegionId) -> Result<(), GeometryError> {
        if self.contains_region(owner) {
            return Err(Self::duplicate(owner));
        }
        self.check_bounds(polygon)?;
        let journal = self.insert_edges(polygon, owner)?;
        self.live.push((owner, polygon.clone()));
        self.journals.push(journal);
        debug!(
            region = owner.0,
            edges = polygon.len(),
            cells = self.cell_count(),
            "region inserted"
        );
        Ok(())
    }

    /// Take `owner` out again, restoring the cells it split.
    pub fn remove(&mut self, owner: RegionId) -> Result<(), GeometryError> {
        let pos = self.position(owner).ok_or_else(|| Self::unknown(owner))?;
        if pos + 1 == self.live.len() {
            self.pop_last();
            debug!(region = owner.0, cells = self.cell_count(), "region removed by undo");
            return Ok(());
        }
        let mut live = self.live.clone();
        live.remove(pos);
        self.rebuild(live)
    }

    /// Replace the `removed` regions by `polygon` in one step.
    ///
    /// When the removed regions are the most recent insertions their journals
    /// are undone; otherwise the map is rebuilt once. `owner` may reuse one of
    /// the removed ids.
    pub fn merge(
        &mut self,
        removed: &[RegionId],
        polygon: &ConvexPolygon,
        owner: RegionId,
    ) -> Result<(), GeometryError> {
        let mut positions = removed
            .iter()
            .map(|id| self.position(*id).ok_or_else(|| Self::unknown(*id)))
            .collect::<Result<Vec<_>, _>>()?;
        positions.sort_unstable();
        positions.dedup();
        if self.contains_region(owner) && !removed.contains(&owner) {
            return Err(Self::duplicate(owner));
        }
        self.check_bounds(polygon)?;

        let tail = self.live.len() - positions.len();
        let is_suffix = positions.iter().enumerate().all(|(k, &p)| p == tail + k);
        if !is_suffix {
            let mut live: Vec<_> = self
                .live
                .iter()
                .enumerate()
                .filter(|(k, _)| positions.binary_search(k).is_err())
                .map(|(_, entry)| entry.clone())
                .collect();
            live.push((owner, polygon.clone()));
            return self.rebuild(live);
        }

        let saved = self.live[tail..].to_vec();
        while self.live.len() > tail {
            self.pop_last();
        }
        if let Err(e) = self.insert(polygon, owner) {
            for (id, poly) in &saved {
                self.insert(poly, *id)?;
            }
            return Err(e);
        }
        debug!(removed = saved.len(), region = owner.0, "regions merged by undo");
        Ok(())
    }

    fn pop_last(&mut self) {
        self.live.pop();
        if let Some(journal) = self.journals.pop() {
            self.undo(journal);
        }
    }

    fn rebuild(&mut self, live: Vec<(RegionId, ConvexPolygon)>) -> Result<(), GeometryError> {
        let mut fresh = Self::new(self.bounds, self.seed);
        for (owner, poly) in &live {
            fresh.insert(poly, *owner)?;
        }
        debug!(
            regions = fresh.live.len(),
            cells = fresh.cell_count(),
            "trapezoid map rebuilt"
        );
        *self = fresh;
        Ok(())
    }

    /// Owner of the region containing `(x, y)`, `None` for free space or
    /// points outside the bounding rectangle. Region boundaries belong to the
    /// region.
    pub fn query(&self, x: f64, y: f64) -> Option<RegionId> {
        self.query_point(Vec2::new(x, y))
    }

    pub fn query_point(&self, p: Vec2) -> Option<RegionId> {
        if !self.bounds.contains_strict(p) {
            return None;
        }
        let t = self.locate_point(p);
        self.segs[self.traps[t.0].bottom.0].region_above()
    }

    fn locate_point(&self, p: Vec2) -> TrapId {
        let mut cur = ROOT;
        loop {
            match self.nodes[cur.0] {
                Node::Leaf(t) => return t,
                Node::X { p: x, left, right } => cur = if lex_less(p, x) { left } else { right },
                Node::Y { seg, above, below } => {
                    let g = &self.segs[seg.0];
                    let side = g.side(p);
                    cur = if side > 0.0 || (side == 0.0 && g.interior_above) {
                        above
                    } else {
                        below
                    };
                }
            }
        }
    }

    /// Live cells.
    pub fn cell_count(&self) -> usize {
        self.traps.iter().filter(|t| t.alive).count()
    }

    /// Longest path in the search structure, counted in nodes.
    pub fn depth(&self) -> usize {
        fn go(map: &TrapezoidMap, n: NodeId, memo: &mut [usize]) -> usize {
            if memo[n.0] > 0 {
                return memo[n.0];
            }
            let d = match map.nodes[n.0] {
                Node::Leaf(_) => 1,
                Node::X { left, right, .. } => 1 + go(map, left, memo).max(go(map, right, memo)),
                Node::Y { above, below, .. } => 1 + go(map, above, memo).max(go(map, below, memo)),
            };
            memo[n.0] = d;
            d
        }
        let mut memo = vec![0; self.nodes.len()];
        go(self, ROOT, &mut memo)
    }

    /// Canonical, id-independent description of the live cells and their
    /// adjacency. Equal signatures mean equal decompositions.
    pub fn signature(&self) -> Vec<CellSig> {
        fn bits(v: Vec2) -> [u64; 2] {
            [v.x.to_bits(), v.y.to_bits()]
        }
        let corners = |t: &Trapezoid| {
            let (top, bottom) = (&self.segs[t.top.0], &self.segs[t.bottom.0]);
            let mut out = [0u64; 12];
            for (k, v) in [t.leftp, t.rightp, top.left, top.right, bottom.left, bottom.right]
                .into_iter()
                .enumerate()
            {
                out[2 * k..2 * k + 2].copy_from_slice(&bits(v));
            }
            out
        };
        let mut alive: Vec<(TrapId, [u64; 12])> = self
            .traps
            .iter()
            .enumerate()
            .filter(|(_, t)| t.alive)
            .map(|(k, t)| (TrapId(k), corners(t)))
            .collect();
        alive.sort_by(|a, b| a.1.cmp(&b.1));
        let rank: HashMap<TrapId, usize> = alive
            .iter()
            .enumerate()
            .map(|(r, (id, _))| (*id, r))
            .collect();
        let to_rank = |n: Option<TrapId>| n.and_then(|id| rank.get(&id).copied());
        alive
            .into_iter()
            .map(|(id, corners)| {
                let t = &self.traps[id.0];
                CellSig {
                    corners,
                    owner: self.segs[t.bottom.0].region_above(),
                    neighbours: [
                        to_rank(t.upper_left),
                        to_rank(t.lower_left),
                        to_rank(t.upper_right),
                        to_rank(t.lower_right),
                    ],
                }
            })
            .collect()
    }

    // ---- insertion -------------------------------------------------------

    fn insert_edges(
        &mut self,
        polygon: &ConvexPolygon,
        owner: RegionId,
    ) -> Result<Journal, GeometryError> {
        let mut journal = Journal {
            segs: self.segs.len(),
            traps: self.traps.len(),
            nodes: self.nodes.len(),
            ..Journal::default()
        };
        let mut edges: Vec<Seg> = polygon
            .edges()
            .map(|(a, b)| Seg::from_edge(a.pos, b.pos, owner))
            .collect();
        let mut rng = ReplayToken {
            seed: self.seed,
            index: u64::from(owner.0),
        }
        .to_std_rng();
        edges.shuffle(&mut rng);
        for seg in edges {
            if let Err(e) = self.insert_segment(seg, &mut journal) {
                self.undo(journal);
                return Err(e);
            }
        }
        Ok(journal)
    }

    fn insert_segment(&mut self, seg: Seg, journal: &mut Journal) -> Result<(), GeometryError> {
        let chain = self.follow(&seg)?;
        let s = SegId(self.segs.len());
        self.segs.push(seg);
        trace!(
            left = ?(seg.left.x, seg.left.y),
            right = ?(seg.right.x, seg.right.y),
            crossed = chain.len(),
            "segment inserted"
        );
        self.split(s, &chain, journal);
        Ok(())
    }

    /// Cell containing the start of `seg`, just right of its left endpoint.
    fn locate_start(&self, seg: &Seg) -> TrapId {
        let (p, q) = (seg.left, seg.right);
        let mut cur = ROOT;
        loop {
            match self.nodes[cur.0] {
                Node::Leaf(t) => return t,
                Node::X { p: x, left, right } => cur = if lex_less(p, x) { left } else { right },
                Node::Y { seg: g, above, below } => {
                    let g = &self.segs[g.0];
                    // Shared left endpoint: compare slopes instead.
                    let side = if p == g.left { g.side(q) } else { g.side(p) };
                    cur = if side > 0.0 { above } else { below };
                }
            }
        }
    }

    /// Cells crossed by `seg`, left to right.
    fn follow(&self, seg: &Seg) -> Result<Vec<TrapId>, GeometryError> {
        let mut t = self.locate_start(seg);
        let mut chain = vec![t];
        while lex_less(self.traps[t.0].rightp, seg.right) {
            let cur = &self.traps[t.0];
            let next = if seg.side(cur.rightp) > 0.0 {
                cur.lower_right
            } else {
                cur.upper_right
            };
            t = next.ok_or_else(|| GeometryError::polygon("edge runs into an existing boundary"))?;
            chain.push(t);
        }
        let last = &self.traps[t.0];
        if self.segs[last.top.0].side(seg.right) > 0.0
            || self.segs[last.bottom.0].side(seg.right) < 0.0
        {
            return Err(GeometryError::polygon("edge crosses an existing boundary"));
        }
        Ok(chain)
    }

    fn push_node(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn push_trap(&mut self, mut t: Trapezoid) -> TrapId {
        let id = TrapId(self.traps.len());
        t.node = self.push_node(Node::Leaf(id));
        t.alive = true;
        self.traps.push(t);
        id
    }

    fn touch(&mut self, journal: &mut Journal, t: TrapId) {
        if t.0 < journal.traps {
            journal.saved_traps.push((t, self.traps[t.0]));
        }
    }

    fn touch_node(&mut self, journal: &mut Journal, n: NodeId) {
        if n.0 < journal.nodes {
            journal.saved_nodes.push((n, self.nodes[n.0]));
        }
    }

    /// In `n`'s right links, point at `new` instead of `old`.
    fn relink_right(&mut self, journal: &mut Journal, n: TrapId, old: TrapId, new: TrapId) {
        self.touch(journal, n);
        let t = &mut self.traps[n.0];
        for link in [&mut t.upper_right, &mut t.lower_right] {
            if *link == Some(old) {
                *link = Some(new);
            }
        }
    }

    fn relink_left(&mut self, journal: &mut Journal, n: TrapId, old: TrapId, new: TrapId) {
        self.touch(journal, n);
        let t = &mut self.traps[n.0];
        for link in [&mut t.upper_left, &mut t.lower_left] {
            if *link == Some(old) {
                *link = Some(new);
            }
        }
    }

    /// Replace the cells in `chain` by the pieces cut out by segment `s`.
    fn split(&mut self, s: SegId, chain: &[TrapId], journal: &mut Journal) {
        let seg = self.segs[s.0];
        let (p, q) = (seg.left, seg.right);
        let old: Vec<Trapezoid> = chain.iter().map(|t| self.traps[t.0]).collect();
        let (first, last) = (old[0], old[old.len() - 1]);
        let (first_id, last_id) = (chain[0], chain[chain.len() - 1]);
        for &t in chain {
            self.touch(journal, t);
            self.traps[t.0].alive = false;
        }

        let left_rest = (p != first.leftp).then(|| {
            self.push_trap(Trapezoid {
                rightp: p,
                ..first
            })
        });
        let mut upper = self.push_trap(Trapezoid::new(first.top, s, p, q));
        let mut lower = self.push_trap(Trapezoid::new(s, first.bottom, p, q));
        match left_rest {
            Some(a) => {
                let at = &mut self.traps[a.0];
                at.upper_right = Some(upper);
                at.lower_right = Some(lower);
                self.traps[upper.0].upper_left = Some(a);
                self.traps[lower.0].lower_left = Some(a);
                for n in [first.upper_left, first.lower_left].into_iter().flatten() {
                    self.relink_right(journal, n, first_id, a);
                }
            }
            None => {
                self.traps[upper.0].upper_left = first.upper_left;
                self.traps[lower.0].lower_left = first.lower_left;
                if let Some(n) = first.upper_left {
                    self.relink_right(journal, n, first_id, upper);
                }
                if let Some(n) = first.lower_left {
                    self.relink_right(journal, n, first_id, lower);
                }
            }
        }

        let mut pieces = Vec::with_capacity(chain.len());
        pieces.push((upper, lower));
        for i in 0..chain.len() - 1 {
            let (di, dn) = (old[i], old[i + 1]);
            let (ci, cn) = (chain[i], chain[i + 1]);
            let r = di.rightp;
            if seg.side(r) > 0.0 {
                // The wall at r survives above s; below s the cells fuse.
                let nu = self.push_trap(Trapezoid::new(dn.top, s, r, q));
                let ur = if di.upper_right == Some(cn) { Some(nu) } else { di.upper_right };
                let ul = if dn.upper_left == Some(ci) { Some(upper) } else { dn.upper_left };
                let u = &mut self.traps[upper.0];
                u.rightp = r;
                u.upper_right = ur;
                u.lower_right = Some(nu);
                let n = &mut self.traps[nu.0];
                n.upper_left = ul;
                n.lower_left = Some(upper);
                if let Some(x) = di.upper_right.filter(|x| *x != cn) {
                    self.relink_left(journal, x, ci, upper);
                }
                if let Some(y) = dn.upper_left.filter(|y| *y != ci) {
                    self.relink_right(journal, y, cn, nu);
                }
                upper = nu;
            } else {
                let nl = self.push_trap(Trapezoid::new(s, dn.bottom, r, q));
                let lr = if di.lower_right == Some(cn) { Some(nl) } else { di.lower_right };
                let ll = if dn.lower_left == Some(ci) { Some(lower) } else { dn.lower_left };
                let l = &mut self.traps[lower.0];
                l.rightp = r;
                l.upper_right = Some(nl);
                l.lower_right = lr;
                let n = &mut self.traps[nl.0];
                n.upper_left = Some(lower);
                n.lower_left = ll;
                if let Some(x) = di.lower_right.filter(|x| *x != cn) {
                    self.relink_left(journal, x, ci, lower);
                }
                if let Some(y) = dn.lower_left.filter(|y| *y != ci) {
                    self.relink_right(journal, y, cn, nl);
                }
                lower = nl;
            }
            pieces.push((upper, lower));
        }

        let right_rest = (q != last.rightp).then(|| {
            self.push_trap(Trapezoid {
                leftp: q,
                ..last
            })
        });
        self.traps[upper.0].rightp = q;
        self.traps[lower.0].rightp = q;
        match right_rest {
            Some(b) => {
                self.traps[upper.0].upper_right = Some(b);
                self.traps[lower.0].lower_right = Some(b);
                let bt = &mut self.traps[b.0];
                bt.upper_left = Some(upper);
                bt.lower_left = Some(lower);
                for n in [last.upper_right, last.lower_right].into_iter().flatten() {
                    self.relink_left(journal, n, last_id, b);
                }
            }
            None => {
                self.traps[upper.0].upper_right = last.upper_right;
                self.traps[lower.0].lower_right = last.lower_right;
                if let Some(n) = last.upper_right {
                    self.relink_left(journal, n, last_id, upper);
                }
                if let Some(n) = last.lower_right {
                    self.relink_left(journal, n, last_id, lower);
                }
            }
        }

        // Search structure: each old leaf becomes a small subtree in place.
        let end = chain.len() - 1;
        for (i, (u, l)) in pieces.into_iter().enumerate() {
            let mut top = Node::Y {
                seg: s,
                above: self.traps[u.0].node,
                below: self.traps[l.0].node,
            };
            if i == end {
                if let Some(b) = right_rest {
                    let inner = self.push_node(top);
                    top = Node::X {
                        p: q,
                        left: inner,
                        right: self.traps[b.0].node,
                    };
                }
            }
            if i == 0 {
                if let Some(a) = left_rest {
                    let inner = self.push_node(top);
                    top = Node::X {
                        p,
                        left: self.traps[a.0].node,
                        right: inner,
                    };
                }
            }
            let slot = old[i].node;
            self.touch_node(journal, slot);
            self.nodes[slot.0] = top;
        }
    }

    fn undo(&mut self, journal: Journal) {
        for (id, t) in journal.saved_traps.into_iter().rev() {
            self.traps[id.0] = t;
        }
        for (id, n) in journal.saved_nodes.into_iter().rev() {
            self.nodes[id.0] = n;
        }
        self.traps.truncate(journal.traps);
        self.nodes.truncate(journal.nodes);
        self.segs.truncate(journal.segs);
    }
}

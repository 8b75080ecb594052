//! Live region set: the validate-then-apply merge flow over one point
//! location map and one partition index.
//!
//! Purpose
//! - Own the vertex arena, the live convex regions with their opaque owner
//!   tags, and both spatial structures, keeping them in step.
//! - `plan_merge` computes bridges, the merged polygon, enclosed regions and
//!   whether a bridge crosses any other region. `apply_merge` commits a plan.
//!
//! Concurrency: single writer, many readers. Callers hold one exclusive lock
//! around each plan + apply step; `locate` and `plan_merge` take `&self`.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::GeometryError;
use crate::geom2::{convex_hull, ConvexPolygon, Rect, RegionId, VertexArena};
use crate::locate::TrapezoidMap;
use crate::merge::{self, BridgeEdges};
use crate::partition::{PartitionIndex, PartitionKind, SegmentIndex};

/// A live region and its owner tag.
#[derive(Clone, Debug)]
pub struct Region<O> {
    pub polygon: ConvexPolygon,
    pub owner: O,
}

/// Outcome of validating a merge of two regions.
#[derive(Clone, Debug)]
pub struct MergePlan {
    pub first: RegionId,
    pub second: RegionId,
    pub bridges: BridgeEdges,
    pub merged: ConvexPolygon,
    /// Other regions lying inside the merged polygon.
    pub absorbed: Vec<RegionId>,
    /// A bridge crosses the boundary of a region not taking part.
    pub crosses: bool,
}

impl MergePlan {
    /// Every region the merge takes off the board.
    pub fn removed(&self) -> Vec<RegionId> {
        let mut out = vec![self.first, self.second];
        out.extend_from_slice(&self.absorbed);
        out
    }
}

#[derive(Clone, Debug)]
pub struct RegionSet<O> {
    arena: VertexArena,
    regions: BTreeMap<RegionId, Region<O>>,
    next_id: u32,
    map: TrapezoidMap,
    index: PartitionIndex,
}

impl<O: Clone> RegionSet<O> {
    /// Empty set over `bounds`. The partition index has no vertices to shape
    /// it, so prefer `from_playfield` when the initial regions are known.
    pub fn new(bounds: Rect, kind: PartitionKind, seed: u64) -> Self {
        Self {
            arena: VertexArena::new(),
            regions: BTreeMap::new(),
            next_id: 0,
            map: TrapezoidMap::new(bounds, seed),
            index: PartitionIndex::build(kind, &[]),
        }
    }

    /// Set seeded with `initial` regions, whose points came from `arena`.
    /// The partition index is shaped by all their vertices.
    pub fn from_playfield(
        bounds: Rect,
        kind: PartitionKind,
        seed: u64,
        arena: VertexArena,
        initial: Vec<(ConvexPolygon, O)>,
    ) -> Result<Self, GeometryError> {
        let vertices: Vec<_> = initial
            .iter()
            .flat_map(|(poly, _)| poly.positions())
            .collect();
        let mut set = Self {
            arena,
            regions: BTreeMap::new(),
            next_id: 0,
            map: TrapezoidMap::new(bounds, seed),
            index: PartitionIndex::build(kind, &vertices),
        };
        for (poly, owner) in initial {
            set.insert_region(poly, owner)?;
        }
        debug!(
            regions = set.len(),
            depth = set.index.depth(),
            cells = set.map.cell_count(),
            "region set ready"
        );
        Ok(set)
    }

    pub fn arena_mut(&mut self) -> &mut VertexArena {
        &mut self.arena
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn region(&self, id: RegionId) -> Option<&Region<O>> {
        self.regions.get(&id)
    }

    pub fn regions(&self) -> impl Iterator<Item = (RegionId, &Region<O>)> {
        self.regions.iter().map(|(id, r)| (*id, r))
    }

    pub fn map(&self) -> &TrapezoidMap {
        &self.map
    }

    pub fn index(&self) -> &PartitionIndex {
        &self.index
    }

    /// Add a region. It must not touch or overlap any live region.
    pub fn insert_region(
        &mut self,
        polygon: ConvexPolygon,
        owner: O,
    ) -> Result<RegionId, GeometryError> {
        polygon.check_invariants()?;
        if polygon
            .edges()
            .any(|(p, q)| self.index.intersects(&p, &q))
        {
            return Err(GeometryError::polygon("region boundary crosses a live region"));
        }
        let nested = self.map.query_point(polygon.first().pos).is_some()
            || self
                .regions
                .values()
                .any(|r| polygon.contains(r.polygon.first().pos));
        if nested {
            return Err(GeometryError::polygon("region overlaps a live region"));
        }
        let id = RegionId(self.next_id);
        self.map.insert(&polygon, id)?;
        self.index.insert_polygon(&polygon, id);
        self.next_id += 1;
        self.regions.insert(id, Region { polygon, owner });
        Ok(id)
    }

    /// Hull `coords` into a fresh region.
    pub fn insert_points(
        &mut self,
        coords: &[(f64, f64)],
        owner: O,
    ) -> Result<RegionId, GeometryError> {
        let pts = self.arena.points(coords);
        let polygon = convex_hull(&pts)?;
        self.insert_region(polygon, owner)
    }

    /// Region containing `(x, y)`, boundary included.
    pub fn locate(&self, x: f64, y: f64) -> Option<(RegionId, &O)> {
        let id = self.map.query(x, y)?;
        self.regions.get(&id).map(|r| (id, &r.owner))
    }

    fn live(&self, id: RegionId) -> Result<&Region<O>, GeometryError> {
        self.regions
            .get(&id)
            .ok_or_else(|| GeometryError::polygon(format!("region {} is not live", id.0)))
    }

    /// Validate merging `a` and `b` without changing anything.
    pub fn plan_merge(&self, a: RegionId, b: RegionId) -> Result<MergePlan, GeometryError> {
        if a == b {
            return Err(GeometryError::polygon("a region cannot merge with itself"));
        }
        let (ra, rb) = (self.live(a)?, self.live(b)?);
        let (bridges, merged) = merge::merge(&ra.polygon, &rb.polygon)?;
        let absorbed: Vec<RegionId> = self
            .regions
            .iter()
            .filter(|(id, _)| **id != a && **id != b)
            .filter(|(_, r)| r.polygon.points().iter().all(|p| merged.contains(p.pos)))
            .map(|(id, _)| *id)
            .collect();
        let mut skip = vec![a, b];
        skip.extend_from_slice(&absorbed);
        let crosses = bridges
            .segments()
            .iter()
            .any(|(p, q)| self.index.intersects_except(p, q, &skip));
        debug!(
            first = a.0,
            second = b.0,
            absorbed = absorbed.len(),
            crosses,
            "merge planned"
        );
        Ok(MergePlan {
            first: a,
            second: b,
            bridges,
            merged,
            absorbed,
            crosses,
        })
    }

    /// Commit `plan`, tagging the merged region with `owner`.
    pub fn apply_merge(&mut self, plan: MergePlan, owner: O) -> Result<RegionId, GeometryError> {
        if plan.crosses {
            return Err(GeometryError::bridge("a bridge crosses another region"));
        }
        let removed = plan.removed();
        for id in &removed {
            self.live(*id)?;
        }
        let id = RegionId(self.next_id);
        self.map.merge(&removed, &plan.merged, id)?;
        for old in &removed {
            if let Some(region) = self.regions.remove(old) {
                self.index.remove_polygon(&region.polygon);
            }
        }
        self.index.insert_polygon(&plan.merged, id);
        self.next_id += 1;
        debug!(
            region = id.0,
            removed = removed.len(),
            vertices = plan.merged.len(),
            "merge applied"
        );
        self.regions.insert(
            id,
            Region {
                polygon: plan.merged,
                owner,
            },
        );
        Ok(id)
    }

    /// Plan and apply; `Ok(None)` when a bridge crosses another region.
    pub fn try_merge(
        &mut self,
        a: RegionId,
        b: RegionId,
        owner: O,
    ) -> Result<Option<RegionId>, GeometryError> {
        let plan = self.plan_merge(a, b)?;
        if plan.crosses {
            return Ok(None);
        }
        self.apply_merge(plan, owner).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom2::rand::{scatter_regions, ScatterCfg};

    fn board() -> Rect {
        Rect::new(0.0, 0.0, 100.0, 100.0)
    }

    fn three_in_a_row(kind: PartitionKind) -> (RegionSet<&'static str>, [RegionId; 3]) {
        let mut set = RegionSet::new(board(), kind, 4);
        let a = set
            .insert_points(&[(10.0, 40.0), (20.0, 40.0), (20.0, 60.0), (10.0, 60.0)], "red")
            .unwrap();
        let wall = set
            .insert_points(&[(40.0, 20.0), (50.0, 20.0), (50.0, 80.0), (40.0, 80.0)], "grey")
            .unwrap();
        let b = set
            .insert_points(&[(70.0, 40.0), (80.0, 40.0), (80.0, 60.0), (70.0, 60.0)], "blue")
            .unwrap();
        (set, [a, wall, b])
    }

    #[test]
    fn blocked_merge_is_refused() {
        for kind in [PartitionKind::AxisSplit, PartitionKind::Conjugate] {
            let (mut set, [a, _, b]) = three_in_a_row(kind);
            let plan = set.plan_merge(a, b).unwrap();
            assert!(plan.crosses);
            assert!(plan.absorbed.is_empty());
            assert_eq!(set.try_merge(a, b, "red").unwrap(), None);
            assert!(matches!(
                set.apply_merge(plan, "red"),
                Err(GeometryError::InvalidBridge { .. })
            ));
            assert_eq!(set.len(), 3);
        }
    }

    #[test]
    fn neighbours_merge_and_locate_follows() {
        let (mut set, [a, wall, b]) = three_in_a_row(PartitionKind::AxisSplit);
        assert_eq!(set.locate(15.0, 50.0), Some((a, &"red")));
        let merged = set.try_merge(a, wall, "red").unwrap().unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.region(a).is_none());
        assert_eq!(set.locate(30.0, 50.0), Some((merged, &"red")));
        assert_eq!(set.locate(45.0, 70.0), Some((merged, &"red")));
        assert_eq!(set.locate(75.0, 50.0), Some((b, &"blue")));
        assert_eq!(set.locate(60.0, 50.0), None);
        // The merged region now reaches b without obstacles.
        let all = set.try_merge(merged, b, "red").unwrap().unwrap();
        assert_eq!(set.locate(60.0, 50.0), Some((all, &"red")));
        assert!(!set.index().is_empty());
    }

    #[test]
    fn enclosed_regions_are_absorbed() {
        let mut set = RegionSet::new(board(), PartitionKind::Conjugate, 2);
        let a = set
            .insert_points(&[(10.0, 10.0), (20.0, 10.0), (15.0, 20.0)], 1u8)
            .unwrap();
        let b = set
            .insert_points(&[(80.0, 10.0), (90.0, 10.0), (85.0, 20.0)], 2)
            .unwrap();
        let small = set
            .insert_points(&[(48.0, 12.0), (52.0, 12.0), (50.0, 14.0)], 3)
            .unwrap();
        // A bridge passes below the small triangle; the other sits above it.
        let plan = set.plan_merge(a, b).unwrap();
        assert_eq!(plan.absorbed, vec![small]);
        assert!(!plan.crosses);
        let id = set.apply_merge(plan, 1).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.locate(50.0, 13.0), Some((id, &1)));
        assert_eq!(set.map().len(), 1);
    }

    #[test]
    fn overlapping_insert_is_rejected() {
        let (mut set, _) = three_in_a_row(PartitionKind::AxisSplit);
        let cells = set.map().cell_count();
        assert!(set
            .insert_points(&[(15.0, 45.0), (30.0, 45.0), (30.0, 55.0)], "x")
            .is_err());
        assert!(set
            .insert_points(&[(12.0, 45.0), (14.0, 45.0), (13.0, 50.0)], "x")
            .is_err());
        assert!(set
            .insert_points(&[(5.0, 5.0), (95.0, 5.0), (95.0, 95.0), (5.0, 95.0)], "x")
            .is_err());
        assert_eq!(set.map().cell_count(), cells);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn unknown_and_self_merges_are_errors() {
        let (set, [a, _, _]) = three_in_a_row(PartitionKind::AxisSplit);
        assert_eq!(
            set.plan_merge(a, a).err(),
            Some(GeometryError::polygon("a region cannot merge with itself"))
        );
        assert_eq!(
            set.plan_merge(a, RegionId(99)).err().map(|e| e.to_string()),
            Some("invalid polygon: region 99 is not live".to_string())
        );
    }

    #[test]
    fn playfield_merges_keep_the_structures_consistent() {
        let mut arena = VertexArena::new();
        let polys = scatter_regions(
            &mut arena,
            Rect::new(5.0, 5.0, 95.0, 95.0),
            ScatterCfg { cols: 3, rows: 3, ..ScatterCfg::default() },
            17,
        );
        let initial = polys.into_iter().map(|p| (p, ())).collect();
        let mut set =
            RegionSet::from_playfield(board(), PartitionKind::Conjugate, 17, arena, initial).unwrap();
        assert_eq!(set.len(), 9);
        // Horizontal neighbours in the grid never have a third region between them.
        let merged = set.try_merge(RegionId(0), RegionId(1), ()).unwrap();
        assert!(merged.is_some());
        for (id, region) in set.regions() {
            let c = region.polygon.centroid().unwrap();
            assert_eq!(set.locate(c.x, c.y).map(|(r, _)| r), Some(id));
        }
    }
}

//! JSON playfield files and merge reports.

use anyhow::{bail, Context, Result};
use hullmerge::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Bounding rectangle plus raw point sets, one per region.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Playfield {
    /// `[min_x, min_y, max_x, max_y]`.
    pub bounds: [f64; 4],
    pub regions: Vec<Vec<(f64, f64)>>,
}

impl Playfield {
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn rect(&self) -> Rect {
        let [x0, y0, x1, y1] = self.bounds;
        Rect::new(x0, y0, x1, y1)
    }

    /// Random disjoint regions on a `cols` x `rows` grid.
    pub fn generate(bounds: Rect, cols: usize, rows: usize, seed: u64) -> Self {
        let mut arena = VertexArena::new();
        let margin = 0.02 * bounds.width().min(bounds.height());
        let area = bounds.inflate(-margin);
        let cfg = ScatterCfg {
            cols,
            rows,
            ..ScatterCfg::default()
        };
        let regions = scatter_regions(&mut arena, area, cfg, seed)
            .iter()
            .map(coords)
            .collect();
        Self {
            bounds: [bounds.min.x, bounds.min.y, bounds.max.x, bounds.max.y],
            regions,
        }
    }

    /// Live region set with region `k` of the file tagged `k`.
    pub fn region_set(&self, kind: PartitionKind, seed: u64) -> Result<RegionSet<usize>> {
        let mut arena = VertexArena::new();
        let mut initial = Vec::with_capacity(self.regions.len());
        for (k, pts) in self.regions.iter().enumerate() {
            let poly = convex_hull(&arena.points(pts))
                .with_context(|| format!("region {k} is not a proper convex region"))?;
            initial.push((poly, k));
        }
        Ok(RegionSet::from_playfield(
            self.rect(),
            kind,
            seed,
            arena,
            initial,
        )?)
    }
}

pub fn coords(poly: &ConvexPolygon) -> Vec<(f64, f64)> {
    poly.points().iter().map(|p| (p.x(), p.y())).collect()
}

/// Outcome of one merge request.
#[derive(Clone, Debug, Serialize)]
pub struct MergeReport {
    pub first: usize,
    pub second: usize,
    pub bridges: [[(f64, f64); 2]; 2],
    pub merged: Vec<(f64, f64)>,
    /// File indices of regions swallowed by the merged hull.
    pub absorbed: Vec<usize>,
    pub crosses: bool,
    pub area: f64,
}

impl MergeReport {
    pub fn plan(field: &Playfield, first: usize, second: usize, kind: PartitionKind) -> Result<Self> {
        let n = field.regions.len();
        if first >= n || second >= n {
            bail!("region index out of range: {first}, {second} (have {n})");
        }
        let set = field.region_set(kind, 0)?;
        // Regions were inserted in file order, so ids match indices.
        let id = |k: usize| RegionId(k as u32);
        let plan = set.plan_merge(id(first), id(second))?;
        let seg = |(p, q): (Point, Point)| [(p.x(), p.y()), (q.x(), q.y())];
        Ok(Self {
            first,
            second,
            bridges: [seg(plan.bridges.outbound), seg(plan.bridges.inbound)],
            merged: coords(&plan.merged),
            absorbed: plan.absorbed.iter().map(|r| r.0 as usize).collect(),
            crosses: plan.crosses,
            area: plan.merged.area(),
        })
    }
}

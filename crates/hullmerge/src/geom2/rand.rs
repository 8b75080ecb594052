//! Random convex regions in 2D (radial jitter + replay tokens).
//!
//! Purpose
//! - Provide a small, deterministic sampler for convex regions used by tests,
//!   benchmarks and the CLI as a stand-in for a playfield generator.
//!
//! Model
//! - Start from `n` equally spaced angles on [0, 2π), add bounded angular and
//!   radial jitter, and take the convex hull of the resulting points.
//! - `scatter_regions` places one such polygon per grid cell, scaled to stay
//!   strictly inside its cell, so the regions are pairwise disjoint.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::hull::convex_hull;
use super::polygon::ConvexPolygon;
use super::types::{Rect, VertexArena};

/// Vertex count distribution.
#[derive(Clone, Copy, Debug)]
pub enum VertexCount {
    Fixed(usize),
    Uniform { min: usize, max: usize },
}
impl VertexCount {
    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        match *self {
            VertexCount::Fixed(n) => n.max(3),
            VertexCount::Uniform { min, max } => {
                let lo = min.max(3);
                let hi = max.max(lo);
                rng.gen_range(lo..=hi)
            }
        }
    }
}

/// Radial-jitter sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct RadialCfg {
    pub vertex_count: VertexCount,
    /// Angular jitter as a fraction of the base spacing Δ=2π/n. Clamped to [0, 0.49].
    pub angle_jitter_frac: f64,
    /// Radial jitter (relative amplitude). Radii = `radius * (1 + u)`, with `u∈[-radial_jitter, radial_jitter]`.
    pub radial_jitter: f64,
    /// Random global phase in [0, 2π)?
    pub random_phase: bool,
}
impl Default for RadialCfg {
    fn default() -> Self {
        Self {
            vertex_count: VertexCount::Uniform { min: 4, max: 10 },
            angle_jitter_frac: 0.3,
            radial_jitter: 0.25,
            random_phase: true,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}
impl ReplayToken {
    #[inline]
    pub(crate) fn to_std_rng(self) -> StdRng {
        StdRng::seed_from_u64(mix_seed(self.seed, self.index))
    }
}

/// SplitMix64-style mixing, cheap and stable.
pub(crate) fn mix_seed(seed: u64, index: u64) -> u64 {
    fn mix(mut x: u64) -> u64 {
        x ^= x >> 30;
        x = x.wrapping_mul(0xbf58476d1ce4e5b9);
        x ^= x >> 27;
        x = x.wrapping_mul(0x94d049bb133111eb);
        x ^ (x >> 31)
    }
    mix(seed ^ mix(index.wrapping_add(0x9e3779b97f4a7c15)))
}

/// Draw a random convex polygon around `center` with outer radius at most
/// `radius`. New vertices are allocated from `arena`.
///
/// Returns `None` only if the hull degenerates (practically never for n ≥ 3).
pub fn draw_polygon_radial(
    arena: &mut VertexArena,
    cfg: RadialCfg,
    center: Vector2<f64>,
    radius: f64,
    tok: ReplayToken,
) -> Option<ConvexPolygon> {
    let mut rng = tok.to_std_rng();
    let n = cfg.vertex_count.sample(&mut rng).max(3);
    let aj = cfg.angle_jitter_frac.clamp(0.0, 0.49);
    let rj = cfg.radial_jitter.clamp(0.0, 0.9);
    let r0 = radius.max(1e-9) / (1.0 + rj);
    let delta = 2.0 * std::f64::consts::PI / (n as f64);
    let phase = if cfg.random_phase {
        rng.gen::<f64>() * 2.0 * std::f64::consts::PI
    } else {
        0.0
    };
    let mut angles: Vec<f64> = (0..n)
        .map(|k| {
            let base = phase + (k as f64) * delta;
            let jitter = (rng.gen::<f64>() * 2.0 - 1.0) * aj * delta;
            base + jitter
        })
        .collect();
    angles.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let pts: Vec<_> = angles
        .into_iter()
        .map(|th| {
            let u = (rng.gen::<f64>() * 2.0 - 1.0) * rj;
            let r = (1.0 + u) * r0;
            arena.point(center.x + th.cos() * r, center.y + th.sin() * r)
        })
        .collect();
    convex_hull(&pts).ok()
}

/// Playfield layout for `scatter_regions`.
#[derive(Clone, Copy, Debug)]
pub struct ScatterCfg {
    pub cols: usize,
    pub rows: usize,
    /// Fraction of the half cell size used as the outer radius, in (0, 1).
    pub fill: f64,
    pub radial: RadialCfg,
}
impl Default for ScatterCfg {
    fn default() -> Self {
        Self {
            cols: 4,
            rows: 4,
            fill: 0.8,
            radial: RadialCfg::default(),
        }
    }
}

/// One convex region per grid cell of `area`, pairwise disjoint.
pub fn scatter_regions(
    arena: &mut VertexArena,
    area: Rect,
    cfg: ScatterCfg,
    seed: u64,
) -> Vec<ConvexPolygon> {
    let cols = cfg.cols.max(1);
    let rows = cfg.rows.max(1);
    let cw = area.width() / cols as f64;
    let ch = area.height() / rows as f64;
    let radius = 0.5 * cw.min(ch) * cfg.fill.clamp(0.05, 0.95);
    let mut out = Vec::with_capacity(cols * rows);
    for r in 0..rows {
        for c in 0..cols {
            let center = Vector2::new(
                area.min.x + (c as f64 + 0.5) * cw,
                area.min.y + (r as f64 + 0.5) * ch,
            );
            let tok = ReplayToken {
                seed,
                index: (r * cols + c) as u64,
            };
            if let Some(poly) = draw_polygon_radial(arena, cfg.radial, center, radius, tok) {
                out.push(poly);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_are_reproducible() {
        let tok = ReplayToken { seed: 7, index: 3 };
        let mut a1 = VertexArena::new();
        let mut a2 = VertexArena::new();
        let p1 = draw_polygon_radial(&mut a1, RadialCfg::default(), Vector2::zeros(), 1.0, tok)
            .unwrap();
        let p2 = draw_polygon_radial(&mut a2, RadialCfg::default(), Vector2::zeros(), 1.0, tok)
            .unwrap();
        assert_eq!(p1.positions(), p2.positions());
        assert!(p1.positions().iter().all(|p| p.norm() <= 1.0 + 1e-12));
    }

    #[test]
    fn scattered_regions_are_disjoint_and_valid() {
        let mut arena = VertexArena::new();
        let area = Rect::new(0.0, 0.0, 400.0, 300.0);
        let regions = scatter_regions(&mut arena, area, ScatterCfg::default(), 11);
        assert_eq!(regions.len(), 16);
        for (i, a) in regions.iter().enumerate() {
            assert!(a.check_invariants().is_ok());
            for b in &regions[i + 1..] {
                assert!(!a.bbox().overlaps(&b.bbox()));
            }
        }
    }
}

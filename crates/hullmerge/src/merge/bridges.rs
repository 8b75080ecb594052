//! Bridge computation by rotating calipers.
//!
//! Both calipers start pointing straight down from each polygon's
//! bottom-leftmost vertex and rotate counter-clockwise; whichever caliper's
//! next edge has the smaller angle from the vertical advances (ties advance
//! both). Between events the supporting vertices `(a_i, b_j)` are fixed and
//! the sign of `d(θ) × (b_j − a_i)` tells which polygon supports the union.
//! That sign is continuous across events, so it is sampled once per event; it
//! changes exactly twice over a full turn and each change is a bridge.

use std::f64::consts::TAU;

use tracing::trace;

use crate::error::GeometryError;
use crate::geom2::cfg::ANGLE_EPS;
use crate::geom2::predicates::{cross_sign, direction_at};
use crate::geom2::{edge_angles, orientation, ConvexPolygon, Orientation, Point, Vec2};

/// The two edges that close the merged hull.
///
/// `outbound` runs from the polygon owning the global bottom-leftmost point to
/// the other polygon, `inbound` runs back. Endpoints are the exact vertices of
/// the inputs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BridgeEdges {
    pub outbound: (Point, Point),
    pub inbound: (Point, Point),
}

impl BridgeEdges {
    /// Both bridges as point pairs.
    pub fn segments(&self) -> [(Point, Point); 2] {
        [self.outbound, self.inbound]
    }
}

/// Sign sample at one caliper event.
#[derive(Clone, Copy, Debug)]
struct Sample {
    sign: i8,
    /// Caliper vertices just before the event.
    before: (usize, usize),
    /// Caliper vertices just after the event.
    after: (usize, usize),
}

/// Order two polygons so the first owns the global bottom-leftmost point.
pub(crate) fn primary_first<'a>(
    a: &'a ConvexPolygon,
    b: &'a ConvexPolygon,
) -> (&'a ConvexPolygon, &'a ConvexPolygon) {
    if b.first().is_lower_left_of(&a.first()) {
        (b, a)
    } else {
        (a, b)
    }
}

/// Compute the two bridge edges of the merged hull of disjoint `a` and `b`.
///
/// Runs in O(|a| + |b|). Fails with `InvalidBridge` unless exactly two sign
/// changes are found (overlapping, non-convex or mis-wound input).
pub fn compute_merge_lines(
    a: &ConvexPolygon,
    b: &ConvexPolygon,
) -> Result<BridgeEdges, GeometryError> {
    let (a, b) = primary_first(a, b);
    let samples = sweep(a, b);
    let (out, back) = locate_changes(&samples)?;
    let bridges = BridgeEdges {
        outbound: (a.vertex(out.0), b.vertex(out.1)),
        inbound: (b.vertex(back.1), a.vertex(back.0)),
    };
    trace!(
        outbound = ?(bridges.outbound.0.id, bridges.outbound.1.id),
        inbound = ?(bridges.inbound.0.id, bridges.inbound.1.id),
        "bridges"
    );
    Ok(bridges)
}

fn sweep(a: &ConvexPolygon, b: &ConvexPolygon) -> Vec<Sample> {
    let (na, nb) = (a.len(), b.len());
    let ea = edge_angles(a.points());
    let eb = edge_angles(b.points());
    let w = |i: usize, j: usize| -> Vec2 { b.vertex(j).pos - a.vertex(i).pos };

    let mut samples = Vec::with_capacity(na + nb + 1);
    samples.push(Sample {
        sign: cross_sign(direction_at(0.0), w(0, 0)),
        before: (0, 0),
        after: (0, 0),
    });
    let (mut i, mut j) = (0usize, 0usize);
    let mut last_angle = 0.0;
    while i < na || j < nb {
        let ang_a = if i < na { ea[i] } else { f64::INFINITY };
        let ang_b = if j < nb { eb[j] } else { f64::INFINITY };
        let before = (i % na, j % nb);
        let (dir, angle) = if (ang_a - ang_b).abs() <= ANGLE_EPS {
            let d = a.vertex(i + 1).pos - a.vertex(i).pos;
            i += 1;
            j += 1;
            (d, ang_a)
        } else if ang_a < ang_b {
            let d = a.vertex(i + 1).pos - a.vertex(i).pos;
            i += 1;
            (d, ang_a)
        } else {
            let d = b.vertex(j + 1).pos - b.vertex(j).pos;
            j += 1;
            (d, ang_b)
        };
        samples.push(Sample {
            sign: cross_sign(dir, w(before.0, before.1)),
            before,
            after: (i % na, j % nb),
        });
        last_angle = angle;
    }
    // An event at 2π coincides with the start sample; fold it in.
    if samples.len() > 1 && last_angle >= TAU - ANGLE_EPS {
        if let Some(end) = samples.pop() {
            samples[0].before = end.before;
        }
    } else if let Some(end) = samples.last().copied() {
        samples[0].before = end.after;
    }
    samples
}

/// Find the outbound (+ → −) and inbound (− → +) changes around the circle.
///
/// Returns the caliper pair `(i, j)` for each bridge.
fn locate_changes(samples: &[Sample]) -> Result<((usize, usize), (usize, usize)), GeometryError> {
    let m = samples.len();
    if samples.iter().all(|s| s.sign == 0) {
        return Err(GeometryError::bridge("caliper sweep is degenerate"));
    }
    let mut outbound = Vec::new();
    let mut inbound = Vec::new();
    for k in 0..m {
        let cur = samples[k];
        let next = samples[(k + 1) % m];
        if cur.sign != 0 && next.sign != 0 && cur.sign != next.sign {
            // Zero crossing strictly inside the interval after `cur`.
            if cur.sign > 0 {
                outbound.push(cur.after);
            } else {
                inbound.push(cur.after);
            }
        }
        if cur.sign == 0 && samples[(k + m - 1) % m].sign != 0 {
            // First sample of a run of zeros: compare the nonzero neighbours.
            let prev = samples[(k + m - 1) % m].sign;
            let mut step = 1;
            let mut after = next.sign;
            while after == 0 && step < m {
                step += 1;
                after = samples[(k + step) % m].sign;
            }
            if prev > 0 && after < 0 {
                // Bridge collinear with the edge being rounded: keep it short.
                outbound.push((cur.after.0, cur.before.1));
            } else if prev < 0 && after > 0 {
                inbound.push((cur.before.0, cur.after.1));
            }
        }
    }
    match (outbound.as_slice(), inbound.as_slice()) {
        ([out], [back]) => Ok((*out, *back)),
        _ => Err(GeometryError::bridge(format!(
            "expected exactly two orientation changes, found {} outbound and {} inbound",
            outbound.len(),
            inbound.len()
        ))),
    }
}

/// Tangent bridges from polygon `a` to an external point `p`.
///
/// `outbound` runs from the last vertex before the visible chain to `p`,
/// `inbound` from `p` to the first vertex after it. Edges collinear with `p`
/// count as visible so no bridge lies flush with an edge. Fails if `p` lies
/// inside or on `a`.
pub fn compute_single_point_merge_lines(
    a: &ConvexPolygon,
    p: Point,
) -> Result<BridgeEdges, GeometryError> {
    let n = a.len();
    let visible: Vec<bool> = (0..n)
        .map(|k| orientation(a.vertex(k).pos, a.vertex(k + 1).pos, p.pos) != Orientation::Left)
        .collect();
    if visible.iter().all(|v| !v) {
        return Err(GeometryError::bridge("point lies inside the polygon"));
    }
    if visible.iter().all(|v| *v) {
        return Err(GeometryError::bridge("point sees every edge"));
    }
    let mut start = None;
    let mut end = None;
    for k in 0..n {
        let prev = visible[(k + n - 1) % n];
        if visible[k] && !prev && start.replace(k).is_some() {
            return Err(GeometryError::bridge("visible edges are not contiguous"));
        }
        if visible[k] && !visible[(k + 1) % n] {
            end = Some((k + 1) % n);
        }
    }
    match (start, end) {
        (Some(s), Some(t)) => Ok(BridgeEdges {
            outbound: (a.vertex(s), p),
            inbound: (p, a.vertex(t)),
        }),
        _ => Err(GeometryError::bridge("no tangent vertices found")),
    }
}

use tracing::debug;

use super::bridges::{primary_first, BridgeEdges};
use crate::error::GeometryError;
use crate::geom2::{collinear, ConvexPolygon, Point};

/// Bridge endpoint positions, resolved by identity.
struct Anchors {
    /// Primary polygon: outbound start, inbound end.
    a_out: usize,
    a_in: usize,
    /// Secondary polygon: outbound end, inbound start.
    b_out: usize,
    b_in: usize,
}

fn resolve(
    a: &ConvexPolygon,
    b: &ConvexPolygon,
    bridges: &BridgeEdges,
) -> Result<Anchors, GeometryError> {
    let find = |poly: &ConvexPolygon, p: &Point, what: &str| {
        poly.index_of(p).ok_or_else(|| {
            GeometryError::bridge(format!("{what} endpoint {:?} not found in polygon", p.id))
        })
    };
    Ok(Anchors {
        a_out: find(a, &bridges.outbound.0, "outbound start")?,
        b_out: find(b, &bridges.outbound.1, "outbound end")?,
        b_in: find(b, &bridges.inbound.0, "inbound start")?,
        a_in: find(a, &bridges.inbound.1, "inbound end")?,
    })
}

/// Cyclic chain `from ..= to` of `poly`.
fn chain(poly: &ConvexPolygon, from: usize, to: usize) -> Vec<Point> {
    let n = poly.len();
    let len = (to + n - from) % n + 1;
    (0..len).map(|k| poly.vertex(from + k)).collect()
}

/// Chain that swallows the rest of the boundary: the whole cycle, closed,
/// when both endpoints coincide.
fn discarded_chain(poly: &ConvexPolygon, from: usize, to: usize) -> Vec<Point> {
    if from == to {
        let mut all = chain(poly, from, from + poly.len() - 1);
        all.push(poly.vertex(from));
        all
    } else {
        chain(poly, from, to)
    }
}

/// Drop every vertex that is collinear with its neighbours, including the
/// joins across the start of the cycle.
fn drop_collinear(seq: Vec<Point>) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(seq.len());
    for p in seq {
        while out.len() >= 2 && collinear(out[out.len() - 2].pos, out[out.len() - 1].pos, p.pos) {
            out.pop();
        }
        out.push(p);
    }
    loop {
        let n = out.len();
        if n < 3 {
            break;
        }
        if collinear(out[n - 2].pos, out[n - 1].pos, out[0].pos) {
            out.pop();
            continue;
        }
        if collinear(out[n - 1].pos, out[0].pos, out[1].pos) {
            out.remove(0);
            continue;
        }
        break;
    }
    out
}

/// Splice `a`, `b` and their bridges into the merged convex polygon.
///
/// Order: primary boundary up to the outbound bridge, the secondary chain
/// between the two bridge endpoints, then the rest of the primary boundary.
/// Collinear joins are removed and the result is validated.
pub fn merge_hulls(
    a: &ConvexPolygon,
    b: &ConvexPolygon,
    bridges: &BridgeEdges,
) -> Result<ConvexPolygon, GeometryError> {
    let (a, b) = primary_first(a, b);
    let at = resolve(a, b, bridges)?;
    if at.a_in != 0 && at.a_in <= at.a_out {
        return Err(GeometryError::bridge(format!(
            "bridges cross the primary start (out at {}, in at {})",
            at.a_out, at.a_in
        )));
    }
    let mut seq: Vec<Point> = a.points()[..=at.a_out].to_vec();
    seq.extend(chain(b, at.b_out, at.b_in));
    if at.a_in != 0 {
        seq.extend_from_slice(&a.points()[at.a_in..]);
    }
    let merged = ConvexPolygon::from_cycle(drop_collinear(seq))?;
    debug!(
        a = a.len(),
        b = b.len(),
        merged = merged.len(),
        "merged hulls"
    );
    Ok(merged)
}

/// Retained and discarded boundary chains of one input polygon.
///
/// Both chains run counter-clockwise and share the two bridge endpoints, so
/// the edges of `retained` survive in the union and the edges of `discarded`
/// do not.
#[derive(Clone, Debug)]
pub struct ChainSplit {
    pub retained: Vec<Point>,
    pub discarded: Vec<Point>,
}

/// Chain splits for both inputs, in the argument order of `compute_merge_bounds`.
#[derive(Clone, Debug)]
pub struct MergeBounds {
    pub first: ChainSplit,
    pub second: ChainSplit,
}

/// Partition each input boundary into the arc kept by the merge and the arc
/// swallowed by it.
pub fn compute_merge_bounds(
    a: &ConvexPolygon,
    b: &ConvexPolygon,
    bridges: &BridgeEdges,
) -> Result<MergeBounds, GeometryError> {
    let swapped = b.first().is_lower_left_of(&a.first());
    let (pa, pb) = primary_first(a, b);
    let at = resolve(pa, pb, bridges)?;
    let primary = ChainSplit {
        retained: chain(pa, at.a_in, at.a_out),
        discarded: discarded_chain(pa, at.a_out, at.a_in),
    };
    let secondary = ChainSplit {
        retained: chain(pb, at.b_out, at.b_in),
        discarded: discarded_chain(pb, at.b_in, at.b_out),
    };
    Ok(if swapped {
        MergeBounds {
            first: secondary,
            second: primary,
        }
    } else {
        MergeBounds {
            first: primary,
            second: secondary,
        }
    })
}

/// Merged hull of `a` and one external point `p`.
pub fn merge_with_point(a: &ConvexPolygon, p: Point) -> Result<ConvexPolygon, GeometryError> {
    let bridges = super::bridges::compute_single_point_merge_lines(a, p)?;
    let s = a
        .index_of(&bridges.outbound.0)
        .ok_or_else(|| GeometryError::bridge("tangent vertex missing"))?;
    let t = a
        .index_of(&bridges.inbound.1)
        .ok_or_else(|| GeometryError::bridge("tangent vertex missing"))?;
    let mut seq = chain(a, t, s);
    seq.push(p);
    ConvexPolygon::from_cycle(drop_collinear(seq))
}

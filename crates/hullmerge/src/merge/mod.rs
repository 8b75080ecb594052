//! Hull merge of two disjoint convex polygons.
//!
//! Purpose
//! - `compute_merge_lines`: the two bridge edges of the merged hull, found by
//!   a linear rotating-calipers sweep.
//! - `merge_hulls`: splice both boundaries and the bridges into the merged
//!   polygon (collinear joins removed, invariants re-checked).
//! - `compute_merge_bounds`: which boundary arcs survive the merge.
//! - `compute_single_point_merge_lines` / `merge_with_point`: the same for a
//!   polygon and one external point. Not used by the region merge path.
//!
//! Preconditions: both inputs satisfy the `ConvexPolygon` invariants and do
//! not overlap. Violations surface as `GeometryError::InvalidBridge`.

mod bridges;
mod splice;

pub use bridges::{compute_merge_lines, compute_single_point_merge_lines, BridgeEdges};
pub use splice::{compute_merge_bounds, merge_hulls, merge_with_point, ChainSplit, MergeBounds};

use crate::error::GeometryError;
use crate::geom2::ConvexPolygon;

/// Bridges and merged polygon in one call.
pub fn merge(
    a: &ConvexPolygon,
    b: &ConvexPolygon,
) -> Result<(BridgeEdges, ConvexPolygon), GeometryError> {
    let bridges = compute_merge_lines(a, b)?;
    let merged = merge_hulls(a, b, &bridges)?;
    Ok((bridges, merged))
}

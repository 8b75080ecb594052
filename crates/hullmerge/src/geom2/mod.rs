//! 2D geometry primitives for convex regions.
//!
//! Purpose
//! - Identity-carrying points (`Point`, `VertexArena`), segments and
//!   rectangles.
//! - Orientation, collinearity (shared `EPS`), line/segment intersection,
//!   sweep angles, area and centroid.
//! - `ConvexPolygon` with checked invariants and a monotone-chain hull.
//!
//! Conventions
//! - Counter-clockwise winding, interior to the left of every directed edge.
//! - Angles for the caliper sweep are measured from the downward vertical.

pub mod cfg;
mod hull;
mod polygon;
pub mod predicates;
pub mod rand;
mod types;

pub use cfg::EPS;
pub use hull::convex_hull;
pub use polygon::ConvexPolygon;
pub(crate) use polygon::edge_angles;
pub use predicates::{
    angle_from_vertical, centroid, collinear, cross, line_intersection, orientation,
    segment_intersection, segments_cross, signed_area, Orientation,
};
pub use types::{lex_less, Point, Rect, RegionId, Segment, Vec2, VertexArena, VertexId};

#[cfg(test)]
mod tests;

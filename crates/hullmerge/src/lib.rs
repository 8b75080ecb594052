//! Convex-region geometry engine.
//!
//! Modules
//! - `geom2`: points with identity, predicates sharing one tolerance,
//!   `ConvexPolygon`, convex hull, reproducible random playfields.
//! - `merge`: rotating-calipers bridges and hull splicing of two disjoint
//!   convex polygons.
//! - `partition`: partition trees (axis-split and point-conjugate) answering
//!   segment-crossing queries against region boundaries.
//! - `locate`: trapezoidal map for point location with undoable insertion.
//! - `regions`: the live region set tying the above together.
//!
//! API Policy
//! - Single-threaded and synchronous. Mutation needs `&mut`; queries take
//!   `&self`, so the borrow checker enforces single writer / many readers.
//! - Geometry precondition violations surface as `GeometryError`, never as a
//!   best-effort result.

pub mod error;
pub mod geom2;
pub mod locate;
pub mod merge;
pub mod partition;
pub mod regions;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::GeometryError;
pub use geom2::{ConvexPolygon, Point, RegionId, Vec2, EPS};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::error::GeometryError;
    pub use crate::geom2::rand::{scatter_regions, RadialCfg, ReplayToken, ScatterCfg, VertexCount};
    pub use crate::geom2::{
        convex_hull, ConvexPolygon, Point, Rect, RegionId, Segment, Vec2, VertexArena, EPS,
    };
    pub use crate::locate::TrapezoidMap;
    pub use crate::merge::{compute_merge_lines, merge, merge_hulls, BridgeEdges};
    pub use crate::partition::{PartitionIndex, PartitionKind, SegmentIndex};
    pub use crate::regions::{MergePlan, Region, RegionSet};
}

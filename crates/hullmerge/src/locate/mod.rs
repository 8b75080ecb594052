//! Planar point location over disjoint convex regions.
//!
//! Purpose
//! - Answer "which region contains this point?" while regions are inserted,
//!   removed and merged.
//!
//! Approach
//! - Trapezoidal decomposition of a fixed bounding rectangle, built by
//!   randomized incremental insertion of region edges. Each cell keeps up to
//!   two left and two right neighbours; the history DAG of X (vertex) and
//!   Y (segment) nodes locates points in expected logarithmic time.
//! - Ties in x are broken lexicographically on (x, y), which acts as a
//!   symbolic shear: no two distinct vertices share a wall.
//! - Cell ownership is read from the bottom edge: a cell belongs to a region
//!   exactly when it lies on the interior side of that region's lower edge.
//! - The edge order of each region is shuffled with a seed mixed from the map
//!   seed and the region id, so builds are reproducible.
//!
//! Removal
//! - Each insertion keeps a journal of the cells and nodes it overwrote.
//!   Removing the most recent region replays the journal backwards; anything
//!   else rebuilds the map from the remaining regions.
//!
//! Concurrency: single writer. `query` takes `&self` and can run from many
//!   readers between mutations.
//!
//! References
//! - de Berg et al., Computational Geometry, ch. 6.
//! - Seidel, "A simple and fast incremental randomized algorithm for
//!   computing trapezoidal decompositions", 1991.

mod map;
mod types;


pub use map::TrapezoidMap;
pub use types::CellSig;

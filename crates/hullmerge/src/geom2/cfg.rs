//! Tolerance defaults for 2D predicates (internal).
//!
//! Policy
//! - One tolerance for every "collinear", "on-segment" and "approximately
//!   equal" test. The hull merge and the partition trees must agree on what
//!   counts as touching, otherwise a bridge accepted by one is rejected by the
//!   other.

/// Shared geometric tolerance.
///
/// Collinearity is scale-free (compared against the sine of the turn angle);
/// extent checks use it as an absolute slack on coordinates.
pub const EPS: f64 = 5e-6;

/// Tolerance for comparing sweep angles (radians) in the caliper merge.
pub(crate) const ANGLE_EPS: f64 = 1e-12;

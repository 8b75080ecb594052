//! Error taxonomy of the engine.
//!
//! Precondition violations are never recovered locally: a silently wrong merge
//! would corrupt every later query, so they surface here instead.

/// Errors surfaced by polygon construction, merging and region bookkeeping.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// Input violates a convex-polygon invariant (or cannot be placed).
    #[error("invalid polygon: {reason}")]
    InvalidPolygon { reason: String },

    /// The caliper sweep did not produce exactly two bridges.
    #[error("invalid bridge: {reason}")]
    InvalidBridge { reason: String },
}

impl GeometryError {
    pub(crate) fn polygon(reason: impl Into<String>) -> Self {
        Self::InvalidPolygon {
            reason: reason.into(),
        }
    }

    pub(crate) fn bridge(reason: impl Into<String>) -> Self {
        Self::InvalidBridge {
            reason: reason.into(),
        }
    }
}

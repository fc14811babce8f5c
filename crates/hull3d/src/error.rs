//! Error type shared by every hull engine.
//!
//! Input-shape problems (`DegenerateInput`) are recoverable and meant for callers.
//! The remaining variants flag broken internal invariants or pathological input the
//! kinetic merge cannot resolve; they are developer-facing and never silently ignored.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum HullError {
    /// Fewer than 4 usable points, or the points span no tetrahedron.
    #[error("degenerate input: {reason}")]
    DegenerateInput { reason: String },

    /// An adjacency or coverage invariant of the mesh no longer holds.
    #[error("mesh consistency violated: {0}")]
    MeshConsistency(String),

    /// Bridge search or kinetic loop exceeded its iteration bound.
    #[error("merge did not terminate: {reason}")]
    MergeNontermination { reason: String },

    /// A working container outgrew its hard bound.
    #[error("{what} exceeded capacity {limit}")]
    CapacityExceeded { what: &'static str, limit: usize },
}

impl HullError {
    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn consistency(reason: impl Into<String>) -> Self {
        Self::MeshConsistency(reason.into())
    }

    pub(crate) fn nontermination(reason: impl Into<String>) -> Self {
        Self::MergeNontermination {
            reason: reason.into(),
        }
    }

    /// True for errors that indicate a bug rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::MeshConsistency(_) | Self::CapacityExceeded { .. })
    }
}

pub type Result<T> = std::result::Result<T, HullError>;

//! Crate-wide error type.
//!
//! Per-indexer and per-mapping-source failures are deliberately absent here:
//! they are caught and logged at the unit boundary and never reach callers.
//! What does reach callers is bad input (`InvalidArgument`), episode data
//! that makes a search impossible (`PreconditionFailed`), and failures of
//! the catalog or decision engine (`Upstream`).

/// Error type for the search core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A title or other argument violated a contract (e.g. blank input to
    /// the query-title normalizer).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The episode data in scope is missing a field this search requires,
    /// e.g. a daily episode without an air date. Fatal to the single search
    /// invocation; indicates a data-quality problem the user should fix.
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    /// The series/episode catalog or the decision engine failed.
    #[error("Upstream failure: {0}")]
    Upstream(#[source] anyhow::Error),
}

impl Error {
    /// Create a new InvalidArgument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a new PreconditionFailed error.
    pub fn precondition<S: Into<String>>(msg: S) -> Self {
        Self::PreconditionFailed(msg.into())
    }

    /// Wrap a collaborator failure that must propagate to the caller.
    pub fn upstream(err: anyhow::Error) -> Self {
        Self::Upstream(err)
    }
}

/// Result type alias using the crate Error.
pub type Result<T> = std::result::Result<T, Error>;

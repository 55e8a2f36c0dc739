//! Decision engine collaborator interface.
//!
//! The search core aggregates raw releases; deciding which of them are worth
//! grabbing (quality, language, already-have checks) belongs to the external
//! decision engine consumed through [`DecisionEngine`].

use crate::indexers::Release;
use crate::search::SearchCriteria;

/// Verdict from the decision engine for one candidate release.
#[derive(Debug, Clone)]
pub struct Decision {
    pub release: Release,
    pub approved: bool,
    /// Reasons the release was rejected; empty when approved.
    pub rejections: Vec<String>,
}

/// Scores aggregated search results against the originating criteria.
///
/// Called exactly once per dispatched criteria, including with an empty
/// result set when no indexer contributed anything. A failure here
/// propagates to the caller of the public search API as
/// [`crate::Error::Upstream`].
pub trait DecisionEngine: Send + Sync {
    fn search_decisions(
        &self,
        reports: Vec<Release>,
        criteria: &SearchCriteria,
    ) -> anyhow::Result<Vec<Decision>>;
}

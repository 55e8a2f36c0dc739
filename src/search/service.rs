//! Search orchestration and indexer dispatch.

use std::sync::Arc;

use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, error, info};

use crate::config::SearchConfig;
use crate::decision::{Decision, DecisionEngine};
use crate::error::{Error, Result};
use crate::indexers::{FeedFetcher, IndexerRegistry, Release};
use crate::scene::SceneMappingService;
use crate::tv::{Catalog, Episode, EpisodeId, SeriesId};

use super::builder::CriteriaBuilder;
use super::criteria::SearchCriteria;

/// Entry point for episode and season release searches.
pub struct SearchService {
    catalog: Arc<dyn Catalog>,
    registry: Arc<IndexerRegistry>,
    fetcher: Arc<dyn FeedFetcher>,
    decision: Arc<dyn DecisionEngine>,
    builder: CriteriaBuilder,
    config: SearchConfig,
}

impl SearchService {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        registry: Arc<IndexerRegistry>,
        fetcher: Arc<dyn FeedFetcher>,
        decision: Arc<dyn DecisionEngine>,
        scene: Arc<SceneMappingService>,
        config: SearchConfig,
    ) -> Self {
        Self {
            catalog,
            registry,
            fetcher,
            decision,
            builder: CriteriaBuilder::new(scene),
            config,
        }
    }

    /// Search every capable indexer for one episode by id.
    pub async fn episode_search(&self, episode_id: EpisodeId) -> Result<Vec<Decision>> {
        let episode = self
            .catalog
            .episode(episode_id)
            .await
            .map_err(Error::upstream)?;

        self.episode_search_for(episode).await
    }

    /// Search every capable indexer for an already-resolved episode.
    pub async fn episode_search_for(&self, episode: Episode) -> Result<Vec<Decision>> {
        let series = self
            .catalog
            .series(episode.series_id)
            .await
            .map_err(Error::upstream)?;

        let criteria = self.builder.for_episode(&series, episode)?;
        self.dispatch(criteria).await
    }

    /// Search every capable indexer for a whole season.
    ///
    /// A scene-numbered series may split into several dispatches, one per
    /// scene season group; their decisions are concatenated.
    pub async fn season_search(
        &self,
        series_id: SeriesId,
        season_number: i32,
    ) -> Result<Vec<Decision>> {
        let series = self
            .catalog
            .series(series_id)
            .await
            .map_err(Error::upstream)?;
        let episodes = self
            .catalog
            .episodes_by_season(series_id, season_number)
            .await
            .map_err(Error::upstream)?;

        let mut decisions = Vec::new();
        for criteria in self.builder.for_season(&series, season_number, episodes)? {
            decisions.extend(self.dispatch(criteria).await?);
        }

        Ok(decisions)
    }

    /// Fan one criteria out to every enabled, search-capable indexer.
    ///
    /// One task per indexer; a task failure (fetch error, timeout, panic) is
    /// logged with the indexer's identity and contributes zero results.
    /// Returns only after every task has completed, then hands the aggregate
    /// to the decision engine - even when it is empty.
    async fn dispatch(&self, criteria: SearchCriteria) -> Result<Vec<Decision>> {
        let indexers = self.registry.searchable();

        info!(indexers = indexers.len(), criteria = %criteria, "Searching indexers");

        let mut tasks = JoinSet::new();
        for indexer in indexers {
            let fetcher = Arc::clone(&self.fetcher);
            let criteria = criteria.clone();
            let indexer_timeout = self.config.indexer_timeout();

            tasks.spawn(async move {
                let name = indexer.name().to_string();
                match timeout(indexer_timeout, fetcher.fetch(indexer, &criteria)).await {
                    Ok(Ok(releases)) => Some(releases),
                    Ok(Err(e)) => {
                        error!(
                            indexer = %name,
                            criteria = %criteria,
                            error = %e,
                            "Error while searching indexer"
                        );
                        None
                    }
                    Err(_) => {
                        error!(
                            indexer = %name,
                            criteria = %criteria,
                            "Indexer search timed out"
                        );
                        None
                    }
                }
            });
        }

        // Unconditional join barrier: every task completes (or fails) before
        // the aggregate moves on. Results flow back through the join, so the
        // only order guarantee is within one indexer's contribution.
        let mut reports: Vec<Release> = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Some(releases)) => reports.extend(releases),
                Ok(None) => {}
                Err(e) => {
                    error!(criteria = %criteria, error = %e, "Indexer search task panicked")
                }
            }
        }

        debug!(
            reports = reports.len(),
            criteria = %criteria,
            "Search finished"
        );

        self.decision
            .search_decisions(reports, &criteria)
            .map_err(Error::upstream)
    }
}

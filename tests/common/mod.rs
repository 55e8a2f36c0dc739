//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which wires a [`SearchService`] over stub
//! collaborators: a static catalog, canned per-indexer feed results, and a
//! recording decision engine that approves everything it is given.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use scenehound::{
    Catalog, Decision, DecisionEngine, DownloadProtocol, Episode, EpisodeId, FeedFetcher, Indexer,
    IndexerCapabilities, IndexerRegistry, MemoryMappingStore, Release, SceneMapping,
    SceneMappingService, SceneMappingStore, SearchConfig, SearchCriteria, SearchService, Series,
    SeriesId, SeriesType,
};

// ---------------------------------------------------------------------------
// Stub indexers
// ---------------------------------------------------------------------------

/// Fixed-capability indexer stub.
pub struct StubIndexer {
    name: String,
    enabled: bool,
    capabilities: IndexerCapabilities,
}

impl StubIndexer {
    /// An enabled indexer that accepts search queries.
    pub fn searching(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            enabled: true,
            capabilities: IndexerCapabilities {
                supports_searching: true,
                page_size: 0,
                protocol: DownloadProtocol::Usenet,
            },
        })
    }

    /// An enabled indexer that only publishes a recent feed.
    pub fn feed_only(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            enabled: true,
            capabilities: IndexerCapabilities {
                supports_searching: false,
                page_size: 0,
                protocol: DownloadProtocol::Usenet,
            },
        })
    }

    /// A configured but disabled indexer.
    pub fn disabled(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            enabled: false,
            capabilities: IndexerCapabilities {
                supports_searching: true,
                page_size: 0,
                protocol: DownloadProtocol::Usenet,
            },
        })
    }
}

impl Indexer for StubIndexer {
    fn name(&self) -> &str {
        &self.name
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn capabilities(&self) -> IndexerCapabilities {
        self.capabilities
    }
}

// ---------------------------------------------------------------------------
// Stub feed fetcher
// ---------------------------------------------------------------------------

/// One observed fetch call.
#[derive(Debug, Clone)]
pub struct FetchRecord {
    pub indexer: String,
    pub criteria: String,
    pub scene_title: String,
    pub query_title: String,
}

/// Feed fetcher returning canned results per indexer name.
///
/// Indexers marked failing raise instead; indexers marked hanging sleep past
/// any sane dispatch timeout. Every call is recorded.
#[derive(Default)]
pub struct StaticFetcher {
    results: Mutex<HashMap<String, Vec<Release>>>,
    failing: Mutex<Vec<String>>,
    hanging: Mutex<Vec<String>>,
    records: Mutex<Vec<FetchRecord>>,
}

impl StaticFetcher {
    pub fn set_results(&self, indexer: &str, releases: Vec<Release>) {
        self.results.lock().insert(indexer.to_string(), releases);
    }

    pub fn fail(&self, indexer: &str) {
        self.failing.lock().push(indexer.to_string());
    }

    pub fn hang(&self, indexer: &str) {
        self.hanging.lock().push(indexer.to_string());
    }

    /// Every fetch observed so far, in call order.
    pub fn records(&self) -> Vec<FetchRecord> {
        self.records.lock().clone()
    }

    /// Number of criteria dispatched to one indexer.
    pub fn fetches_for(&self, indexer: &str) -> usize {
        self.records
            .lock()
            .iter()
            .filter(|r| r.indexer == indexer)
            .count()
    }
}

#[async_trait]
impl FeedFetcher for StaticFetcher {
    async fn fetch(
        &self,
        indexer: Arc<dyn Indexer>,
        criteria: &SearchCriteria,
    ) -> anyhow::Result<Vec<Release>> {
        self.records.lock().push(FetchRecord {
            indexer: indexer.name().to_string(),
            criteria: criteria.to_string(),
            scene_title: criteria.scene_title.clone(),
            query_title: criteria.query_title.clone(),
        });

        if self.hanging.lock().iter().any(|n| n == indexer.name()) {
            tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        }

        if self.failing.lock().iter().any(|n| n == indexer.name()) {
            anyhow::bail!("connection refused");
        }

        Ok(self
            .results
            .lock()
            .get(indexer.name())
            .cloned()
            .unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Recording decision engine
// ---------------------------------------------------------------------------

/// Decision engine approving every release, recording each call's report
/// count. Can be switched to fail for upstream-propagation tests.
#[derive(Default)]
pub struct RecordingDecisionEngine {
    report_counts: Mutex<Vec<usize>>,
    fail: Mutex<bool>,
}

impl RecordingDecisionEngine {
    pub fn fail_next_calls(&self) {
        *self.fail.lock() = true;
    }

    /// Report counts of every call observed so far, in call order.
    pub fn report_counts(&self) -> Vec<usize> {
        self.report_counts.lock().clone()
    }
}

impl DecisionEngine for RecordingDecisionEngine {
    fn search_decisions(
        &self,
        reports: Vec<Release>,
        _criteria: &SearchCriteria,
    ) -> anyhow::Result<Vec<Decision>> {
        self.report_counts.lock().push(reports.len());

        if *self.fail.lock() {
            anyhow::bail!("decision engine offline");
        }

        Ok(reports
            .into_iter()
            .map(|release| Decision {
                release,
                approved: true,
                rejections: Vec::new(),
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Static catalog
// ---------------------------------------------------------------------------

/// Catalog over fixed series and episode lists.
#[derive(Default)]
pub struct StaticCatalog {
    series: Mutex<Vec<Series>>,
    episodes: Mutex<Vec<Episode>>,
}

impl StaticCatalog {
    pub fn add_series(&self, series: Series) {
        self.series.lock().push(series);
    }

    pub fn add_episode(&self, episode: Episode) {
        self.episodes.lock().push(episode);
    }
}

#[async_trait]
impl Catalog for StaticCatalog {
    async fn series(&self, id: SeriesId) -> anyhow::Result<Series> {
        self.series
            .lock()
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("series {id} not found"))
    }

    async fn episode(&self, id: EpisodeId) -> anyhow::Result<Episode> {
        self.episodes
            .lock()
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("episode {id} not found"))
    }

    async fn episodes_by_season(
        &self,
        series_id: SeriesId,
        season_number: i32,
    ) -> anyhow::Result<Vec<Episode>> {
        Ok(self
            .episodes
            .lock()
            .iter()
            .filter(|e| e.series_id == series_id && e.season_number == season_number)
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

/// Test harness wrapping a fully-constructed [`SearchService`] over stub
/// collaborators.
pub struct TestHarness {
    pub catalog: Arc<StaticCatalog>,
    pub fetcher: Arc<StaticFetcher>,
    pub decisions: Arc<RecordingDecisionEngine>,
    pub scene: Arc<SceneMappingService>,
    pub service: SearchService,
}

impl TestHarness {
    /// Create a harness with the given indexers and no scene mappings.
    pub async fn new(indexers: Vec<Arc<StubIndexer>>) -> Self {
        Self::build(indexers, Vec::new(), SearchConfig::default()).await
    }

    /// Create a harness with scene mappings preloaded into the cache.
    pub async fn with_mappings(
        indexers: Vec<Arc<StubIndexer>>,
        mappings: Vec<SceneMapping>,
    ) -> Self {
        Self::build(indexers, mappings, SearchConfig::default()).await
    }

    /// Create a harness with a custom search configuration.
    pub async fn with_config(indexers: Vec<Arc<StubIndexer>>, config: SearchConfig) -> Self {
        Self::build(indexers, Vec::new(), config).await
    }

    async fn build(
        indexers: Vec<Arc<StubIndexer>>,
        mappings: Vec<SceneMapping>,
        config: SearchConfig,
    ) -> Self {
        let mut registry = IndexerRegistry::new();
        for indexer in indexers {
            registry.register(indexer);
        }

        let store = Arc::new(MemoryMappingStore::new());
        store.insert_many(mappings).expect("insert mappings");
        let scene = Arc::new(SceneMappingService::new(Vec::new(), store));
        scene.refresh().await;

        let catalog = Arc::new(StaticCatalog::default());
        let fetcher = Arc::new(StaticFetcher::default());
        let decisions = Arc::new(RecordingDecisionEngine::default());

        let service = SearchService::new(
            catalog.clone(),
            Arc::new(registry),
            fetcher.clone(),
            decisions.clone(),
            scene.clone(),
            config,
        );

        Self {
            catalog,
            fetcher,
            decisions,
            scene,
            service,
        }
    }
}

// ---------------------------------------------------------------------------
// Fixture builders
// ---------------------------------------------------------------------------

pub fn standard_series(id: SeriesId, title: &str) -> Series {
    Series {
        id,
        title: title.to_string(),
        series_type: SeriesType::Standard,
        use_scene_numbering: false,
    }
}

pub fn scene_numbered_series(id: SeriesId, title: &str) -> Series {
    Series {
        use_scene_numbering: true,
        ..standard_series(id, title)
    }
}

pub fn daily_series(id: SeriesId, title: &str) -> Series {
    Series {
        series_type: SeriesType::Daily,
        ..standard_series(id, title)
    }
}

pub fn episode(id: EpisodeId, series_id: SeriesId, season: i32, number: i32) -> Episode {
    Episode {
        id,
        series_id,
        season_number: season,
        episode_number: number,
        scene_season_number: 0,
        scene_episode_number: 0,
        title: None,
        air_date: None,
        absolute_episode_number: None,
    }
}

pub fn release(indexer: &str, title: &str) -> Release {
    Release {
        title: title.to_string(),
        download_url: format!("https://{indexer}.example/get/{title}"),
        indexer: indexer.to_string(),
        size: Some(1_073_741_824),
        publish_date: None,
    }
}

/// A mapping row ready for the in-memory store (parse term derived).
pub fn mapping(alias: &str, series_id: SeriesId, season_number: i32) -> SceneMapping {
    SceneMapping {
        title: alias.to_string(),
        parse_term: scenehound::title::normalize(alias).expect("normalizable alias"),
        series_id,
        season_number,
        source: "test".to_string(),
    }
}

//! Indexer registration and capability model.
//!
//! An indexer is an external content index that can be queried for releases.
//! This module defines the [`Indexer`] trait with its static
//! [`IndexerCapabilities`] descriptor, the [`Release`] record indexers
//! return, the [`FeedFetcher`] collaborator that performs the actual HTTP
//! fetch and feed parsing, and the [`IndexerRegistry`] the dispatcher
//! snapshots on every search.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::search::SearchCriteria;

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Transfer protocol a release is downloaded over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadProtocol {
    Usenet,
    Torrent,
}

/// Static capability descriptor attached to each indexer registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexerCapabilities {
    /// Whether the indexer accepts search queries at all. Indexers that only
    /// publish a recent feed are skipped by the dispatcher.
    pub supports_searching: bool,
    /// Page size for paged feeds; 0 means the indexer cannot page.
    pub page_size: u32,
    pub protocol: DownloadProtocol,
}

impl IndexerCapabilities {
    /// Whether paged fetching is available.
    pub fn supports_paging(&self) -> bool {
        self.page_size > 0
    }
}

// ---------------------------------------------------------------------------
// Releases
// ---------------------------------------------------------------------------

/// A single release found on an indexer.
///
/// The search core only accumulates these; interpreting them is the decision
/// engine's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub title: String,
    pub download_url: String,
    /// Name of the indexer that returned this release.
    pub indexer: String,
    pub size: Option<u64>,
    pub publish_date: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Collaborator traits
// ---------------------------------------------------------------------------

/// An external content index capable of being queried for releases.
pub trait Indexer: Send + Sync {
    /// Short identifier for this indexer (e.g. `"nzbplanet"`).
    fn name(&self) -> &str;

    /// Whether the indexer is currently enabled in configuration.
    fn enabled(&self) -> bool {
        true
    }

    /// The indexer's static capability descriptor.
    fn capabilities(&self) -> IndexerCapabilities;
}

/// Fetches and parses one indexer's feed for a search criteria.
///
/// Implementations own HTTP, retries, and response parsing. Errors raised
/// here are caught at the dispatch unit boundary and contribute zero
/// results; they never fail the overall search.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(
        &self,
        indexer: Arc<dyn Indexer>,
        criteria: &SearchCriteria,
    ) -> anyhow::Result<Vec<Release>>;
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Registry of configured indexers.
///
/// Indexers are stored in registration order. The dispatcher takes one
/// [`searchable`](Self::searchable) snapshot per search call; registration
/// changes after that point do not affect an in-flight search.
pub struct IndexerRegistry {
    indexers: Vec<Arc<dyn Indexer>>,
}

impl IndexerRegistry {
    /// Create an empty registry with no indexers.
    pub fn new() -> Self {
        Self {
            indexers: Vec::new(),
        }
    }

    /// Register a new indexer.
    pub fn register(&mut self, indexer: Arc<dyn Indexer>) {
        self.indexers.push(indexer);
    }

    /// All enabled indexers.
    pub fn available(&self) -> Vec<Arc<dyn Indexer>> {
        self.indexers
            .iter()
            .filter(|i| i.enabled())
            .cloned()
            .collect()
    }

    /// All enabled indexers that accept search queries.
    pub fn searchable(&self) -> Vec<Arc<dyn Indexer>> {
        self.indexers
            .iter()
            .filter(|i| i.enabled() && i.capabilities().supports_searching)
            .cloned()
            .collect()
    }

    /// Look up an indexer by name, whether or not it is enabled.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Indexer>> {
        self.indexers.iter().find(|i| i.name() == name).cloned()
    }
}

impl Default for IndexerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

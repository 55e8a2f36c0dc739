//! Scenehound - release search dispatch for TV episode automation
//!
//! This crate implements the search core of a TV release automation stack:
//! translating episode identity into provider-agnostic search criteria,
//! resolving scene (release group) naming back to canonical series identity
//! through a cached mapping layer, and fanning searches out across an open
//! set of indexers with per-indexer failure isolation.
//!
//! The HTTP feed layer, the relevance/decision engine, the series catalog,
//! and mapping persistence are consumed through the traits in [`tv`],
//! [`indexers`], [`decision`], and [`scene`].

pub mod config;
pub mod decision;
pub mod error;
pub mod indexers;
pub mod scene;
pub mod search;
pub mod title;
pub mod tv;

pub use config::SearchConfig;
pub use decision::{Decision, DecisionEngine};
pub use error::{Error, Result};
pub use indexers::{
    DownloadProtocol, FeedFetcher, Indexer, IndexerCapabilities, IndexerRegistry, Release,
};
pub use scene::{
    MemoryMappingStore, SceneMapping, SceneMappingService, SceneMappingSource, SceneMappingStore,
};
pub use search::{CriteriaBuilder, CriteriaKind, SearchCriteria, SearchService};
pub use tv::{Catalog, Episode, EpisodeId, Series, SeriesId, SeriesType};

//! Scene-name mapping between release-group naming and canonical identity.
//!
//! Release groups frequently publish a show under names (and season
//! boundaries) that diverge from the catalog. This module maintains the
//! alias table that bridges the two worlds.
//!
//! # Module layout
//!
//! - [`types`] -- Mapping rows plus the source and backing-store traits.
//! - [`service`] -- The caching lookup layer and its refresh cycle.

pub mod service;
pub mod types;

pub use service::SceneMappingService;
pub use types::{MemoryMappingStore, SceneMapping, SceneMappingSource, SceneMappingStore};

//! Scene mapping rows and collaborator traits.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::tv::SeriesId;

/// A stored alias linking a release group's naming to canonical identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneMapping {
    /// The alias as release groups use it.
    pub title: String,

    /// Normalized alias, derived during refresh; the forward-index key.
    #[serde(default)]
    pub parse_term: String,

    /// Canonical id of the series the alias maps to.
    pub series_id: SeriesId,

    /// Season the alias applies to; -1 applies to all seasons.
    #[serde(default = "all_seasons")]
    pub season_number: i32,

    /// Tag of the mapping source that produced this row; filled during
    /// refresh.
    #[serde(default)]
    pub source: String,
}

fn all_seasons() -> i32 {
    -1
}

/// One external provider of scene mappings.
#[async_trait]
pub trait SceneMappingSource: Send + Sync {
    /// Tag rows from this source are stored under.
    fn name(&self) -> &str;

    /// Fetch the source's current full mapping list.
    async fn fetch_mappings(&self) -> anyhow::Result<Vec<SceneMapping>>;
}

/// Backing store for mapping rows.
///
/// Rows are bulk-replaced per source tag on refresh and read back in full
/// when the in-memory indices are rebuilt; the store is never consulted on
/// the lookup path.
pub trait SceneMappingStore: Send + Sync {
    /// Delete every row tagged with `source`.
    fn clear(&self, source: &str) -> anyhow::Result<()>;

    /// Insert a prepared batch of rows.
    fn insert_many(&self, rows: Vec<SceneMapping>) -> anyhow::Result<()>;

    /// Read back every stored row.
    fn all(&self) -> anyhow::Result<Vec<SceneMapping>>;
}

/// In-memory [`SceneMappingStore`], the default for hosts that do not
/// persist mappings between runs (and for tests).
#[derive(Default)]
pub struct MemoryMappingStore {
    rows: Mutex<Vec<SceneMapping>>,
}

impl MemoryMappingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SceneMappingStore for MemoryMappingStore {
    fn clear(&self, source: &str) -> anyhow::Result<()> {
        self.rows.lock().retain(|m| m.source != source);
        Ok(())
    }

    fn insert_many(&self, rows: Vec<SceneMapping>) -> anyhow::Result<()> {
        self.rows.lock().extend(rows);
        Ok(())
    }

    fn all(&self) -> anyhow::Result<Vec<SceneMapping>> {
        Ok(self.rows.lock().clone())
    }
}

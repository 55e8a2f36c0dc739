//! Cached lookup layer over scene mapping rows.
//!
//! Two indices are kept: a forward index from normalized alias to mapping
//! (series id plus season hint) and a reverse index from series id to its
//! aliases. Both live in one [`SceneIndex`] value published behind an `Arc`;
//! a refresh builds the next generation completely before swapping it in, so
//! a reader never observes the forward index of one generation next to the
//! reverse index of another.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, error, info, warn};

use crate::title;
use crate::tv::SeriesId;

use super::types::{SceneMapping, SceneMappingSource, SceneMappingStore};

/// One immutable generation of both mapping indices.
#[derive(Default)]
struct SceneIndex {
    by_term: HashMap<String, SceneMapping>,
    by_series: HashMap<SeriesId, Vec<SceneMapping>>,
}

/// Caching resolver between scene naming and canonical series identity.
pub struct SceneMappingService {
    sources: Vec<Arc<dyn SceneMappingSource>>,
    store: Arc<dyn SceneMappingStore>,
    index: RwLock<Arc<SceneIndex>>,
}

impl SceneMappingService {
    /// Create a service over the given sources and backing store.
    ///
    /// The indices start empty; call [`refresh`](Self::refresh) on startup
    /// (and again on an explicit update command) to populate them.
    pub fn new(
        sources: Vec<Arc<dyn SceneMappingSource>>,
        store: Arc<dyn SceneMappingStore>,
    ) -> Self {
        Self {
            sources,
            store,
            index: RwLock::new(Arc::new(SceneIndex::default())),
        }
    }

    fn snapshot(&self) -> Arc<SceneIndex> {
        Arc::clone(&self.index.read())
    }

    /// Canonical series id for a scene title, if a mapping exists.
    ///
    /// Blank titles resolve to `None`; the lookup path never errors.
    pub fn canonical_series_id(&self, title: &str) -> Option<SeriesId> {
        let term = title::normalize(title).ok()?;
        self.snapshot().by_term.get(&term).map(|m| m.series_id)
    }

    /// Season hint carried by the forward-index entry for a scene title.
    ///
    /// Shares the entry with [`canonical_series_id`](Self::canonical_series_id);
    /// -1 means the alias applies to all seasons.
    pub fn season_number(&self, title: &str) -> Option<i32> {
        let term = title::normalize(title).ok()?;
        self.snapshot().by_term.get(&term).map(|m| m.season_number)
    }

    /// Every alias for `series_id` scoped to one of `season_numbers` or to
    /// all seasons (-1), distinct, non-English aliases suppressed.
    ///
    /// Unknown ids yield an empty vec, never an error.
    pub fn scene_names(&self, series_id: SeriesId, season_numbers: &[i32]) -> Vec<String> {
        let snapshot = self.snapshot();
        let Some(mappings) = snapshot.by_series.get(&series_id) else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        mappings
            .iter()
            .filter(|m| m.season_number == -1 || season_numbers.contains(&m.season_number))
            .map(|m| m.title.clone())
            .filter(|title| is_english(title))
            .filter(|title| seen.insert(title.clone()))
            .collect()
    }

    /// All mapping rows for a series, any season.
    pub fn mappings_for(&self, series_id: SeriesId) -> Vec<SceneMapping> {
        self.snapshot()
            .by_series
            .get(&series_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Re-fetch every mapping source, replace each source's rows in the
    /// backing store, and publish a fresh index generation.
    ///
    /// A failing source is logged and skipped; the remaining sources still
    /// update. No lock is held while sources are fetched - the final
    /// snapshot swap is the only point serialized against readers.
    /// Idempotent and safe to call concurrently with lookups.
    pub async fn refresh(&self) {
        info!("Updating scene mappings");

        for source in &self.sources {
            if let Err(e) = self.update_source(source.as_ref()).await {
                error!(source = source.name(), error = %e, "Failed to update scene mappings");
            }
        }

        self.rebuild();
    }

    async fn update_source(&self, source: &dyn SceneMappingSource) -> anyhow::Result<()> {
        let mappings = source.fetch_mappings().await?;

        if mappings.is_empty() {
            warn!(
                source = source.name(),
                "Received empty mapping list, keeping existing rows"
            );
            return Ok(());
        }

        let rows = prepare_rows(mappings, source.name());
        self.store.clear(source.name())?;
        self.store.insert_many(rows)?;

        Ok(())
    }

    /// Rebuild both indices from the full backing store and swap them into
    /// visibility together.
    fn rebuild(&self) {
        let rows = match self.store.all() {
            Ok(rows) => rows,
            Err(e) => {
                error!(error = %e, "Failed to read mapping store, keeping previous index generation");
                return;
            }
        };

        let mut index = SceneIndex::default();
        for mapping in rows {
            index
                .by_series
                .entry(mapping.series_id)
                .or_default()
                .push(mapping.clone());
            index.by_term.insert(mapping.parse_term.clone(), mapping);
        }

        debug!(
            aliases = index.by_term.len(),
            series = index.by_series.len(),
            "Rebuilt scene mapping index"
        );

        *self.index.write() = Arc::new(index);
    }
}

/// Derive parse terms, tag rows with their source, and drop rows with
/// duplicate terms (first occurrence wins) or unnormalizable titles.
fn prepare_rows(mappings: Vec<SceneMapping>, source: &str) -> Vec<SceneMapping> {
    let mut seen = HashSet::new();
    let mut rows = Vec::with_capacity(mappings.len());

    for mut mapping in mappings {
        let Ok(term) = title::normalize(&mapping.title) else {
            debug!(source, "Dropping mapping with blank title");
            continue;
        };
        if !seen.insert(term.clone()) {
            continue;
        }
        mapping.parse_term = term;
        mapping.source = source.to_string();
        rows.push(mapping);
    }

    rows
}

/// Aliases containing any code point above Latin-1 are never offered as
/// search titles.
fn is_english(title: &str) -> bool {
    title.chars().all(|c| c as u32 <= 255)
}

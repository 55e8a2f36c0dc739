//! Series and episode identity types, plus the catalog collaborator trait.
//!
//! These types mirror what the catalog hands us and stay immutable for the
//! duration of a search. The catalog itself (storage, parsing, refresh) is
//! external; [`Catalog`] is the narrow read interface the search core needs.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Canonical catalog identifier for a series.
pub type SeriesId = i32;

/// Canonical catalog identifier for an episode.
pub type EpisodeId = i64;

/// How a series is numbered and released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesType {
    /// Season/episode numbered show.
    Standard,
    /// Air-date released show (talk shows, news).
    Daily,
    /// Absolute-numbered show.
    Anime,
}

/// Canonical identity of a series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Series {
    pub id: SeriesId,
    pub title: String,
    pub series_type: SeriesType,
    /// Whether scene (release group) numbering is authoritative for this
    /// series. When set, episode scene overrides take precedence over the
    /// canonical season/episode numbers.
    pub use_scene_numbering: bool,
}

/// Canonical identity of an episode, belonging to exactly one series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    pub id: EpisodeId,
    pub series_id: SeriesId,
    pub season_number: i32,
    pub episode_number: i32,

    /// Scene numbering override; 0 means unset. Only authoritative when both
    /// scene numbers are > 0 and the owning series uses scene numbering.
    #[serde(default)]
    pub scene_season_number: i32,
    #[serde(default)]
    pub scene_episode_number: i32,

    /// Episode title; season-0 specials are searched by it.
    #[serde(default)]
    pub title: Option<String>,

    /// First air date; required for searching daily series.
    #[serde(default)]
    pub air_date: Option<NaiveDate>,

    /// Absolute episode number used by anime releases.
    #[serde(default)]
    pub absolute_episode_number: Option<i32>,
}

impl Episode {
    /// True when this episode carries a usable scene numbering override.
    pub fn has_scene_numbering(&self) -> bool {
        self.scene_season_number > 0 && self.scene_episode_number > 0
    }
}

/// Read access to the series/episode catalog.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetch a series by its canonical id.
    async fn series(&self, id: SeriesId) -> anyhow::Result<Series>;

    /// Fetch an episode by its canonical id.
    async fn episode(&self, id: EpisodeId) -> anyhow::Result<Episode>;

    /// Fetch every episode of one canonical season.
    async fn episodes_by_season(
        &self,
        series_id: SeriesId,
        season_number: i32,
    ) -> anyhow::Result<Vec<Episode>>;
}

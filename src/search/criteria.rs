//! Search criteria types.

use std::fmt;

use chrono::NaiveDate;

use crate::tv::{Episode, Series};

/// Variant-specific fields of a search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CriteriaKind {
    /// One episode of a season/episode numbered show.
    SingleEpisode {
        season_number: i32,
        episode_number: i32,
    },
    /// A whole season; on scene-numbered series this is a scene season.
    Season { season_number: i32 },
    /// An air-date released episode.
    Daily { air_date: NaiveDate },
    /// An absolute-numbered episode.
    Anime { absolute_episode_number: i32 },
    /// Season-0 specials, searched through per-episode query strings.
    Special { episode_query_titles: Vec<String> },
}

/// An immutable, fully-resolved description of one search request, ready to
/// be sent to indexers.
///
/// Built fresh per search invocation by
/// [`CriteriaBuilder`](super::CriteriaBuilder), cloned once per dispatched
/// indexer task, never cached across calls.
#[derive(Debug, Clone)]
pub struct SearchCriteria {
    pub series: Series,
    /// The episodes in scope for this request.
    pub episodes: Vec<Episode>,
    /// Scene title resolved from the mapping cache, falling back to the
    /// canonical series title.
    pub scene_title: String,
    /// Provider-safe query token derived from `scene_title`; non-empty by
    /// construction.
    pub query_title: String,
    pub kind: CriteriaKind,
}

impl fmt::Display for SearchCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            CriteriaKind::SingleEpisode {
                season_number,
                episode_number,
            } => write!(
                f,
                "[{} : S{:02}E{:02}]",
                self.series.title, season_number, episode_number
            ),
            CriteriaKind::Season { season_number } => {
                write!(f, "[{} : S{:02}]", self.series.title, season_number)
            }
            CriteriaKind::Daily { air_date } => {
                write!(f, "[{} : {}]", self.series.title, air_date)
            }
            CriteriaKind::Anime {
                absolute_episode_number,
            } => write!(
                f,
                "[{} : #{:03}]",
                self.series.title, absolute_episode_number
            ),
            CriteriaKind::Special {
                episode_query_titles,
            } => write!(
                f,
                "[{} : {} special(s)]",
                self.series.title,
                episode_query_titles.len()
            ),
        }
    }
}

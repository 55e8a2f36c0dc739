//! Criteria construction.
//!
//! Selects the criteria variant for a request, resolves scene titles through
//! the mapping cache, and splits season searches along scene season
//! boundaries when the series uses scene numbering.

use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::scene::SceneMappingService;
use crate::title;
use crate::tv::{Episode, Series, SeriesType};

use super::criteria::{CriteriaKind, SearchCriteria};

/// Builds [`SearchCriteria`] values for episode and season requests.
pub struct CriteriaBuilder {
    scene: Arc<SceneMappingService>,
}

impl CriteriaBuilder {
    pub fn new(scene: Arc<SceneMappingService>) -> Self {
        Self { scene }
    }

    /// Criteria for a single-episode request.
    ///
    /// The variant follows the series type; season-0 episodes of standard
    /// series are searched as specials.
    pub fn for_episode(&self, series: &Series, episode: Episode) -> Result<SearchCriteria> {
        match series.series_type {
            SeriesType::Daily => self.daily(series, episode),
            SeriesType::Anime => self.anime(series, episode),
            SeriesType::Standard if episode.season_number == 0 => {
                self.special(series, vec![episode])
            }
            SeriesType::Standard => self.single(series, episode),
        }
    }

    /// Criteria for a season-level request.
    ///
    /// Scene releases can draw season boundaries differently from the
    /// catalog (a canonical season released under a different scene season
    /// number), so on scene-numbered series the episodes are grouped by
    /// scene season and each group becomes its own request - one request per
    /// canonical season would silently miss the divergent releases.
    pub fn for_season(
        &self,
        series: &Series,
        season_number: i32,
        episodes: Vec<Episode>,
    ) -> Result<Vec<SearchCriteria>> {
        if season_number == 0 {
            return Ok(vec![self.special(series, episodes)?]);
        }

        if !series.use_scene_numbering {
            return Ok(vec![self.build(
                series,
                episodes,
                CriteriaKind::Season { season_number },
            )?]);
        }

        let mut groups: Vec<(i32, Vec<Episode>)> = Vec::new();
        for episode in episodes {
            let key = scene_season_key(&episode);
            match groups.iter_mut().find(|(group_key, _)| *group_key == key) {
                Some((_, group)) => group.push(episode),
                None => groups.push((key, vec![episode])),
            }
        }

        debug!(
            series = %series.title,
            groups = groups.len(),
            "Split season search along scene season boundaries"
        );

        let mut criteria = Vec::with_capacity(groups.len());
        for (scene_season, mut group) in groups {
            if group.len() == 1 {
                let episode = group.remove(0);
                let episode_number =
                    if episode.scene_season_number == 0 && episode.scene_episode_number == 0 {
                        episode.episode_number
                    } else {
                        episode.scene_episode_number
                    };
                criteria.push(self.build(
                    series,
                    vec![episode],
                    CriteriaKind::SingleEpisode {
                        season_number: scene_season,
                        episode_number,
                    },
                )?);
            } else {
                criteria.push(self.build(
                    series,
                    group,
                    CriteriaKind::Season {
                        season_number: scene_season,
                    },
                )?);
            }
        }

        Ok(criteria)
    }

    fn single(&self, series: &Series, episode: Episode) -> Result<SearchCriteria> {
        let (season_number, episode_number) =
            if series.use_scene_numbering && episode.has_scene_numbering() {
                (episode.scene_season_number, episode.scene_episode_number)
            } else {
                (episode.season_number, episode.episode_number)
            };

        self.build(
            series,
            vec![episode],
            CriteriaKind::SingleEpisode {
                season_number,
                episode_number,
            },
        )
    }

    fn daily(&self, series: &Series, episode: Episode) -> Result<SearchCriteria> {
        let air_date = episode.air_date.ok_or_else(|| {
            Error::precondition(format!(
                "Daily episode {} is missing an air date; try refreshing the series info",
                episode.id
            ))
        })?;

        self.build(series, vec![episode], CriteriaKind::Daily { air_date })
    }

    fn anime(&self, series: &Series, episode: Episode) -> Result<SearchCriteria> {
        let absolute_episode_number = episode.absolute_episode_number.unwrap_or(0);

        self.build(
            series,
            vec![episode],
            CriteriaKind::Anime {
                absolute_episode_number,
            },
        )
    }

    /// Specials carry one query string per episode with a usable title, each
    /// `"<query title> <normalized episode title>"`.
    fn special(&self, series: &Series, episodes: Vec<Episode>) -> Result<SearchCriteria> {
        let (scene_title, query_title) = self.resolve_titles(series, &episodes)?;

        let mut episode_query_titles = Vec::new();
        for episode in &episodes {
            let Some(episode_title) = episode.title.as_deref() else {
                continue;
            };
            let Ok(normalized) = title::normalize(episode_title) else {
                continue;
            };
            episode_query_titles.push(format!("{query_title} {normalized}"));
        }

        if episode_query_titles.is_empty() {
            return Err(Error::precondition(
                "No special episode in scope has a usable title",
            ));
        }

        Ok(SearchCriteria {
            series: series.clone(),
            episodes,
            scene_title,
            query_title,
            kind: CriteriaKind::Special {
                episode_query_titles,
            },
        })
    }

    fn build(
        &self,
        series: &Series,
        episodes: Vec<Episode>,
        kind: CriteriaKind,
    ) -> Result<SearchCriteria> {
        let (scene_title, query_title) = self.resolve_titles(series, &episodes)?;

        Ok(SearchCriteria {
            series: series.clone(),
            episodes,
            scene_title,
            query_title,
            kind,
        })
    }

    /// Resolve the scene title for the seasons in scope, falling back to the
    /// canonical series title when no alias exists.
    fn resolve_titles(&self, series: &Series, episodes: &[Episode]) -> Result<(String, String)> {
        let seasons = seasons_in_scope(episodes);
        let scene_title = self
            .scene
            .scene_names(series.id, &seasons)
            .into_iter()
            .next()
            .unwrap_or_else(|| series.title.clone());
        let query_title = title::normalize(&scene_title)?;

        Ok((scene_title, query_title))
    }
}

/// Distinct canonical seasons of the episodes plus any scene season
/// overrides; wildcard mapping rows match regardless.
fn seasons_in_scope(episodes: &[Episode]) -> Vec<i32> {
    let mut seasons = Vec::new();
    for episode in episodes {
        if !seasons.contains(&episode.season_number) {
            seasons.push(episode.season_number);
        }
        if episode.scene_season_number > 0 && !seasons.contains(&episode.scene_season_number) {
            seasons.push(episode.scene_season_number);
        }
    }
    seasons
}

/// Group key for scene-season splitting. An episode with no scene override
/// at all stays in its canonical season.
fn scene_season_key(episode: &Episode) -> i32 {
    if episode.scene_season_number == 0 && episode.scene_episode_number == 0 {
        episode.season_number
    } else {
        episode.scene_season_number
    }
}

use std::path::Path;

use crate::candidate::find_candidate;
use crate::catalog::{CatalogClient, EpisodeRecord, SeasonDetails, ShowSearchResult};
use crate::error::{until_cancelled, MatchError, Result};
use crate::media::{FileEntry, MatchOptions, MediaDetail};
use crate::names::{derive_episode_number, derive_search_string, derive_season_number};
use crate::scan::list_video_files;

/// What a season directory name says about its contents.
#[derive(Debug, PartialEq, Clone)]
pub struct SeasonQuery {
    pub search: String,
    pub season: i32,
}

impl SeasonQuery {
    pub fn from_path(path: &Path) -> Result<SeasonQuery> {
        let name = path.to_string_lossy();
        let season = derive_season_number(&name);
        if season == -1 {
            return Err(MatchError::SeasonNotDetermined { path: path.to_path_buf() });
        }
        Ok(SeasonQuery { search: derive_search_string(&name), season })
    }
}

pub fn episode_title(show: &ShowSearchResult, season: &SeasonDetails, episode: &EpisodeRecord) -> String {
    format!("{} {}, Episode {} - {}", show.name, season.name, episode.episode_number, episode.name)
}

fn episode_detail(
    file: &FileEntry,
    show: &ShowSearchResult,
    season: &SeasonDetails,
    episode: &EpisodeRecord,
    season_number: i32,
    options: &MatchOptions,
) -> MediaDetail {
    let description = if season.overview.is_empty() { &episode.overview } else { &season.overview };
    let artwork = episode
        .still_path
        .as_deref()
        .filter(|p| !p.is_empty())
        .or(season.poster_path.as_deref());

    MediaDetail {
        id: show.id,
        season_id: season.id,
        episode_id: episode.id,
        title: episode_title(show, season, episode),
        description: description.clone(),
        detail_description: episode.overview.clone(),
        file_name: file.path_string(),
        artwork_url: options.artwork_url(artwork),
        season: season_number,
        episode: episode.episode_number,
    }
}

/// Records for files the catalog knows nothing about: name from the file,
/// episode number guessed from it.
fn season_fallback(files: &[FileEntry], season_number: i32) -> Vec<MediaDetail> {
    files
        .iter()
        .map(|file| MediaDetail::fallback(file, season_number, derive_episode_number(&file.base_name)))
        .collect()
}

/// Pairs every catalog episode with a local file, in catalog order.
/// Episodes with no file on disk are left out.
pub fn pair_episodes(
    files: &[FileEntry],
    show: &ShowSearchResult,
    season: &SeasonDetails,
    season_number: i32,
    options: &MatchOptions,
) -> Vec<MediaDetail> {
    season
        .episodes
        .iter()
        .filter_map(|episode| match find_candidate(season_number, episode.episode_number, files) {
            Some(file) => Some(episode_detail(file, show, season, episode, season_number, options)),
            None => {
                log::debug!("No local file for {} episode {}", show.name, episode.episode_number);
                None
            }
        })
        .collect()
}

/// Reconciles one season directory (e.g. `"/tv/Breaking Bad Season 3"`) against the catalog.
///
/// Fails with [`MatchError::EmptyInput`] or [`MatchError::SeasonNotDetermined`]
/// before any catalog request is made. When the show search finds nothing,
/// every file gets a fallback record. When the show is found but the season has
/// no episodes, or none of them has a file, the result is empty.
pub async fn match_season<C>(catalog: &C, path: &Path, options: &MatchOptions) -> Result<Vec<MediaDetail>>
where
    C: CatalogClient + ?Sized,
{
    let files = list_video_files(path, &options.cancel).await?;
    if files.is_empty() {
        return Err(MatchError::EmptyInput { path: path.to_path_buf() });
    }
    let query = SeasonQuery::from_path(path)?;
    log::info!(target: "cli", "Season directory {:?}: searching {:?} season {}", path, query.search, query.season);

    let shows = until_cancelled(&options.cancel, catalog.search_shows(&query.search)).await?;
    let show = match shows.into_iter().next() {
        Some(show) => show,
        None => {
            log::warn!("No catalog match for show {:?}, using file names", query.search);
            return Ok(season_fallback(&files, query.season));
        }
    };

    let season = until_cancelled(&options.cancel, catalog.season_details(show.id, query.season)).await?;
    let season = match season {
        Some(season) if !season.episodes.is_empty() => season,
        _ => {
            log::warn!("{} ({}) has no episodes for season {}", show.name, show.id, query.season);
            return Ok(Vec::new());
        }
    };

    let details = pair_episodes(&files, &show, &season, query.season, options);
    log::info!(target: "cli", "Matched {} of {} episodes for {} {}", details.len(), season.episodes.len(), show.name, season.name);
    Ok(details)
}

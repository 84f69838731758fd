use std::path::Path;

use crate::catalog::{CatalogClient, MovieSearchResult};
use crate::error::{until_cancelled, Result};
use crate::media::{FileEntry, MatchOptions, MediaDetail, UNKNOWN};
use crate::scan::list_video_files;

fn movie_detail(file: &FileEntry, movie: &MovieSearchResult, options: &MatchOptions) -> MediaDetail {
    MediaDetail {
        id: movie.id,
        season_id: UNKNOWN,
        episode_id: UNKNOWN,
        title: movie.title.clone(),
        description: movie.overview.clone(),
        detail_description: String::new(),
        file_name: file.path_string(),
        artwork_url: options.artwork_url(movie.poster_path.as_deref()),
        season: 0,
        episode: -1,
    }
}

fn movie_fallback(file: &FileEntry) -> MediaDetail {
    MediaDetail { description: file.base_name.clone(), ..MediaDetail::fallback(file, 0, -1) }
}

/// Looks up a single movie file by its base name. The first search result
/// wins; with no results the file still gets a record built from its name.
pub async fn match_movie_file<C>(catalog: &C, file: &FileEntry, options: &MatchOptions) -> Result<MediaDetail>
where
    C: CatalogClient + ?Sized,
{
    let results = until_cancelled(&options.cancel, catalog.search_movies(&file.base_name)).await?;
    match results.first() {
        Some(movie) => {
            log::info!(target: "cli", "Matched movie {:?} -> {} ({})", file.base_name, movie.title, movie.id);
            Ok(movie_detail(file, movie, options))
        }
        None => {
            log::warn!("No catalog match for movie {:?}", file.base_name);
            Ok(movie_fallback(file))
        }
    }
}

/// One [`MediaDetail`] per video file under `path`, in enumeration order.
///
/// Issues one catalog search per file; any catalog failure aborts the batch.
pub async fn match_movies<C>(catalog: &C, path: &Path, options: &MatchOptions) -> Result<Vec<MediaDetail>>
where
    C: CatalogClient + ?Sized,
{
    let files = list_video_files(path, &options.cancel).await?;
    let mut details = Vec::with_capacity(files.len());
    for file in &files {
        details.push(match_movie_file(catalog, file, options).await?);
    }
    Ok(details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{SeasonDetails, ShowSearchResult};
    use crate::error::{CatalogError, MatchError};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct MovieStub {
        movies: HashMap<String, Vec<MovieSearchResult>>,
        fail: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CatalogClient for MovieStub {
        async fn search_movies(&self, query: &str) -> std::result::Result<Vec<MovieSearchResult>, CatalogError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(CatalogError::Status { status: 503, url: "search/movie".into() });
            }
            Ok(self.movies.get(query).cloned().unwrap_or_default())
        }

        async fn search_shows(&self, _query: &str) -> std::result::Result<Vec<ShowSearchResult>, CatalogError> {
            Ok(vec![])
        }

        async fn season_details(&self, _show_id: i64, _season: i32) -> std::result::Result<Option<SeasonDetails>, CatalogError> {
            Ok(None)
        }
    }

    fn heat_stub() -> MovieStub {
        let mut movies = HashMap::new();
        movies.insert(
            "Heat".to_string(),
            vec![
                MovieSearchResult { id: 949, title: "Heat".into(), overview: "A thief.".into(), poster_path: Some("/heat.jpg".into()) },
                MovieSearchResult { id: 2, title: "Heat 2".into(), overview: String::new(), poster_path: None },
            ],
        );
        movies.insert(
            "Primer".to_string(),
            vec![MovieSearchResult { id: 14337, title: "Primer".into(), overview: "Engineers.".into(), poster_path: None }],
        );
        MovieStub { movies, ..Default::default() }
    }

    fn movie_dir(names: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::Builder::new().prefix("test_movies").tempdir().unwrap();
        for name in names {
            fs::File::create(dir.path().join(name)).unwrap();
        }
        dir
    }

    #[tokio::test]
    async fn test_match_movies() {
        let dir = movie_dir(&["Heat.mkv", "Primer.mp4", "notes.txt"]);
        let stub = heat_stub();
        let details = match_movies(&stub, dir.path(), &MatchOptions::with_size("w500")).await.unwrap();

        assert_eq!(details.len(), 2);
        assert_eq!(details[0].id, 949);
        assert_eq!(details[0].title, "Heat");
        assert_eq!(details[0].description, "A thief.");
        assert_eq!(details[0].artwork_url.as_deref(), Some("https://image.tmdb.org/t/p/w500/heat.jpg"));
        assert_eq!(details[0].file_name, dir.path().join("Heat.mkv").to_string_lossy());
        assert_eq!((details[0].season, details[0].episode), (0, -1));

        assert_eq!(details[1].id, 14337);
        assert_eq!(details[1].artwork_url, None);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_match_movies_fallback() {
        let dir = movie_dir(&["Some Home Video.mkv"]);
        let details = match_movies(&heat_stub(), dir.path(), &MatchOptions::default()).await.unwrap();

        assert_eq!(details.len(), 1);
        assert_eq!(details[0].title, "Some Home Video");
        assert_eq!(details[0].description, "Some Home Video");
        assert_eq!(details[0].id, -1);
        assert_eq!(details[0].season_id, -1);
        assert_eq!(details[0].episode_id, -1);
        assert_eq!(details[0].artwork_url, None);
    }

    #[tokio::test]
    async fn test_match_movies_remote_failure() {
        let dir = movie_dir(&["Heat.mkv"]);
        let stub = MovieStub { fail: true, ..Default::default() };
        let res = match_movies(&stub, dir.path(), &MatchOptions::default()).await;
        assert!(matches!(res, Err(MatchError::Remote(CatalogError::Status { status: 503, .. }))));
    }

    #[tokio::test]
    async fn test_match_movies_idempotent() {
        let dir = movie_dir(&["Primer.mp4", "Heat.mkv", "Unknown.avi"]);
        let stub = heat_stub();
        let options = MatchOptions::default();
        let first = match_movies(&stub, dir.path(), &options).await.unwrap();
        let second = match_movies(&stub, dir.path(), &options).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.iter().map(|d| d.title.as_str()).collect::<Vec<_>>(), vec!["Heat", "Primer", "Unknown"]);
    }

    #[tokio::test]
    async fn test_match_movies_cancelled() {
        let dir = movie_dir(&["Heat.mkv"]);
        let stub = heat_stub();
        let options = MatchOptions::default();
        options.cancel.cancel();
        let res = match_movies(&stub, dir.path(), &options).await;
        assert!(matches!(res, Err(MatchError::Cancelled)));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }
}

//! Matches local movie files and TV season directories to TMDB records.
//!
//! ```no_run
//! use castmatch::{match_season, MatchOptions, TmdbClient};
//! use std::path::Path;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = TmdbClient::new("api-key", "en-US")?;
//! let episodes = match_season(&client, Path::new("/tv/Breaking Bad Season 3"), &MatchOptions::default()).await?;
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::path::Path;

pub mod cache;
pub mod candidate;
pub mod catalog;
pub mod config;
pub mod error;
pub mod media;
pub mod movie;
pub mod names;
pub mod scan;
pub mod tv;

pub use cache::{cached_configuration, ConfigCache};
pub use candidate::{find_candidate, NamingStyle, NAMING_STYLES};
pub use catalog::{CatalogClient, CatalogConfiguration, TmdbClient};
pub use error::{CatalogError, MatchError, Result};
pub use media::{FileEntry, MatchOptions, MediaDetail};
pub use movie::match_movies;
pub use names::{derive_episode_number, derive_search_string, derive_season_number};
pub use tv::match_season;

fn block_on<T>(fut: impl Future<Output = Result<T>>) -> Result<T> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(fut)
}

/// Blocking [`match_movies`] for callers without a runtime. Must not be called from within one.
pub fn match_movies_blocking<C>(catalog: &C, path: &Path, options: &MatchOptions) -> Result<Vec<MediaDetail>>
where
    C: CatalogClient + ?Sized,
{
    block_on(match_movies(catalog, path, options))
}

/// Blocking [`match_season`]. Must not be called from within a runtime.
pub fn match_season_blocking<C>(catalog: &C, path: &Path, options: &MatchOptions) -> Result<Vec<MediaDetail>>
where
    C: CatalogClient + ?Sized,
{
    block_on(match_season(catalog, path, options))
}

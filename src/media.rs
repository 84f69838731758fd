use serde_derive::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";
pub const DEFAULT_SIZE_TOKEN: &str = "original";

/// Catalog id / number used when a value is not known.
pub const UNKNOWN: i64 = -1;

/// One reconciled media file: catalog metadata joined with the local file it describes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MediaDetail {
    /// Movie or show id in the catalog, -1 when unknown.
    pub id: i64,
    pub season_id: i64,
    pub episode_id: i64,
    pub title: String,
    pub description: String,
    /// Episode-level overview, empty for movies and fallback records.
    pub detail_description: String,
    /// Absolute path of the backing file. Always a file that was enumerated on disk.
    pub file_name: String,
    pub artwork_url: Option<String>,
    /// Season number, 0 for movies.
    pub season: i32,
    /// Episode number, -1 when unknown.
    pub episode: i32,
}

impl MediaDetail {
    /// Record built from local file data only, for files the catalog has nothing on.
    pub fn fallback(file: &FileEntry, season: i32, episode: i32) -> Self {
        MediaDetail {
            id: UNKNOWN,
            season_id: UNKNOWN,
            episode_id: UNKNOWN,
            title: file.base_name.clone(),
            description: String::new(),
            detail_description: String::new(),
            file_name: file.path_string(),
            artwork_url: None,
            season,
            episode,
        }
    }
}

/// A video file discovered under a root path.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FileEntry {
    pub path: PathBuf,
    /// File name without its extension.
    pub base_name: String,
}

impl FileEntry {
    pub fn from_path(path: &Path) -> Option<FileEntry> {
        let base_name = path.file_stem()?.to_str()?.to_owned();
        Some(FileEntry { path: path.to_path_buf(), base_name })
    }

    pub fn path_string(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// Caller-side knobs for a matching run.
#[derive(Debug, Clone)]
pub struct MatchOptions {
    /// Image size segment of artwork URLs, e.g. "w500" or "original".
    pub size_token: String,
    pub image_base: String,
    pub cancel: CancellationToken,
}

impl Default for MatchOptions {
    fn default() -> Self {
        MatchOptions {
            size_token: DEFAULT_SIZE_TOKEN.to_owned(),
            image_base: DEFAULT_IMAGE_BASE.to_owned(),
            cancel: CancellationToken::new(),
        }
    }
}

impl MatchOptions {
    pub fn with_size(size_token: &str) -> Self {
        MatchOptions { size_token: size_token.to_owned(), ..Default::default() }
    }

    /// Artwork URL for an image path, or `None` when the catalog record has none.
    pub fn artwork_url(&self, image_path: Option<&str>) -> Option<String> {
        let image_path = image_path.filter(|p| !p.trim().is_empty())?;
        Some(artwork_url(&self.image_base, &self.size_token, image_path))
    }
}

/// Joins `<image-base>/<size>/<path>` with exactly one slash between the parts.
pub fn artwork_url(image_base: &str, size_token: &str, image_path: &str) -> String {
    [
        image_base.trim_end_matches('/'),
        size_token.trim_matches('/'),
        image_path.trim_start_matches('/'),
    ]
    .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artwork_url() {
        assert_eq!(artwork_url("https://image.tmdb.org/t/p", "original", "/abc.jpg"), "https://image.tmdb.org/t/p/original/abc.jpg");
        assert_eq!(artwork_url("https://image.tmdb.org/t/p/", "w500", "abc.jpg"), "https://image.tmdb.org/t/p/w500/abc.jpg");

        let options = MatchOptions::with_size("w342");
        assert_eq!(options.artwork_url(Some("/p.jpg")), Some("https://image.tmdb.org/t/p/w342/p.jpg".to_string()));
        assert_eq!(options.artwork_url(Some("")), None);
        assert_eq!(options.artwork_url(None), None);
    }

    #[test]
    fn test_file_entry_from_path() {
        let entry = FileEntry::from_path(Path::new("/media/tv/Show.S01E02.720p.mkv")).unwrap();
        assert_eq!(entry.base_name, "Show.S01E02.720p");
        assert_eq!(entry.path_string(), "/media/tv/Show.S01E02.720p.mkv");

        let fallback = MediaDetail::fallback(&entry, 1, 2);
        assert_eq!(fallback.title, "Show.S01E02.720p");
        assert_eq!(fallback.id, UNKNOWN);
        assert_eq!(fallback.file_name, "/media/tv/Show.S01E02.720p.mkv");
    }
}

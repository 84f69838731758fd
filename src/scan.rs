use std::path::Path;
use tokio_util::sync::CancellationToken;

use crate::error::{until_cancelled, MatchError, Result};
use crate::media::FileEntry;

const VIDEO_EXTENSIONS: [&str; 11] = ["mkv", "mp4", "avi", "mov", "wmv", "flv", "webm", "m4v", "mpg", "mpeg", "ts"];

// Disc images and executables can carry video mime types or sit next to
// episodes, but are never playable episodes themselves.
const EXCLUDED_EXTENSIONS: [&str; 7] = ["iso", "img", "bin", "cue", "dmg", "exe", "msi"];

pub fn is_video_file(path: &Path) -> bool {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.to_lowercase(),
        None => return false,
    };
    if EXCLUDED_EXTENSIONS.contains(&ext.as_str()) {
        return false;
    }
    VIDEO_EXTENSIONS.contains(&ext.as_str())
        || mime_guess::from_ext(&ext).iter().any(|mime| mime.type_() == mime_guess::mime::VIDEO)
}

/// Walks `root` recursively and collects video files, sorted by file name
/// within each directory so repeated runs see the same order.
pub fn scan_video_files(root: &Path, cancel: &CancellationToken) -> Result<Vec<FileEntry>> {
    let root = if root.is_absolute() { root.to_path_buf() } else { std::env::current_dir()?.join(root) };
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(&root).sort_by_file_name() {
        if cancel.is_cancelled() {
            return Err(MatchError::Cancelled);
        }
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_video_file(path) {
            continue;
        }
        if let Some(file) = FileEntry::from_path(path) {
            files.push(file);
        }
    }
    log::info!(target: "cli", "Found {} video files under {:?}", files.len(), root);
    Ok(files)
}

/// [`scan_video_files`] on the blocking pool, abandoned early if `cancel` fires.
pub async fn list_video_files(root: &Path, cancel: &CancellationToken) -> Result<Vec<FileEntry>> {
    let root = root.to_path_buf();
    let token = cancel.clone();
    let listing = tokio::task::spawn_blocking(move || scan_video_files(&root, &token));
    until_cancelled(cancel, async { listing.await.unwrap_or_else(|e| Err(MatchError::from(e))) }).await
}

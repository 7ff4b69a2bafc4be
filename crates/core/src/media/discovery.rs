//! Media file discovery and skip rules.

use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::subtitle::TextFormat;

/// Video extensions considered media files (lowercase, without dot).
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov", "m4v", "ts", "webm"];

/// Why a media file is not processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Name starts with "sample".
    Sample,
    /// A subtitle with one of the output extensions already sits next to it.
    SubtitleExists(PathBuf),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Sample => write!(f, "sample file"),
            SkipReason::SubtitleExists(path) => {
                write!(f, "subtitle already exists: {}", path.display())
            }
        }
    }
}

fn is_video(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| VIDEO_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Lists media files under `root`, sorted by path.
///
/// Without `recursive` only direct children are listed. Unreadable entries
/// are logged and skipped.
pub fn find_media_files(root: &Path, recursive: bool) -> io::Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("not a directory: {}", root.display()),
        ));
    }

    let mut walker = WalkDir::new(root).min_depth(1);
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && is_video(entry.path()) {
                    files.push(entry.into_path());
                }
            }
            Err(e) => warn!(error = %e, "Skipping unreadable directory entry"),
        }
    }
    files.sort();
    Ok(files)
}

/// Returns why `media` should be skipped, or `None` to process it.
pub fn skip_reason(media: &Path) -> Option<SkipReason> {
    let name = media
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if name.starts_with("sample") {
        return Some(SkipReason::Sample);
    }

    [TextFormat::Ass, TextFormat::Srt]
        .into_iter()
        .map(|format| media.with_extension(format.extension()))
        .find(|path| path.exists())
        .map(SkipReason::SubtitleExists)
}

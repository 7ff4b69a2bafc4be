//! File system writer implementation.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use super::error::WriterError;
use super::traits::SubtitleWriter;

const TEMP_SUFFIX: &str = ".zimu-part";

/// Writes subtitles to a hidden temporary sibling, then renames it over
/// the target path.
#[derive(Debug, Default, Clone)]
pub struct FsWriter;

impl FsWriter {
    pub fn new() -> Self {
        Self
    }

    fn temp_path(path: &Path) -> Result<PathBuf, WriterError> {
        let invalid = || WriterError::InvalidPath {
            path: path.to_path_buf(),
        };
        let file_name = path.file_name().ok_or_else(invalid)?;
        let parent = path.parent().ok_or_else(invalid)?;
        let mut temp_name = std::ffi::OsString::from(".");
        temp_name.push(file_name);
        temp_name.push(TEMP_SUFFIX);
        Ok(parent.join(temp_name))
    }
}

#[async_trait]
impl SubtitleWriter for FsWriter {
    fn name(&self) -> &str {
        "fs"
    }

    async fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), WriterError> {
        let temp = Self::temp_path(path)?;

        if let Err(source) = fs::write(&temp, bytes).await {
            let _ = fs::remove_file(&temp).await;
            return Err(WriterError::WriteFailed { path: temp, source });
        }

        if let Err(error) = fs::rename(&temp, path).await {
            let _ = fs::remove_file(&temp).await;
            return Err(WriterError::MoveFailed {
                temp,
                destination: path.to_path_buf(),
                error,
            });
        }

        debug!(path = %path.display(), bytes = bytes.len(), "Wrote subtitle");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Movie.srt");

        FsWriter::new().write(&path, b"1\n").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"1\n");
        let leftovers: Vec<_> = std::fs::read_dir(temp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(TEMP_SUFFIX))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_write_overwrites_existing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Movie.ass");
        std::fs::write(&path, b"old").unwrap();

        FsWriter::new().write(&path, b"new").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_write_into_missing_directory_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing/Movie.srt");

        let err = FsWriter::new().write(&path, b"x").await.unwrap_err();
        assert_eq!(err.kind(), "write_failed");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_write_removes_temp_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Movie.srt");
        let part = FsWriter::temp_path(&path).unwrap();
        // dangling link: the write creates nothing and fails
        std::os::unix::fs::symlink(temp.path().join("gone/Movie.srt"), &part).unwrap();

        let err = FsWriter::new().write(&path, b"1\n").await.unwrap_err();

        assert_eq!(err.kind(), "write_failed");
        assert!(std::fs::symlink_metadata(&part).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_temp_path_is_hidden_sibling() {
        let temp = FsWriter::temp_path(Path::new("/media/Movie.srt")).unwrap();
        assert_eq!(temp, PathBuf::from("/media/.Movie.srt.zimu-part"));
    }
}

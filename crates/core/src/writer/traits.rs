//! Trait definitions for the writer module.

use async_trait::async_trait;
use std::path::Path;

use super::error::WriterError;

/// Persists resolved subtitle bytes.
#[async_trait]
pub trait SubtitleWriter: Send + Sync {
    /// Returns the name of this writer implementation.
    fn name(&self) -> &str;

    /// Writes `bytes` to `path`, creating or replacing the file.
    async fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), WriterError>;
}

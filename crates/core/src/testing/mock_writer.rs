//! Mock subtitle writer for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::writer::{SubtitleWriter, WriterError};

/// A recorded write for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedWrite {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// Mock implementation of the SubtitleWriter trait.
///
/// Keeps written files in memory.
#[derive(Debug, Default)]
pub struct MockWriter {
    /// Recorded writes.
    writes: Arc<RwLock<Vec<RecordedWrite>>>,
    /// If set, the next write will fail with this error.
    next_error: Arc<RwLock<Option<WriterError>>>,
}

impl MockWriter {
    /// Create a new mock writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded writes.
    pub async fn recorded_writes(&self) -> Vec<RecordedWrite> {
        self.writes.read().await.clone()
    }

    /// Configure the next write to fail with the given error.
    pub async fn set_next_error(&self, error: WriterError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl SubtitleWriter for MockWriter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), WriterError> {
        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }
        self.writes.write().await.push(RecordedWrite {
            path: path.to_path_buf(),
            bytes: bytes.to_vec(),
        });
        Ok(())
    }
}

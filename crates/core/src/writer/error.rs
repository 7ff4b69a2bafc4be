//! Error types for the writer module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing a subtitle file.
#[derive(Debug, Error)]
pub enum WriterError {
    /// Target path has no parent directory or file name.
    #[error("Invalid subtitle path: {path}")]
    InvalidPath { path: PathBuf },

    /// Failed to write the temporary file.
    #[error("Failed to write {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to move the temporary file into place.
    #[error("Failed to move {temp} to {destination}")]
    MoveFailed {
        temp: PathBuf,
        destination: PathBuf,
        #[source]
        error: std::io::Error,
    },
}

impl WriterError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidPath { .. } => "invalid_path",
            Self::WriteFailed { .. } => "write_failed",
            Self::MoveFailed { .. } => "move_failed",
        }
    }
}

//! Error types for content resolution.

use thiserror::Error;

/// Why a downloaded payload could not be turned into a subtitle file.
///
/// Every variant is attempt-level: the caller moves on to the next candidate.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The site answered with one of its failure messages.
    #[error("site returned an error page containing '{phrase}'")]
    ErrorPage { phrase: String },

    /// Tiny or markup-only body instead of a file.
    #[error("unexpected short response ({len} bytes): '{preview}'")]
    ShortResponse { len: usize, preview: String },

    /// Zip archive without any `.ass`/`.srt` entry.
    #[error("archive contains no usable subtitle entry")]
    ArchiveEmpty,

    /// Zip signature present but the archive could not be read.
    #[error("archive could not be read: {0}")]
    ArchiveUnreadable(String),

    /// Payload is not a recognizable text subtitle.
    #[error("unsupported subtitle content '{name}': detected {detected}")]
    UnsupportedContent { name: String, detected: String },
}

impl ResolveError {
    /// Stable label for reports and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ErrorPage { .. } | Self::ShortResponse { .. } => "content_error",
            Self::ArchiveEmpty => "archive_empty",
            Self::ArchiveUnreadable(_) => "archive_unreadable",
            Self::UnsupportedContent { .. } => "unsupported_content",
        }
    }

    /// Whether the server sent something other than the file.
    pub fn is_content_error(&self) -> bool {
        matches!(self, Self::ErrorPage { .. } | Self::ShortResponse { .. })
    }
}

impl From<zip::result::ZipError> for ResolveError {
    fn from(e: zip::result::ZipError) -> Self {
        Self::ArchiveUnreadable(e.to_string())
    }
}

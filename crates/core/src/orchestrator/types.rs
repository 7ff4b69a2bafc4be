//! Types for the selection orchestrator.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::media::MediaDescriptor;
use crate::resolver::ResolveError;
use crate::searcher::FetchError;
use crate::subtitle::{Candidate, SubtitleFormat, TextFormat};
use crate::writer::WriterError;

/// Group of candidates tried together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Archive-bearing candidates, tried first.
    Archive,
    /// Direct `.ass`/`.srt` candidates.
    Direct,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Archive => write!(f, "archive"),
            Tier::Direct => write!(f, "direct"),
        }
    }
}

/// Selection state for one media file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "tier", rename_all = "snake_case")]
pub enum SelectionState {
    Searching,
    Ranking,
    Attempting(Tier),
    Done,
}

/// Why a single download attempt failed. Never fatal beyond the attempt.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("download failed: {0}")]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("write failed: {0}")]
    Write(#[from] WriterError),
}

impl AttemptError {
    /// Stable label for reports and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "fetch_failure",
            Self::Resolve(e) => e.kind(),
            Self::Write(_) => "write_failure",
        }
    }
}

/// One failed download attempt.
#[derive(Debug, Clone, Serialize)]
pub struct AttemptRecord {
    pub tier: Tier,
    pub download_url: String,
    pub display_text: String,
    pub kind: String,
    pub message: String,
}

impl AttemptRecord {
    pub fn new(tier: Tier, candidate: &Candidate, error: &AttemptError) -> Self {
        Self {
            tier,
            download_url: candidate.download_url.clone(),
            display_text: candidate.display_text.clone(),
            kind: error.kind().to_string(),
            message: error.to_string(),
        }
    }
}

/// A download that a dry run would have attempted.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedAttempt {
    pub tier: Tier,
    pub download_url: String,
    pub display_text: String,
    pub format: SubtitleFormat,
    pub detail_url: String,
}

/// Final result for one media file.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SelectionOutcome {
    /// A subtitle was written.
    Success {
        path: PathBuf,
        format: TextFormat,
        tier: Tier,
        download_url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        archive_entry: Option<String>,
    },
    /// Every allowed attempt failed, or nothing was eligible.
    Exhausted,
    /// The search itself failed.
    SearchFailed { reason: String },
    /// Nothing was downloaded; these attempts were planned.
    DryRun { planned: Vec<PlannedAttempt> },
}

impl SelectionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Everything that happened while selecting a subtitle for one media file.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionReport {
    pub media: PathBuf,
    pub descriptor: MediaDescriptor,
    /// Query sent to the site, empty when the search did not run.
    pub query: String,
    pub candidates: usize,
    /// States visited, in order.
    pub states: Vec<SelectionState>,
    pub attempts: Vec<AttemptRecord>,
    pub outcome: SelectionOutcome,
}

//! Types for page fetching and subtitle search.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::subtitle::Candidate;

/// Which timeout budget a request falls under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// Listing and detail pages.
    Page,
    /// Subtitle payloads.
    Download,
}

/// A successfully fetched response.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects.
    pub url: String,
    pub status: u16,
    pub bytes: Vec<u8>,
    /// File name declared by the server, if any.
    pub filename: Option<String>,
}

impl FetchedPage {
    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Errors from the page fetcher.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Connection to {url} failed: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Request to {url} failed: {reason}")]
    Request { url: String, reason: String },
}

impl FetchError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "fetch_timeout",
            Self::ConnectionFailed { .. } => "fetch_connection",
            Self::Status { .. } => "fetch_status",
            Self::Request { .. } => "fetch_failed",
        }
    }
}

/// Trait for anything that can fetch a URL.
///
/// Implementations own the request throttle: consecutive calls are spaced
/// by at least the configured interval.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url`, sending `referer` when given. Non-success statuses are errors.
    async fn fetch(
        &self,
        url: &str,
        referer: Option<&str>,
        kind: FetchKind,
    ) -> Result<FetchedPage, FetchError>;
}

/// Errors that abort the search for one media file.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Empty search query")]
    EmptyQuery,

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Listing page failed: {0}")]
    Listing(#[from] FetchError),
}

/// Outcome of one search pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResult {
    /// Query string sent to the site.
    pub query: String,
    /// Candidates in discovery order, unique by download URL.
    pub candidates: Vec<Candidate>,
    pub pages_fetched: u32,
    pub detail_pages: usize,
    /// Detail pages that failed and were skipped.
    pub detail_failures: usize,
}

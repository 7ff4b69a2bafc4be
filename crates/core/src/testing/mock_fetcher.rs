//! Mock page fetcher for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::searcher::{FetchError, FetchKind, FetchedPage, PageFetcher};

/// A recorded fetch for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedFetch {
    pub url: String,
    pub referer: Option<String>,
    pub kind: FetchKind,
}

/// Mock implementation of the PageFetcher trait.
///
/// Responses are keyed by exact URL. Unknown URLs answer with HTTP 404.
#[derive(Debug, Default)]
pub struct MockFetcher {
    /// Configured responses by URL.
    responses: Arc<RwLock<HashMap<String, Result<FetchedPage, FetchError>>>>,
    /// Recorded requests, in order.
    fetches: Arc<RwLock<Vec<RecordedFetch>>>,
}

impl MockFetcher {
    /// Create a new mock fetcher with no configured responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` at `url`.
    pub async fn set_page(&self, url: &str, html: &str) {
        self.set_bytes(url, html.as_bytes().to_vec(), None).await;
    }

    /// Serve raw bytes at `url`, optionally with a declared file name.
    pub async fn set_bytes(&self, url: &str, bytes: Vec<u8>, filename: Option<&str>) {
        let page = FetchedPage {
            url: url.to_string(),
            status: 200,
            bytes,
            filename: filename.map(str::to_string),
        };
        self.responses.write().await.insert(url.to_string(), Ok(page));
    }

    /// Fail every request to `url` with `error`.
    pub async fn set_error(&self, url: &str, error: FetchError) {
        self.responses
            .write()
            .await
            .insert(url.to_string(), Err(error));
    }

    /// Get all recorded fetches.
    pub async fn recorded_fetches(&self) -> Vec<RecordedFetch> {
        self.fetches.read().await.clone()
    }

    /// URLs requested so far, in order.
    pub async fn fetched_urls(&self) -> Vec<String> {
        self.fetches
            .read()
            .await
            .iter()
            .map(|f| f.url.clone())
            .collect()
    }

    /// Number of requests for `url`.
    pub async fn fetch_count(&self, url: &str) -> usize {
        self.fetches
            .read()
            .await
            .iter()
            .filter(|f| f.url == url)
            .count()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(
        &self,
        url: &str,
        referer: Option<&str>,
        kind: FetchKind,
    ) -> Result<FetchedPage, FetchError> {
        self.fetches.write().await.push(RecordedFetch {
            url: url.to_string(),
            referer: referer.map(str::to_string),
            kind,
        });

        match self.responses.read().await.get(url) {
            Some(response) => response.clone(),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_configured_and_unknown_urls() {
        let fetcher = MockFetcher::new();
        fetcher.set_page("https://a/1", "hello").await;

        let page = fetcher
            .fetch("https://a/1", Some("https://a/"), FetchKind::Page)
            .await
            .unwrap();
        assert_eq!(page.text(), "hello");

        let err = fetcher
            .fetch("https://a/2", None, FetchKind::Download)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));

        let fetches = fetcher.recorded_fetches().await;
        assert_eq!(fetches.len(), 2);
        assert_eq!(fetches[0].referer.as_deref(), Some("https://a/"));
        assert_eq!(fetches[1].kind, FetchKind::Download);
        assert_eq!(fetcher.fetch_count("https://a/1").await, 1);
    }
}

//! reqwest-backed page fetcher.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_DISPOSITION, REFERER, USER_AGENT,
};
use reqwest::Client;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::SiteConfig;

use super::throttle::MinIntervalThrottle;
use super::{FetchError, FetchKind, FetchedPage, PageFetcher};

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

static DISPOSITION_FILENAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)filename\*?=(?:UTF-8''|'')?([^;]+)").expect("valid disposition regex")
});

/// Extracts the file name from a `Content-Disposition` header value.
///
/// Handles both `filename="x"` and RFC 5987 `filename*=UTF-8''x` forms,
/// taking the first one present.
pub fn filename_from_disposition(header: &str) -> Option<String> {
    let caps = DISPOSITION_FILENAME_RE.captures(header)?;
    let raw = caps
        .get(1)?
        .as_str()
        .trim()
        .trim_matches('"')
        .trim_matches('\'');
    let name = urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string());
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Page fetcher with browser-like headers, a cookie jar and a request throttle.
pub struct HttpFetcher {
    client: Client,
    page_timeout: Duration,
    download_timeout: Duration,
    throttle: Mutex<MinIntervalThrottle>,
}

impl HttpFetcher {
    pub fn new(config: &SiteConfig) -> Result<Self, FetchError> {
        let invalid = |reason: String| FetchError::Request {
            url: config.base_url.clone(),
            reason,
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| invalid(format!("invalid user agent: {}", e)))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language)
                .map_err(|e| invalid(format!("invalid accept language: {}", e)))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .build()
            .map_err(|e| invalid(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            page_timeout: config.page_timeout(),
            download_timeout: config.download_timeout(),
            throttle: Mutex::new(MinIntervalThrottle::new(config.min_interval())),
        })
    }

    async fn send(
        &self,
        url: &str,
        referer: Option<&str>,
        kind: FetchKind,
    ) -> Result<FetchedPage, FetchError> {
        let timeout = match kind {
            FetchKind::Page => self.page_timeout,
            FetchKind::Download => self.download_timeout,
        };

        let mut request = self.client.get(url).timeout(timeout);
        if let Some(referer) = referer {
            request = request.header(REFERER, referer);
        }

        let response = request.send().await.map_err(|e| map_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let filename = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_disposition);
        let final_url = response.url().to_string();

        let bytes = response.bytes().await.map_err(|e| map_error(url, e))?;

        debug!(
            url = %url,
            status = status.as_u16(),
            bytes = bytes.len(),
            filename = ?filename,
            "Fetched"
        );

        Ok(FetchedPage {
            url: final_url,
            status: status.as_u16(),
            bytes: bytes.to_vec(),
            filename,
        })
    }
}

fn map_error(url: &str, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if e.is_connect() {
        FetchError::ConnectionFailed {
            url: url.to_string(),
            reason: e.to_string(),
        }
    } else {
        FetchError::Request {
            url: url.to_string(),
            reason: e.to_string(),
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(
        &self,
        url: &str,
        referer: Option<&str>,
        kind: FetchKind,
    ) -> Result<FetchedPage, FetchError> {
        let mut throttle = self.throttle.lock().await;
        throttle.wait().await;
        let result = self.send(url, referer, kind).await;
        throttle.record();
        result
    }
}

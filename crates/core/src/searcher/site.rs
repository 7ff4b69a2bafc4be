//! Paginated search against the subtitle site.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};
use url::Url;

use crate::config::Config;
use crate::markup::{parse_detail_page, parse_listing_page};
use crate::media::MediaDescriptor;
use crate::subtitle::Candidate;

use super::{FetchKind, PageFetcher, SearchError, SearchResult};

const LISTING_PATH: &str = "/download/xslist.php";

/// Whether `c` is a CJK unified ideograph.
fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

/// Builds the site query for a title.
///
/// Titles mixing CJK and other characters are searched by their CJK part
/// only; the site matches those far better.
pub fn build_query(title: &str) -> String {
    let title = title.trim();
    let cjk: String = title.chars().filter(|c| is_cjk(*c)).collect();
    if !cjk.is_empty() && cjk.chars().count() < title.chars().count() {
        cjk
    } else {
        title.to_string()
    }
}

/// Keeps candidates whose display text mentions the episode tag.
pub fn filter_by_episode(candidates: Vec<Candidate>, tag: &str) -> Vec<Candidate> {
    let tag = tag.to_uppercase();
    candidates
        .into_iter()
        .filter(|c| c.display_text.to_uppercase().contains(&tag))
        .collect()
}

/// Collects subtitle candidates for a media file.
pub struct SubtitleSearcher {
    fetcher: Arc<dyn PageFetcher>,
    base_url: Url,
    max_pages: u32,
}

impl SubtitleSearcher {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        base_url: &str,
        max_pages: u32,
    ) -> Result<Self, SearchError> {
        let base_url = Url::parse(base_url).map_err(|e| SearchError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            fetcher,
            base_url,
            max_pages,
        })
    }

    pub fn from_config(fetcher: Arc<dyn PageFetcher>, config: &Config) -> Result<Self, SearchError> {
        Self::new(fetcher, &config.site.base_url, config.search.max_pages)
    }

    /// URL of listing page `page` (1-based) for `query`.
    pub fn listing_url(&self, query: &str, page: u32) -> String {
        let mut url = format!(
            "{}{}?key={}",
            self.base_url.as_str().trim_end_matches('/'),
            LISTING_PATH,
            urlencoding::encode(query)
        );
        if page > 1 {
            url.push_str(&format!("&p={}", page));
        }
        url
    }

    /// Visits the site root so the session picks up cookies. Failures are ignored.
    pub async fn warm_up(&self) {
        match self
            .fetcher
            .fetch(self.base_url.as_str(), None, FetchKind::Page)
            .await
        {
            Ok(page) => debug!(bytes = page.bytes.len(), "Warm-up request done"),
            Err(e) => debug!(error = %e, "Warm-up request failed"),
        }
    }

    /// Runs the full search for one media file.
    ///
    /// A failing first listing page aborts the search. Later listing pages
    /// that fail end pagination, and failing detail pages are skipped.
    pub async fn search(&self, media: &MediaDescriptor) -> Result<SearchResult, SearchError> {
        let query = build_query(&media.title);
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        if query != media.title.trim() {
            debug!(title = %media.title, query = %query, "Using CJK part of title as query");
        }

        self.warm_up().await;

        let mut result = SearchResult {
            query: query.clone(),
            ..Default::default()
        };
        let mut visited = HashSet::new();
        let mut seen_downloads = HashSet::new();

        for page in 1..=self.max_pages {
            let listing_url = self.listing_url(&query, page);
            let listing = match self.fetcher.fetch(&listing_url, None, FetchKind::Page).await {
                Ok(listing) => listing,
                Err(e) if page == 1 => return Err(e.into()),
                Err(e) => {
                    warn!(page, error = %e, "Listing page failed, stopping pagination");
                    break;
                }
            };
            result.pages_fetched += 1;

            let detail_urls = parse_listing_page(&listing.text(), &self.base_url);
            debug!(page, details = detail_urls.len(), "Parsed listing page");

            for detail_url in detail_urls {
                if !visited.insert(detail_url.clone()) {
                    continue;
                }
                result.detail_pages += 1;

                let detail = match self
                    .fetcher
                    .fetch(&detail_url, Some(&listing_url), FetchKind::Page)
                    .await
                {
                    Ok(detail) => detail,
                    Err(e) => {
                        warn!(url = %detail_url, error = %e, "Skipping detail page");
                        result.detail_failures += 1;
                        continue;
                    }
                };

                for candidate in parse_detail_page(&detail.text(), &detail_url, &self.base_url) {
                    if seen_downloads.insert(candidate.download_url.clone()) {
                        result.candidates.push(candidate);
                    }
                }
            }
        }

        if let Some(tag) = media.episode_tag() {
            let before = result.candidates.len();
            result.candidates = filter_by_episode(std::mem::take(&mut result.candidates), &tag);
            debug!(
                episode = %tag,
                before,
                after = result.candidates.len(),
                "Applied episode filter"
            );
        }

        info!(
            query = %result.query,
            pages = result.pages_fetched,
            details = result.detail_pages,
            candidates = result.candidates.len(),
            "Search complete"
        );
        Ok(result)
    }
}

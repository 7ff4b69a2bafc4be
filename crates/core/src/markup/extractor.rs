//! Link extraction from listing and detail pages.

use std::collections::HashSet;

use dom_query::Document;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use tracing::debug;
use url::Url;

use super::tree::{DomNode, MarkupNode};
use crate::classifier::classify_link;
use crate::subtitle::Candidate;

/// Heading text that introduces the download section of a detail page.
pub const DOWNLOAD_SECTION_MARKER: &str = "字幕文件下载";

/// Pages shorter than this (in characters) without the section marker are
/// treated as truncated or anti-bot responses.
pub const DEGENERATE_PAGE_CHARS: usize = 2000;

const DOWNLOAD_ANCHOR_SELECTOR: &str = r#"a[href*="/download/"]"#;

/// Numeric detail page link on listing pages.
static DETAIL_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/download/\d+").expect("valid detail link regex"));

/// A download link found on a detail page, before classification.
#[derive(Debug, Clone)]
pub struct RawLink<N> {
    /// The href exactly as it appears in the markup.
    pub href: String,
    /// `href` resolved against the site origin.
    pub url: String,
    /// Visible anchor text, or the last path segment when the anchor is empty.
    pub text: String,
    /// Nearest `li` ancestor, else the anchor's parent, else the scan scope.
    pub container: N,
}

/// Whether a detail page is too small and lacks the download section.
pub fn is_degenerate_page(html: &str) -> bool {
    !html.contains(DOWNLOAD_SECTION_MARKER) && html.chars().count() < DEGENERATE_PAGE_CHARS
}

/// Narrows the scan to the download list when the page has one.
///
/// Looks for the first `h2`/`h3` mentioning the section marker, then its first
/// following sibling `div.list`. Falls back to `root`.
pub fn download_section<N: MarkupNode>(root: &N) -> N {
    let heading = root
        .select_all("h2, h3")
        .into_iter()
        .find(|h| h.text().contains(DOWNLOAD_SECTION_MARKER));

    heading
        .and_then(|h| {
            h.next_element_siblings().into_iter().find(|sibling| {
                sibling.tag_name().as_deref() == Some("div") && sibling.has_class("list")
            })
        })
        .unwrap_or_else(|| root.clone())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extracts content download links below `scope`.
///
/// Hrefs are deduplicated as written. Links to further `.html` pages and
/// `.rar` archives are dropped, as are hrefs that cannot be resolved.
pub fn extract_download_links<N: MarkupNode>(scope: &N, base: &Url) -> Vec<RawLink<N>> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in scope.select_all(DOWNLOAD_ANCHOR_SELECTOR) {
        let href = match anchor.attr("href") {
            Some(h) => h.trim().to_string(),
            None => continue,
        };
        if href.is_empty() || !seen.insert(href.clone()) {
            continue;
        }

        let lower = href.to_lowercase();
        if lower.ends_with(".html") {
            continue;
        }
        if lower.ends_with(".rar") {
            debug!(href = %href, "Skipping unsupported rar archive");
            continue;
        }

        let url = match base.join(&href) {
            Ok(url) => url.to_string(),
            Err(e) => {
                debug!(href = %href, error = %e, "Skipping unresolvable link");
                continue;
            }
        };

        let mut text = collapse_whitespace(&anchor.text());
        if text.is_empty() {
            text = href.rsplit('/').next().unwrap_or_default().to_string();
        }

        let container = anchor
            .closest("li")
            .or_else(|| anchor.parent())
            .unwrap_or_else(|| scope.clone());

        links.push(RawLink {
            href,
            url,
            text,
            container,
        });
    }

    links
}

/// Extracts detail page URLs from a search listing page.
///
/// Accepts `/download/` links ending in `.html` or with a numeric id;
/// the latter get `.html` appended. Results are unique, in page order.
pub fn extract_detail_links<N: MarkupNode>(root: &N, base: &Url) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for anchor in root.select_all(DOWNLOAD_ANCHOR_SELECTOR) {
        let Some(href) = anchor.attr("href") else {
            continue;
        };
        let href = href.trim();
        if !(href.ends_with(".html") || DETAIL_ID_RE.is_match(href)) {
            continue;
        }
        let Ok(full) = base.join(href) else {
            continue;
        };
        let mut full = full.to_string();
        if !full.ends_with(".html") {
            full.push_str(".html");
        }
        if seen.insert(full.clone()) {
            urls.push(full);
        }
    }

    urls
}

/// Parses a search listing page into detail page URLs.
pub fn parse_listing_page(html: &str, base: &Url) -> Vec<String> {
    let doc = Document::from(html);
    match DomNode::root(&doc) {
        Some(root) => extract_detail_links(&root, base),
        None => Vec::new(),
    }
}

/// Parses one detail page into classified candidates.
///
/// Degenerate pages and pages without recognizable links yield an empty list.
pub fn parse_detail_page(html: &str, detail_url: &str, base: &Url) -> Vec<Candidate> {
    if is_degenerate_page(html) {
        debug!(
            url = detail_url,
            len = html.len(),
            "Truncated or anti-bot page, no download section"
        );
        return Vec::new();
    }

    let doc = Document::from(html);
    let Some(root) = DomNode::root(&doc) else {
        return Vec::new();
    };
    let scope = download_section(&root);
    let links = extract_download_links(&scope, base);
    debug!(url = detail_url, links = links.len(), "Parsed detail page");

    links
        .iter()
        .map(|link| classify_link(link, detail_url))
        .collect()
}

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::subtitle::TextFormat;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
}

/// Subtitle site connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_accept_language")]
    pub accept_language: String,
    /// Timeout for listing and detail pages.
    #[serde(default = "default_page_timeout_secs")]
    pub page_timeout_secs: u64,
    /// Timeout for subtitle downloads.
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,
    /// Minimum delay between two consecutive requests.
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
}

impl SiteConfig {
    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            page_timeout_secs: default_page_timeout_secs(),
            download_timeout_secs: default_download_timeout_secs(),
            min_interval_ms: default_min_interval_ms(),
        }
    }
}

fn default_base_url() -> String {
    "https://www.samfunny.com".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

fn default_accept_language() -> String {
    "zh-CN,zh;q=0.9,en;q=0.8".to_string()
}

fn default_page_timeout_secs() -> u64 {
    20
}

fn default_download_timeout_secs() -> u64 {
    60
}

fn default_min_interval_ms() -> u64 {
    1200
}

/// Listing search settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Number of listing pages fetched per media file.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
        }
    }
}

fn default_max_pages() -> u32 {
    2
}

/// Candidate selection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SelectionConfig {
    #[serde(default)]
    pub preferred_format: TextFormat,
    /// Download attempts in the archive tier.
    #[serde(default = "default_attempts")]
    pub archive_attempts: usize,
    /// Download attempts in the direct-file tier.
    #[serde(default = "default_attempts")]
    pub direct_attempts: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            preferred_format: TextFormat::default(),
            archive_attempts: default_attempts(),
            direct_attempts: default_attempts(),
        }
    }
}

fn default_attempts() -> usize {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.site.base_url, "https://www.samfunny.com");
        assert_eq!(config.site.min_interval(), Duration::from_millis(1200));
        assert_eq!(config.site.page_timeout(), Duration::from_secs(20));
        assert_eq!(config.site.download_timeout(), Duration::from_secs(60));
        assert_eq!(config.search.max_pages, 2);
        assert_eq!(config.selection.preferred_format, TextFormat::Ass);
        assert_eq!(config.selection.archive_attempts, 3);
        assert_eq!(config.selection.direct_attempts, 3);
    }

    #[test]
    fn test_empty_sections_get_defaults() {
        let config: Config = toml::from_str("[site]\n[selection]\n").unwrap();
        assert_eq!(config.site.page_timeout_secs, 20);
        assert_eq!(config.selection.direct_attempts, 3);
    }
}

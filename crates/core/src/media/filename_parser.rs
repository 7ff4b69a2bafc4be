//! Filename parser for scene-style release names.
//!
//! Handles names like:
//! - "Interstellar.2014.1080p.BluRay.x264.mkv"
//! - "The.Bear.S02E05.1080p.WEB.h264-GROUP.mkv"
//! - "Show_1x03_720p.mp4"

use once_cell::sync::Lazy;
use regex_lite::Regex;
use std::path::Path;
use tracing::debug;

use super::types::MediaDescriptor;

/// S01E01 episode marker.
static SXXEXX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bS(\d{1,2})E(\d{1,3})\b").expect("valid episode regex"));

/// 1x01 episode marker.
static NXNN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})x(\d{2,3})\b").expect("valid episode regex"));

/// Standalone year.
static YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(19\d{2}|20\d{2})\b").expect("valid year regex"));

/// Release tokens that never belong to a title.
static QUALITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(2160p|1080p|1080i|720p|576p|480p|4k|uhd|hdr|dv|hybrid|bluray|blu-ray|bdrip|brrip|remux|web-dl|webdl|webrip|web|hdtv|dvdrip|x264|x265|h264|h265|hevc|avc|proper|repack)\b",
    )
    .expect("valid quality regex")
});

static MULTI_SPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Parse a media file path into a [`MediaDescriptor`].
///
/// The title is everything before the first year, episode or quality marker.
/// A year at the very start of the name is treated as part of the title
/// ("1917.2019.mkv").
pub fn parse_media_filename(path: &Path) -> MediaDescriptor {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let normalized = MULTI_SPACE_RE
        .replace_all(&stem.replace(['.', '_'], " "), " ")
        .trim()
        .to_string();

    let mut cut = normalized.len();
    let mut season = None;
    let mut episode = None;

    if let Some(caps) = SXXEXX_RE
        .captures(&normalized)
        .or_else(|| NXNN_RE.captures(&normalized))
    {
        season = caps.get(1).and_then(|m| m.as_str().parse().ok());
        episode = caps.get(2).and_then(|m| m.as_str().parse().ok());
        if let Some(whole) = caps.get(0) {
            cut = cut.min(whole.start());
        }
    }

    let year_match = YEAR_RE.find_iter(&normalized).find(|m| m.start() > 0);
    let year = year_match.and_then(|m| m.as_str().parse().ok());
    if let Some(m) = year_match {
        cut = cut.min(m.start());
    }

    if let Some(m) = QUALITY_RE.find(&normalized) {
        if m.start() > 0 {
            cut = cut.min(m.start());
        }
    }

    let mut title = normalized[..cut]
        .trim()
        .trim_end_matches(['-', '(', '['])
        .trim()
        .to_string();
    if title.is_empty() {
        title = normalized.clone();
    }

    let descriptor = MediaDescriptor {
        title,
        year,
        season,
        episode,
    };
    debug!(
        file = %path.display(),
        title = %descriptor.title,
        year = ?descriptor.year,
        episode = ?descriptor.episode_tag(),
        "Parsed media filename"
    );
    descriptor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(name: &str) -> MediaDescriptor {
        parse_media_filename(Path::new(name))
    }

    #[test]
    fn test_movie_with_year() {
        let media = parse("Interstellar.2014.1080p.BluRay.x264.mkv");
        assert_eq!(media.title, "Interstellar");
        assert_eq!(media.year, Some(2014));
        assert!(media.episode_tag().is_none());
    }

    #[test]
    fn test_episode_sxxexx() {
        let media = parse("The.Bear.S02E05.1080p.WEB.h264-GROUP.mkv");
        assert_eq!(media.title, "The Bear");
        assert_eq!(media.season, Some(2));
        assert_eq!(media.episode, Some(5));
        assert_eq!(media.episode_tag().as_deref(), Some("S02E05"));
    }

    #[test]
    fn test_episode_nxnn() {
        let media = parse("Show_1x03_720p.mp4");
        assert_eq!(media.title, "Show");
        assert_eq!(media.episode_tag().as_deref(), Some("S01E03"));
    }

    #[test]
    fn test_leading_year_is_title() {
        let media = parse("1917.2019.2160p.UHD.mkv");
        assert_eq!(media.title, "1917");
        assert_eq!(media.year, Some(2019));
    }

    #[test]
    fn test_resolution_is_not_a_year() {
        let media = parse("Heat.1080p.mkv");
        assert_eq!(media.title, "Heat");
        assert_eq!(media.year, None);
    }

    #[test]
    fn test_cjk_title_kept() {
        let media = parse("星际穿越.Interstellar.2014.mkv");
        assert_eq!(media.title, "星际穿越 Interstellar");
        assert_eq!(media.year, Some(2014));
    }

    #[test]
    fn test_plain_name() {
        let media = parse("home video.mp4");
        assert_eq!(media.title, "home video");
        assert_eq!(media.year, None);
        assert_eq!(media.season, None);
    }
}

//! Types describing discovered subtitle offers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Language tag attached to a candidate.
///
/// The declaration order is the ranking precedence: bilingual first,
/// traditional last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Bilingual,
    Simplified,
    English,
    Traditional,
}

impl Language {
    /// All tags, in ranking order.
    pub const ALL: [Language; 4] = [
        Language::Bilingual,
        Language::Simplified,
        Language::English,
        Language::Traditional,
    ];

    /// Position of this tag in the language-group ranking (0 is best).
    pub fn group_rank(self) -> u8 {
        match self {
            Language::Bilingual => 0,
            Language::Simplified => 1,
            Language::English => 2,
            Language::Traditional => 3,
        }
    }
}

/// Set of language tags. Ordered by ranking precedence, duplicates impossible.
pub type LanguageSet = BTreeSet<Language>;

/// Subtitle format inferred for a candidate before download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtitleFormat {
    /// A zip archive that may hold several subtitle files.
    Archive,
    /// Advanced SubStation Alpha text subtitles.
    Ass,
    /// SubRip text subtitles.
    Srt,
    /// Image based (PGS) subtitles. Never written to disk.
    Sup,
    Unknown,
}

impl SubtitleFormat {
    /// Returns the text format this value names, if any.
    pub fn as_text_format(self) -> Option<TextFormat> {
        match self {
            SubtitleFormat::Ass => Some(TextFormat::Ass),
            SubtitleFormat::Srt => Some(TextFormat::Srt),
            _ => None,
        }
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SubtitleFormat::Archive => "archive",
            SubtitleFormat::Ass => "ass",
            SubtitleFormat::Srt => "srt",
            SubtitleFormat::Sup => "sup",
            SubtitleFormat::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// A text subtitle format that can be written next to a media file.
///
/// Used both as the caller's preferred format and as the resolved output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextFormat {
    #[default]
    Ass,
    Srt,
}

impl TextFormat {
    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            TextFormat::Ass => "ass",
            TextFormat::Srt => "srt",
        }
    }

    /// The other text format.
    pub fn other(self) -> TextFormat {
        match self {
            TextFormat::Ass => TextFormat::Srt,
            TextFormat::Srt => TextFormat::Ass,
        }
    }

    /// Detects the format from a file name's extension (case-insensitive).
    pub fn from_file_name(name: &str) -> Option<TextFormat> {
        let lower = name.to_lowercase();
        if lower.ends_with(".ass") {
            Some(TextFormat::Ass)
        } else if lower.ends_with(".srt") {
            Some(TextFormat::Srt)
        } else {
            None
        }
    }
}

impl fmt::Display for TextFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for TextFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ass" => Ok(TextFormat::Ass),
            "srt" => Ok(TextFormat::Srt),
            other => Err(format!("unknown subtitle format: {other}")),
        }
    }
}

impl From<TextFormat> for SubtitleFormat {
    fn from(format: TextFormat) -> Self {
        match format {
            TextFormat::Ass => SubtitleFormat::Ass,
            TextFormat::Srt => SubtitleFormat::Srt,
        }
    }
}

/// One discovered subtitle offer.
///
/// Built once by the detail-page parser and only read afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Page the candidate was found on. Also sent as Referer on download.
    pub detail_url: String,
    /// Absolute download URL. Unique within one collection pass.
    pub download_url: String,
    /// Anchor text, used by every text heuristic.
    pub display_text: String,
    /// Language tags found around the link.
    pub languages: LanguageSet,
    pub format: SubtitleFormat,
    /// Download count shown by the site. `None` when the marker is missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_text: Option<String>,
    pub is_bilingual: bool,
    /// Manual ranking override, higher is better.
    #[serde(default)]
    pub score_hint: i32,
}

impl Candidate {
    /// Best language group of this candidate, `None` if untagged.
    pub fn best_language(&self) -> Option<Language> {
        self.languages.iter().next().copied()
    }

    /// Whether the display text names an archive, regardless of `format`.
    pub fn mentions_archive(&self) -> bool {
        self.display_text.to_lowercase().contains(".zip")
    }

    /// Whether the display text names a direct text subtitle file.
    pub fn mentions_text_subtitle(&self) -> bool {
        let lower = self.display_text.to_lowercase();
        lower.contains(".srt") || lower.contains(".ass")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_set_order_follows_rank() {
        let set: LanguageSet = [Language::Traditional, Language::Bilingual, Language::English]
            .into_iter()
            .collect();
        let ordered: Vec<_> = set.into_iter().collect();
        assert_eq!(
            ordered,
            vec![Language::Bilingual, Language::English, Language::Traditional]
        );
    }

    #[test]
    fn test_language_set_has_no_duplicates() {
        let mut set = LanguageSet::new();
        set.insert(Language::Simplified);
        set.insert(Language::Simplified);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_text_format_from_file_name() {
        assert_eq!(TextFormat::from_file_name("a.ASS"), Some(TextFormat::Ass));
        assert_eq!(TextFormat::from_file_name("dir/b.srt"), Some(TextFormat::Srt));
        assert_eq!(TextFormat::from_file_name("c.sup"), None);
    }

    #[test]
    fn test_text_format_parse() {
        assert_eq!("ASS".parse::<TextFormat>(), Ok(TextFormat::Ass));
        assert_eq!(" srt ".parse::<TextFormat>(), Ok(TextFormat::Srt));
        assert!("vtt".parse::<TextFormat>().is_err());
    }

    #[test]
    fn test_subtitle_format_serialization() {
        assert_eq!(
            serde_json::to_string(&SubtitleFormat::Archive).unwrap(),
            "\"archive\""
        );
        assert_eq!(serde_json::to_string(&TextFormat::Srt).unwrap(), "\"srt\"");
    }

    #[test]
    fn test_tier_hints_from_display_text() {
        let candidate = Candidate {
            detail_url: "https://example.com/download/1.html".to_string(),
            download_url: "https://example.com/download/1/x".to_string(),
            display_text: "Movie.2014.CHS&ENG.ZIP".to_string(),
            languages: LanguageSet::new(),
            format: SubtitleFormat::Unknown,
            download_count: None,
            size_text: None,
            source_text: None,
            is_bilingual: true,
            score_hint: 0,
        };
        assert!(candidate.mentions_archive());
        assert!(!candidate.mentions_text_subtitle());
        assert_eq!(candidate.best_language(), None);
    }
}

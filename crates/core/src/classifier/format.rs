//! Subtitle format inference from free text.

use crate::subtitle::SubtitleFormat;

/// Words that mark multi-language rows. They commonly sit next to an ASS
/// keyword that does not describe the file itself.
pub const MULTI_LANGUAGE_MARKERS: &[&str] = &["中英", "双语", "简英"];

/// Extension substrings, archive first.
const EXTENSION_RULES: &[(&str, SubtitleFormat)] = &[
    (".ZIP", SubtitleFormat::Archive),
    (".ASS", SubtitleFormat::Ass),
    (".SRT", SubtitleFormat::Srt),
    (".SUP", SubtitleFormat::Sup),
];

/// Bare keywords, tried only when no extension matched.
const KEYWORD_RULES: &[(&str, SubtitleFormat)] = &[
    ("ASS", SubtitleFormat::Ass),
    ("SRT", SubtitleFormat::Srt),
    ("SUP", SubtitleFormat::Sup),
    ("ZIP", SubtitleFormat::Archive),
];

/// Ambiguous compound extension used for direct downloads.
const COMPOUND_MARKER: &str = ".SUB";

/// Rule 1: explicit extension substrings.
pub fn format_by_extension(text: &str) -> Option<SubtitleFormat> {
    let upper = text.to_uppercase();
    EXTENSION_RULES
        .iter()
        .find(|(ext, _)| upper.contains(ext))
        .map(|(_, format)| *format)
}

/// Rule 2: format keywords. `ASS` is ignored on multi-language rows.
pub fn format_by_keyword(text: &str) -> Option<SubtitleFormat> {
    let upper = text.to_uppercase();
    let multi_language = MULTI_LANGUAGE_MARKERS.iter().any(|m| upper.contains(m));
    KEYWORD_RULES
        .iter()
        .filter(|(_, format)| !(multi_language && *format == SubtitleFormat::Ass))
        .find(|(keyword, _)| upper.contains(keyword))
        .map(|(_, format)| *format)
}

/// Rule 3: `.sub` links, disambiguated by the text before the first `.sub`.
pub fn format_by_compound_marker(text: &str) -> Option<SubtitleFormat> {
    let upper = text.to_uppercase();
    let (prefix, _) = upper.split_once(COMPOUND_MARKER)?;
    if prefix.contains(".SRT") {
        Some(SubtitleFormat::Srt)
    } else if prefix.contains(".ASS") {
        Some(SubtitleFormat::Ass)
    } else {
        None
    }
}

/// Infers the format of a row, falling back to [`SubtitleFormat::Unknown`].
pub fn detect_format(text: &str) -> SubtitleFormat {
    format_by_extension(text)
        .or_else(|| format_by_keyword(text))
        .or_else(|| format_by_compound_marker(text))
        .unwrap_or(SubtitleFormat::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_extension_wins() {
        assert_eq!(
            detect_format("Interstellar.2014.1080p.BluRay.SRT.zip"),
            SubtitleFormat::Archive
        );
        assert_eq!(detect_format("a.ass b.srt pack.ZIP"), SubtitleFormat::Archive);
    }

    #[test]
    fn test_extension_priority() {
        assert_eq!(format_by_extension("x.srt and y.ass"), Some(SubtitleFormat::Ass));
        assert_eq!(format_by_extension("x.sup y.srt"), Some(SubtitleFormat::Srt));
        assert_eq!(format_by_extension("x.Sup"), Some(SubtitleFormat::Sup));
        assert_eq!(format_by_extension("no extension"), None);
    }

    #[test]
    fn test_keyword_fallback() {
        assert_eq!(detect_format("特效字幕 ASS"), SubtitleFormat::Ass);
        assert_eq!(detect_format("Movie SRT 1080p"), SubtitleFormat::Srt);
        assert_eq!(detect_format("原盘 SUP"), SubtitleFormat::Sup);
        assert_eq!(detect_format("打包 zip"), SubtitleFormat::Archive);
    }

    #[test]
    fn test_ass_keyword_suppressed_on_bilingual_rows() {
        assert_eq!(format_by_keyword("中英双语 ASS"), None);
        assert_eq!(format_by_keyword("简英 ASS SRT"), Some(SubtitleFormat::Srt));
        assert_eq!(detect_format("中英双语 ASS"), SubtitleFormat::Unknown);
    }

    #[test]
    fn test_extension_not_suppressed_on_bilingual_rows() {
        assert_eq!(detect_format("中英双语.ass"), SubtitleFormat::Ass);
    }

    #[test]
    fn test_compound_marker_rule_in_isolation() {
        assert_eq!(
            format_by_compound_marker("Movie.srt.sub"),
            Some(SubtitleFormat::Srt)
        );
        assert_eq!(
            format_by_compound_marker("Movie.ass.SUB"),
            Some(SubtitleFormat::Ass)
        );
        assert_eq!(format_by_compound_marker("Movie.sub"), None);
        assert_eq!(format_by_compound_marker("Movie.sub.srt"), None);
        assert_eq!(format_by_compound_marker("no marker"), None);
    }

    #[test]
    fn test_unknown_default() {
        assert_eq!(detect_format(""), SubtitleFormat::Unknown);
        assert_eq!(detect_format("Movie 2014 1080p"), SubtitleFormat::Unknown);
    }

    #[test]
    fn test_result_is_always_a_known_variant() {
        let samples = [
            "",
            ".zip",
            "ass",
            "中英 ass .sub",
            "x.ass.sub",
            "繁體 BIG5",
            "🎬",
        ];
        for sample in samples {
            let format = detect_format(sample);
            assert!(matches!(
                format,
                SubtitleFormat::Archive
                    | SubtitleFormat::Ass
                    | SubtitleFormat::Srt
                    | SubtitleFormat::Sup
                    | SubtitleFormat::Unknown
            ));
        }
    }
}

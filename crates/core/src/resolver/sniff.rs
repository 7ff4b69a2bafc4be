//! Content sniffing for text subtitles and known binary formats.

use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::subtitle::TextFormat;

/// Characters of text inspected by the content heuristics.
pub const SNIFF_HEAD_CHARS: usize = 2000;

const ASS_HEADER: &str = "[Script Info]";

/// Counter line directly followed by a timecode, at the very start.
static SRT_OPENING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+\s*\n\d{2}:\d{2}:\d{2},\d{3}").expect("valid srt opening regex")
});

static SRT_TIMING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{2}:\d{2}:\d{2},\d{3}\s*-->\s*\d{2}:\d{2}:\d{2},\d{3}")
        .expect("valid srt timing regex")
});

static NUMERIC_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\d+\s*$").expect("valid numeric line regex"));

static CLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{2}:\d{2}:\d{2}").expect("valid clock regex"));

static LEADING_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\d+").expect("valid leading number regex"));

/// Numeric-only lines needed before a text counts as SRT.
const MIN_NUMERIC_LINES: usize = 3;
/// Line count above which a text with a clock value is rescued as SRT.
const RESCUE_CLOCK_LINES: usize = 10;
/// Line count above which a number-led text is rescued as SRT.
const RESCUE_NUMBERED_LINES: usize = 50;

/// Binary signatures that identify payloads we cannot use.
const SIGNATURES: &[(&[u8], &str)] = &[
    (b"Rar!", "RAR archive (unsupported)"),
    (&[0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C], "7z archive (unsupported)"),
    (b"PK", "ZIP archive"),
    (b"PG", "SUP image subtitle (unsupported)"),
    (b"fLaC", "FLAC audio"),
    (b"OggS", "Ogg media"),
    (b"ID3", "MP3 audio"),
    (&[0x1A, 0x45, 0xDF, 0xA3], "Matroska media"),
];

/// Returns the first `max_chars` characters of `text`.
pub fn head(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn looks_like_ass(text: &str) -> bool {
    text.starts_with(ASS_HEADER) || head(text, SNIFF_HEAD_CHARS).contains(ASS_HEADER)
}

pub fn looks_like_srt(text: &str) -> bool {
    SRT_OPENING_RE.is_match(text)
        || SRT_TIMING_RE.is_match(head(text, SNIFF_HEAD_CHARS))
        || NUMERIC_LINE_RE.find_iter(text).count() > MIN_NUMERIC_LINES
}

/// Identifies a text subtitle from decoded, newline-normalized text.
pub fn sniff_text_format(text: &str) -> Option<TextFormat> {
    let text = text.trim();
    if looks_like_ass(text) {
        Some(TextFormat::Ass)
    } else if looks_like_srt(text) {
        Some(TextFormat::Srt)
    } else {
        None
    }
}

/// Looser SRT check for long texts the strict rules rejected.
pub fn rescue_as_srt(text: &str) -> bool {
    let lines = text.matches('\n').count();
    (lines > RESCUE_CLOCK_LINES && CLOCK_RE.is_match(head(text, SNIFF_HEAD_CHARS)))
        || (lines > RESCUE_NUMBERED_LINES && LEADING_NUMBER_RE.is_match(text))
}

/// Label for a recognized binary signature.
pub fn binary_signature(bytes: &[u8]) -> Option<&'static str> {
    SIGNATURES
        .iter()
        .find(|(magic, _)| bytes.starts_with(magic))
        .map(|(_, label)| *label)
}

/// Human-readable description of content that failed every check.
pub fn describe_content(bytes: &[u8], text: &str) -> String {
    if let Some(label) = binary_signature(bytes) {
        return label.to_string();
    }
    let lines = text.matches('\n').count();
    if lines > RESCUE_CLOCK_LINES {
        return format!("text file ({} lines, no subtitle timing found)", lines + 1);
    }
    let printable = text
        .chars()
        .all(|c| !c.is_control() || c.is_whitespace());
    if printable {
        format!("short text ({} chars)", text.chars().count())
    } else {
        format!("binary data ({} bytes)", bytes.len())
    }
}

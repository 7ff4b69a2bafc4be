//! Content resolution: turns downloaded bytes into a text subtitle.
//!
//! The checks form a decision list where the first match wins:
//! server error pages, short non-file responses, zip archives, sniffed
//! ASS/SRT text, a looser SRT rescue, and finally unsupported content.

mod archive;
mod decode;
mod error;
mod sniff;

pub use archive::{extract_subtitle, is_zip, pick_entry, ArchiveEntry, ExtractedEntry};
pub use decode::{decode_text, normalize_newlines, DecodedText};
pub use error::ResolveError;
pub use sniff::{
    binary_signature, describe_content, head, looks_like_ass, looks_like_srt, rescue_as_srt,
    sniff_text_format, SNIFF_HEAD_CHARS,
};

use tracing::debug;

use crate::subtitle::TextFormat;

/// Messages the site serves in place of a missing or forbidden file.
pub const ERROR_PAGE_PHRASES: &[&str] = &["文件不存在", "下载失败", "无权访问"];

/// Bodies shorter than this are suspected of not being a file.
pub const SHORT_RESPONSE_BYTES: usize = 100;
/// Bodies shorter than this are never a file.
pub const TINY_RESPONSE_BYTES: usize = 20;

const PREVIEW_CHARS: usize = 80;

/// A subtitle ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPayload {
    pub format: TextFormat,
    pub bytes: Vec<u8>,
    /// Archive member the payload came from, if any.
    pub entry_name: Option<String>,
}

impl ResolvedPayload {
    pub fn extension(&self) -> &'static str {
        self.format.extension()
    }
}

/// Resolves a downloaded payload.
///
/// `declared_name` is only used in diagnostics. `preferred` only matters
/// when choosing among archive members.
pub fn resolve_content(
    bytes: &[u8],
    declared_name: Option<&str>,
    preferred: TextFormat,
) -> Result<ResolvedPayload, ResolveError> {
    let lossy = String::from_utf8_lossy(bytes);

    if let Some(phrase) = ERROR_PAGE_PHRASES.iter().find(|p| lossy.contains(*p)) {
        return Err(ResolveError::ErrorPage {
            phrase: phrase.to_string(),
        });
    }

    if is_short_response(bytes, &lossy) {
        return Err(ResolveError::ShortResponse {
            len: bytes.len(),
            preview: head(lossy.trim(), PREVIEW_CHARS).to_string(),
        });
    }

    if is_zip(bytes) {
        let entry = extract_subtitle(bytes, preferred)?;
        return Ok(ResolvedPayload {
            format: entry.format,
            bytes: entry.bytes,
            entry_name: Some(entry.name),
        });
    }

    let decoded = decode_text(bytes);
    let text = normalize_newlines(&decoded.text);
    debug!(
        encoding = decoded.encoding.name(),
        bom = decoded.had_bom,
        len = bytes.len(),
        "Decoded payload"
    );

    let format = match sniff_text_format(&text) {
        Some(format) => Some(format),
        None if rescue_as_srt(&text) => {
            debug!(name = declared_name.unwrap_or("-"), "Rescued payload as SRT");
            Some(TextFormat::Srt)
        }
        None => None,
    };

    match format {
        Some(format) => Ok(ResolvedPayload {
            format,
            bytes: bytes.to_vec(),
            entry_name: None,
        }),
        None => Err(ResolveError::UnsupportedContent {
            name: declared_name.unwrap_or("<unnamed>").to_string(),
            detected: describe_content(bytes, &text),
        }),
    }
}

fn is_short_response(bytes: &[u8], lossy: &str) -> bool {
    bytes.len() < SHORT_RESPONSE_BYTES
        && (lossy.to_lowercase().contains("html") || bytes.len() < TINY_RESPONSE_BYTES)
}

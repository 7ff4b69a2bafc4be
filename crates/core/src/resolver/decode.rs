//! Lenient text decoding for downloaded subtitles.

use encoding_rs::{Encoding, GBK, UTF_8, WINDOWS_1252};

/// Encodings tried in order when the payload has no byte-order mark.
/// The last one maps every byte, so decoding never fails.
static FALLBACK_ENCODINGS: &[&Encoding] = &[UTF_8, GBK, WINDOWS_1252];

/// Decoded payload text.
#[derive(Debug, Clone)]
pub struct DecodedText {
    pub text: String,
    pub encoding: &'static Encoding,
    pub had_bom: bool,
}

/// Decodes subtitle bytes.
///
/// A byte-order mark picks the encoding and is stripped. Otherwise the
/// fallbacks are tried strictly, and the final one decodes with replacement.
pub fn decode_text(bytes: &[u8]) -> DecodedText {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return DecodedText {
            text: text.into_owned(),
            encoding,
            had_bom: true,
        };
    }

    for encoding in FALLBACK_ENCODINGS {
        if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(bytes) {
            return DecodedText {
                text: text.into_owned(),
                encoding,
                had_bom: false,
            };
        }
    }

    let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
    DecodedText {
        text: text.into_owned(),
        encoding: WINDOWS_1252,
        had_bom: false,
    }
}

/// Converts CRLF and lone CR line endings to LF.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

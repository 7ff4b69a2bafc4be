//! Format and language classification of extracted links.
//!
//! Each heuristic is an explicit, ordered decision list so that precedence
//! can be tested one rule at a time.

mod format;
mod language;
mod metadata;

pub use format::{
    detect_format, format_by_compound_marker, format_by_extension, format_by_keyword,
    MULTI_LANGUAGE_MARKERS,
};
pub use language::{detect_languages, has_bilingual_hint, is_bilingual, language_from_icon};
pub use metadata::{extract_row_metadata, RowMetadata};

use crate::markup::{MarkupNode, RawLink};
use crate::subtitle::Candidate;

/// Builds a candidate from one extracted link and its row container.
pub fn classify_link<N: MarkupNode>(link: &RawLink<N>, detail_url: &str) -> Candidate {
    let row_text = link.container.text();
    let languages = detect_languages(&link.container);
    let format = detect_format(&row_text);
    let metadata = extract_row_metadata(&link.container);
    let is_bilingual = is_bilingual(&languages, &row_text);

    Candidate {
        detail_url: detail_url.to_string(),
        download_url: link.url.clone(),
        display_text: link.text.clone(),
        languages,
        format,
        download_count: metadata.download_count,
        size_text: metadata.size_text,
        source_text: metadata.source_text,
        is_bilingual,
        score_hint: 0,
    }
}

//! Auxiliary row metadata: download count, size and source group.

use serde::{Deserialize, Serialize};

use crate::markup::MarkupNode;

/// Metadata read from fixed class markers inside a row container.
///
/// Every field is `None` when its marker is missing, so an absent download
/// count is never confused with an explicit zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowMetadata {
    pub download_count: Option<u64>,
    pub size_text: Option<String>,
    pub source_text: Option<String>,
}

fn marker_text<N: MarkupNode>(container: &N, selector: &str) -> Option<String> {
    container
        .select_first(selector)
        .map(|node| node.text().trim().to_string())
}

/// Reads `.shu span`, `.size` and `.zimuzu span` from a row container.
pub fn extract_row_metadata<N: MarkupNode>(container: &N) -> RowMetadata {
    RowMetadata {
        download_count: marker_text(container, ".shu span").and_then(|t| t.parse().ok()),
        size_text: marker_text(container, ".size"),
        source_text: marker_text(container, ".zimuzu span"),
    }
}

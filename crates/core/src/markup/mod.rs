//! Markup access and link extraction for listing and detail pages.
//!
//! The extractor only talks to pages through the read-only [`MarkupNode`]
//! trait. [`DomNode`] implements it on top of `dom_query`.

mod extractor;
mod tree;

pub use extractor::{
    download_section, extract_detail_links, extract_download_links, is_degenerate_page,
    parse_detail_page, parse_listing_page, RawLink, DEGENERATE_PAGE_CHARS,
    DOWNLOAD_SECTION_MARKER,
};
pub use tree::{DomNode, MarkupNode};

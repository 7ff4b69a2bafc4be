//! Testing utilities and mock implementations.
//!
//! Mocks of the HTTP and file system seams let the whole selection flow run
//! without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use zimu_core::testing::{fixtures, MockFetcher, MockWriter};
//!
//! let fetcher = MockFetcher::new();
//! fetcher.set_bytes("https://site/download/f/a.zip", fixtures::zip_archive(&[
//!     ("a.srt", b"1\n00:00:01,000 --> 00:00:02,000\nhi\n"),
//! ]), None).await;
//!
//! // ... run the orchestrator ...
//!
//! let writes = writer.recorded_writes().await;
//! assert_eq!(writes.len(), 1);
//! ```

mod mock_fetcher;
mod mock_writer;

pub use mock_fetcher::{MockFetcher, RecordedFetch};
pub use mock_writer::{MockWriter, RecordedWrite};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::io::{Cursor, Write};

    use zip::write::FileOptions;
    use zip::{CompressionMethod, ZipWriter};

    use crate::markup::DOWNLOAD_SECTION_MARKER;
    use crate::subtitle::{Candidate, LanguageSet, SubtitleFormat};

    /// Detail page URL used by [`candidate`].
    pub const DETAIL_URL: &str = "https://subs.example.com/download/1.html";

    /// Create an unclassified candidate: unknown format, no language tags,
    /// no download count.
    pub fn candidate(download_url: &str, display_text: &str) -> Candidate {
        Candidate {
            detail_url: DETAIL_URL.to_string(),
            download_url: download_url.to_string(),
            display_text: display_text.to_string(),
            languages: LanguageSet::new(),
            format: SubtitleFormat::Unknown,
            download_count: None,
            size_text: None,
            source_text: None,
            is_bilingual: false,
            score_hint: 0,
        }
    }

    /// Build an in-memory zip archive with the given `(name, contents)` entries.
    pub fn zip_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        for (name, contents) in entries {
            writer
                .start_file(*name, options)
                .expect("start zip entry");
            writer.write_all(contents).expect("write zip entry");
        }
        writer.finish().expect("finish zip").into_inner()
    }

    /// One download row on a detail page.
    #[derive(Debug, Clone, Default)]
    pub struct DetailRow {
        pub href: String,
        pub text: String,
        /// Flag icon names such as `china` or `uk`.
        pub icons: Vec<String>,
        pub downloads: Option<u64>,
        pub size: Option<String>,
        pub source: Option<String>,
    }

    impl DetailRow {
        pub fn new(href: &str, text: &str) -> Self {
            Self {
                href: href.to_string(),
                text: text.to_string(),
                ..Default::default()
            }
        }

        pub fn icon(mut self, name: &str) -> Self {
            self.icons.push(name.to_string());
            self
        }

        pub fn downloads(mut self, count: u64) -> Self {
            self.downloads = Some(count);
            self
        }

        pub fn size(mut self, size: &str) -> Self {
            self.size = Some(size.to_string());
            self
        }

        pub fn source(mut self, source: &str) -> Self {
            self.source = Some(source.to_string());
            self
        }

        fn to_html(&self) -> String {
            let mut html = String::from("<li>");
            for icon in &self.icons {
                html.push_str(&format!(r#"<img src="/images/{}.gif"/>"#, icon));
            }
            html.push_str(&format!(r#"<a href="{}">{}</a>"#, self.href, self.text));
            if let Some(downloads) = self.downloads {
                html.push_str(&format!(r#"<div class="shu"><span>{}</span></div>"#, downloads));
            }
            if let Some(size) = &self.size {
                html.push_str(&format!(r#"<div class="size">{}</div>"#, size));
            }
            if let Some(source) = &self.source {
                html.push_str(&format!(r#"<div class="zimuzu"><span>{}</span></div>"#, source));
            }
            html.push_str("</li>");
            html
        }
    }

    /// Build a detail page with a download section holding `rows`.
    pub fn detail_page(rows: &[DetailRow]) -> String {
        let items: String = rows.iter().map(DetailRow::to_html).collect();
        format!(
            r#"<html><head><title>detail</title></head><body>
<div class="nav"><a href="/">home</a></div>
<h2>{}</h2>
<div class="list"><ul>{}</ul></div>
<div class="footer">footer</div>
</body></html>"#,
            DOWNLOAD_SECTION_MARKER, items
        )
    }
}

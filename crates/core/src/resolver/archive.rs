//! Zip archive inspection and subtitle entry selection.

use std::io::{Cursor, Read};

use tracing::debug;
use zip::ZipArchive;

use super::error::ResolveError;
use crate::subtitle::TextFormat;

/// Minimum payload length for the zip signature check.
const MIN_ZIP_LEN: usize = 4;
/// Upper bound on how far one entry is assumed to inflate.
const MAX_EXPANSION: usize = 16;

/// Whether the payload starts with the zip local header magic.
pub fn is_zip(bytes: &[u8]) -> bool {
    bytes.len() >= MIN_ZIP_LEN && bytes.starts_with(b"PK")
}

/// A subtitle file listed inside an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub index: usize,
    pub name: String,
    pub format: TextFormat,
}

/// Subtitle entries chosen from an archive.
#[derive(Debug, Clone)]
pub struct ExtractedEntry {
    pub name: String,
    pub format: TextFormat,
    pub bytes: Vec<u8>,
}

/// Picks the entry to extract: the first of the preferred format,
/// then the first of the other format.
pub fn pick_entry(entries: &[ArchiveEntry], preferred: TextFormat) -> Option<&ArchiveEntry> {
    entries
        .iter()
        .find(|e| e.format == preferred)
        .or_else(|| entries.iter().find(|e| e.format == preferred.other()))
}

/// Lists `.ass`/`.srt` file entries in archive order.
fn list_subtitle_entries<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
) -> Result<Vec<ArchiveEntry>, ResolveError> {
    let mut entries = Vec::new();
    for index in 0..archive.len() {
        let file = archive.by_index(index)?;
        if file.is_dir() {
            continue;
        }
        if let Some(format) = TextFormat::from_file_name(file.name()) {
            entries.push(ArchiveEntry {
                index,
                name: file.name().to_string(),
                format,
            });
        }
    }
    Ok(entries)
}

/// Allocation hint for an entry, bounded by the archive size since the
/// declared size comes from the server.
fn capacity_hint(declared: u64, archive_len: usize) -> usize {
    let bound = archive_len.saturating_mul(MAX_EXPANSION);
    usize::try_from(declared).unwrap_or(usize::MAX).min(bound)
}

/// Extracts the best subtitle entry from a zip payload.
pub fn extract_subtitle(bytes: &[u8], preferred: TextFormat) -> Result<ExtractedEntry, ResolveError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let entries = list_subtitle_entries(&mut archive)?;
    debug!(
        total = archive.len(),
        subtitles = entries.len(),
        "Inspected archive"
    );

    let entry = pick_entry(&entries, preferred).ok_or(ResolveError::ArchiveEmpty)?;

    let mut file = archive.by_index(entry.index)?;
    let mut data = Vec::with_capacity(capacity_hint(file.size(), bytes.len()));
    file.read_to_end(&mut data)
        .map_err(|e| ResolveError::ArchiveUnreadable(e.to_string()))?;

    debug!(entry = %entry.name, format = %entry.format, "Extracted archive entry");
    Ok(ExtractedEntry {
        name: entry.name.clone(),
        format: entry.format,
        bytes: data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::zip_archive;

    fn entry(index: usize, name: &str, format: TextFormat) -> ArchiveEntry {
        ArchiveEntry {
            index,
            name: name.to_string(),
            format,
        }
    }

    #[test]
    fn test_capacity_hint_is_bounded() {
        assert_eq!(capacity_hint(u64::MAX, 100), 100 * MAX_EXPANSION);
        assert_eq!(capacity_hint(0xFFFF_FFF0, 34), 34 * MAX_EXPANSION);
        assert_eq!(capacity_hint(500, 100), 500);
    }

    #[test]
    fn test_is_zip() {
        assert!(is_zip(b"PK\x03\x04rest"));
        assert!(!is_zip(b"PK"));
        assert!(!is_zip(b"1\n00:00"));
    }

    #[test]
    fn test_pick_prefers_format() {
        let entries = vec![
            entry(0, "a.srt", TextFormat::Srt),
            entry(1, "b.ass", TextFormat::Ass),
        ];
        assert_eq!(pick_entry(&entries, TextFormat::Ass).unwrap().name, "b.ass");
        assert_eq!(pick_entry(&entries, TextFormat::Srt).unwrap().name, "a.srt");
    }

    #[test]
    fn test_pick_falls_back_to_other_format() {
        let entries = vec![entry(0, "only.srt", TextFormat::Srt)];
        assert_eq!(
            pick_entry(&entries, TextFormat::Ass).unwrap().name,
            "only.srt"
        );
        assert!(pick_entry(&[], TextFormat::Ass).is_none());
    }

    #[test]
    fn test_extract_preferred_entry() {
        let bytes = zip_archive(&[
            ("a.ass", b"[Script Info]\n".as_slice()),
            ("b.srt", b"1\n00:00:01,000 --> 00:00:02,000\nx\n".as_slice()),
        ]);
        let extracted = extract_subtitle(&bytes, TextFormat::Ass).unwrap();
        assert_eq!(extracted.name, "a.ass");
        assert_eq!(extracted.format, TextFormat::Ass);
        assert_eq!(extracted.bytes, b"[Script Info]\n");
    }

    #[test]
    fn test_extract_skips_non_subtitles() {
        let bytes = zip_archive(&[
            ("readme.txt", b"hello".as_slice()),
            ("sub/Movie.SRT", b"1\n00:00:01,000 --> 00:00:02,000\nx\n".as_slice()),
        ]);
        let extracted = extract_subtitle(&bytes, TextFormat::Ass).unwrap();
        assert_eq!(extracted.name, "sub/Movie.SRT");
        assert_eq!(extracted.format, TextFormat::Srt);
    }

    #[test]
    fn test_extract_without_subtitles() {
        let bytes = zip_archive(&[("readme.txt", b"hello".as_slice())]);
        assert!(matches!(
            extract_subtitle(&bytes, TextFormat::Ass),
            Err(ResolveError::ArchiveEmpty)
        ));
    }

    #[test]
    fn test_corrupt_archive() {
        let err = extract_subtitle(b"PK\x03\x04garbage", TextFormat::Ass).unwrap_err();
        assert_eq!(err.kind(), "archive_unreadable");
    }
}

//! Subtitle file output.

mod error;
mod fs_writer;
mod traits;

pub use error::WriterError;
pub use fs_writer::FsWriter;
pub use traits::SubtitleWriter;

use std::path::{Path, PathBuf};

use crate::subtitle::TextFormat;

/// Subtitle path for a media file: the media path with its extension
/// replaced by the subtitle format's.
pub fn subtitle_path(media: &Path, format: TextFormat) -> PathBuf {
    media.with_extension(format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtitle_path() {
        assert_eq!(
            subtitle_path(Path::new("/m/Heat.1995.1080p.mkv"), TextFormat::Srt),
            PathBuf::from("/m/Heat.1995.1080p.srt")
        );
        assert_eq!(
            subtitle_path(Path::new("show.mp4"), TextFormat::Ass),
            PathBuf::from("show.ass")
        );
    }
}

//! Local media files: discovery, skip rules and filename parsing.

mod discovery;
mod filename_parser;
mod types;

pub use discovery::{find_media_files, skip_reason, SkipReason, VIDEO_EXTENSIONS};
pub use filename_parser::parse_media_filename;
pub use types::MediaDescriptor;

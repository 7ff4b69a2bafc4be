//! Subtitle selection.
//!
//! For each media file: search, rank, then try archive candidates before
//! direct subtitle files, stopping at the first one that resolves and is
//! written.

mod runner;
mod types;

pub use runner::{in_archive_tier, in_direct_tier, tier_candidates, SelectionOrchestrator};
pub use types::*;

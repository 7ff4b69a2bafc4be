//! Subtitle candidate model shared by the extractor, ranker and orchestrator.

mod types;

pub use types::*;

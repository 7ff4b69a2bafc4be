pub mod classifier;
pub mod config;
pub mod markup;
pub mod media;
pub mod orchestrator;
pub mod ranker;
pub mod resolver;
pub mod searcher;
pub mod subtitle;
pub mod testing;
pub mod writer;

pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError, SearchConfig, SelectionConfig, SiteConfig,
};
pub use media::{find_media_files, parse_media_filename, skip_reason, MediaDescriptor, SkipReason};
pub use orchestrator::{
    AttemptError, AttemptRecord, PlannedAttempt, SelectionOrchestrator, SelectionOutcome,
    SelectionReport, SelectionState, Tier,
};
pub use ranker::{choose_best, rank_candidates};
pub use resolver::{resolve_content, ResolveError, ResolvedPayload};
pub use searcher::{
    FetchError, FetchKind, FetchedPage, HttpFetcher, PageFetcher, SearchError, SearchResult,
    SubtitleSearcher,
};
pub use subtitle::{Candidate, Language, LanguageSet, SubtitleFormat, TextFormat};
pub use writer::{subtitle_path, FsWriter, SubtitleWriter, WriterError};

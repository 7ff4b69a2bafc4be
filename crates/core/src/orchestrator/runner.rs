//! Two-tier subtitle selection for one media file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::SelectionConfig;
use crate::media::{parse_media_filename, MediaDescriptor};
use crate::ranker::rank_candidates;
use crate::resolver::{resolve_content, ResolvedPayload};
use crate::searcher::{FetchKind, PageFetcher, SubtitleSearcher};
use crate::subtitle::Candidate;
use crate::writer::{subtitle_path, SubtitleWriter};

use super::types::{
    AttemptError, AttemptRecord, PlannedAttempt, SelectionOutcome, SelectionReport,
    SelectionState, Tier,
};

/// Whether a candidate belongs to the archive tier.
pub fn in_archive_tier(candidate: &Candidate) -> bool {
    candidate.format == crate::subtitle::SubtitleFormat::Archive || candidate.mentions_archive()
}

/// Whether a candidate belongs to the direct tier.
pub fn in_direct_tier(candidate: &Candidate) -> bool {
    candidate.format.as_text_format().is_some() || candidate.mentions_text_subtitle()
}

/// Picks the attempts for `tier` from ranked candidates.
///
/// Candidates whose download URL is in `exclude` are dropped before the
/// `limit` is applied.
pub fn tier_candidates<'a>(
    ranked: &[&'a Candidate],
    tier: Tier,
    limit: usize,
    exclude: &HashSet<String>,
) -> Vec<&'a Candidate> {
    let member: fn(&Candidate) -> bool = match tier {
        Tier::Archive => in_archive_tier,
        Tier::Direct => in_direct_tier,
    };
    ranked
        .iter()
        .copied()
        .filter(|c| member(c) && !exclude.contains(&c.download_url))
        .take(limit)
        .collect()
}

/// Tracks state transitions and failures while processing one media file.
struct Progress {
    media: PathBuf,
    states: Vec<SelectionState>,
    attempts: Vec<AttemptRecord>,
}

impl Progress {
    fn new(media: &Path) -> Self {
        Self {
            media: media.to_path_buf(),
            states: Vec::new(),
            attempts: Vec::new(),
        }
    }

    fn enter(&mut self, state: SelectionState) {
        debug!(media = %self.media.display(), state = ?state, "Selection state");
        self.states.push(state);
    }
}

/// Searches, ranks and downloads the best subtitle for media files.
pub struct SelectionOrchestrator {
    searcher: SubtitleSearcher,
    fetcher: Arc<dyn PageFetcher>,
    writer: Arc<dyn SubtitleWriter>,
    config: SelectionConfig,
    dry_run: bool,
}

impl SelectionOrchestrator {
    pub fn new(
        searcher: SubtitleSearcher,
        fetcher: Arc<dyn PageFetcher>,
        writer: Arc<dyn SubtitleWriter>,
        config: SelectionConfig,
    ) -> Self {
        Self {
            searcher,
            fetcher,
            writer,
            config,
            dry_run: false,
        }
    }

    /// Plan attempts without downloading or writing anything.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Processes one media file, parsing its descriptor from the file name.
    pub async fn process(&self, media_path: &Path) -> SelectionReport {
        let descriptor = parse_media_filename(media_path);
        self.process_descriptor(media_path, descriptor).await
    }

    /// Processes one media file with an explicit descriptor.
    ///
    /// Never fails: every error ends up in the report.
    pub async fn process_descriptor(
        &self,
        media_path: &Path,
        descriptor: MediaDescriptor,
    ) -> SelectionReport {
        let mut progress = Progress::new(media_path);

        progress.enter(SelectionState::Searching);
        let search = match self.searcher.search(&descriptor).await {
            Ok(search) => search,
            Err(e) => {
                warn!(media = %media_path.display(), error = %e, "Search failed");
                progress.enter(SelectionState::Done);
                return report(
                    progress,
                    descriptor,
                    String::new(),
                    0,
                    SelectionOutcome::SearchFailed {
                        reason: e.to_string(),
                    },
                );
            }
        };

        progress.enter(SelectionState::Ranking);
        let preferred = self.config.preferred_format;
        let ranked = rank_candidates(&search.candidates, preferred, &descriptor);

        let outcome = if self.dry_run {
            self.plan(&ranked, &mut progress)
        } else {
            self.attempt_tiers(&ranked, media_path, &mut progress).await
        };
        progress.enter(SelectionState::Done);

        match &outcome {
            SelectionOutcome::Success { path, tier, .. } => {
                info!(media = %media_path.display(), path = %path.display(), tier = %tier, "Subtitle saved")
            }
            SelectionOutcome::Exhausted => info!(
                media = %media_path.display(),
                candidates = search.candidates.len(),
                attempts = progress.attempts.len(),
                "No usable subtitle"
            ),
            _ => {}
        }

        let candidates = search.candidates.len();
        report(progress, descriptor, search.query, candidates, outcome)
    }

    fn plan(&self, ranked: &[&Candidate], progress: &mut Progress) -> SelectionOutcome {
        let mut planned = Vec::new();
        let mut seen = HashSet::new();

        for (tier, limit) in self.tiers() {
            progress.enter(SelectionState::Attempting(tier));
            for candidate in tier_candidates(ranked, tier, limit, &seen) {
                info!(
                    tier = %tier,
                    url = %candidate.download_url,
                    text = %candidate.display_text,
                    format = %candidate.format,
                    "[dry-run] Would download"
                );
                planned.push(PlannedAttempt {
                    tier,
                    download_url: candidate.download_url.clone(),
                    display_text: candidate.display_text.clone(),
                    format: candidate.format,
                    detail_url: candidate.detail_url.clone(),
                });
            }
            seen.extend(planned.iter().map(|p| p.download_url.clone()));
        }

        SelectionOutcome::DryRun { planned }
    }

    async fn attempt_tiers(
        &self,
        ranked: &[&Candidate],
        media_path: &Path,
        progress: &mut Progress,
    ) -> SelectionOutcome {
        let mut attempted = HashSet::new();

        for (tier, limit) in self.tiers() {
            progress.enter(SelectionState::Attempting(tier));
            let batch = tier_candidates(ranked, tier, limit, &attempted);
            debug!(tier = %tier, candidates = batch.len(), "Starting tier");

            for (i, candidate) in batch.iter().enumerate() {
                attempted.insert(candidate.download_url.clone());
                info!(
                    tier = %tier,
                    attempt = i + 1,
                    of = batch.len(),
                    text = %candidate.display_text,
                    "Trying subtitle"
                );

                match self.attempt(candidate, media_path).await {
                    Ok((path, payload)) => {
                        return SelectionOutcome::Success {
                            path,
                            format: payload.format,
                            tier,
                            download_url: candidate.download_url.clone(),
                            archive_entry: payload.entry_name,
                        };
                    }
                    Err(e) => {
                        warn!(
                            tier = %tier,
                            url = %candidate.download_url,
                            kind = e.kind(),
                            error = %e,
                            "Attempt failed"
                        );
                        progress.attempts.push(AttemptRecord::new(tier, candidate, &e));
                    }
                }
            }
        }

        SelectionOutcome::Exhausted
    }

    async fn attempt(
        &self,
        candidate: &Candidate,
        media_path: &Path,
    ) -> Result<(PathBuf, ResolvedPayload), AttemptError> {
        let download = self
            .fetcher
            .fetch(
                &candidate.download_url,
                Some(&candidate.detail_url),
                FetchKind::Download,
            )
            .await?;

        let payload = resolve_content(
            &download.bytes,
            download.filename.as_deref(),
            self.config.preferred_format,
        )?;

        let path = subtitle_path(media_path, payload.format);
        self.writer.write(&path, &payload.bytes).await?;
        Ok((path, payload))
    }

    fn tiers(&self) -> [(Tier, usize); 2] {
        [
            (Tier::Archive, self.config.archive_attempts),
            (Tier::Direct, self.config.direct_attempts),
        ]
    }
}

fn report(
    progress: Progress,
    descriptor: MediaDescriptor,
    query: String,
    candidates: usize,
    outcome: SelectionOutcome,
) -> SelectionReport {
    SelectionReport {
        media: progress.media,
        descriptor,
        query,
        candidates,
        states: progress.states,
        attempts: progress.attempts,
        outcome,
    }
}

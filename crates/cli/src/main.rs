use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zimu_core::{
    find_media_files, load_config_or_default, skip_reason, validate_config, Config, FsWriter,
    HttpFetcher, PageFetcher, SelectionOrchestrator, SelectionOutcome, SelectionReport,
    SkipReason, SubtitleSearcher, TextFormat,
};

/// Find and download subtitles for the media files in a directory.
#[derive(Debug, Parser)]
#[command(name = "zimu", version, about)]
struct Cli {
    /// Directory to scan for media files
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Listing pages to fetch per media file
    #[arg(long)]
    max_pages: Option<u32>,

    /// Preferred subtitle format (ass or srt)
    #[arg(long)]
    prefer_format: Option<TextFormat>,

    /// Minimum seconds between two requests
    #[arg(long)]
    rate_limit: Option<f64>,

    /// Rank candidates and show what would be downloaded, without downloading
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Scan subdirectories too
    #[arg(short, long)]
    recursive: bool,

    /// Configuration file
    #[arg(long, env = "ZIMU_CONFIG")]
    config: Option<PathBuf>,

    /// Print the selection reports as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Applies command line overrides on top of the loaded configuration.
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(max_pages) = cli.max_pages {
        config.search.max_pages = max_pages;
    }
    if let Some(format) = cli.prefer_format {
        config.selection.preferred_format = format;
    }
    if let Some(secs) = cli.rate_limit {
        config.site.min_interval_ms = (secs.max(0.0) * 1000.0).round() as u64;
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = load_config_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;
    apply_overrides(&mut config, &cli);
    validate_config(&config).context("Configuration validation failed")?;

    info!(
        site = %config.site.base_url,
        max_pages = config.search.max_pages,
        prefer = %config.selection.preferred_format,
        interval_ms = config.site.min_interval_ms,
        dry_run = cli.dry_run,
        "Configuration loaded"
    );

    let media_files = find_media_files(&cli.dir, cli.recursive)
        .with_context(|| format!("Failed to scan {}", cli.dir.display()))?;
    if media_files.is_empty() {
        info!(dir = %cli.dir.display(), "No media files found");
        return Ok(());
    }
    info!(count = media_files.len(), "Found media files");

    let fetcher: Arc<dyn PageFetcher> =
        Arc::new(HttpFetcher::new(&config.site).context("Failed to create HTTP client")?);
    let searcher = SubtitleSearcher::from_config(fetcher.clone(), &config)
        .context("Failed to create searcher")?;
    let orchestrator = SelectionOrchestrator::new(
        searcher,
        fetcher,
        Arc::new(FsWriter::new()),
        config.selection.clone(),
    )
    .with_dry_run(cli.dry_run);

    let mut reports = Vec::new();
    let mut skipped = Vec::new();

    for media in &media_files {
        if let Some(reason) = skip_reason(media) {
            info!(media = %media.display(), reason = %reason, "Skipping");
            if !cli.json {
                println!("{}", skip_line(media, &reason));
            }
            skipped.push(serde_json::json!({
                "media": media,
                "reason": reason.to_string(),
            }));
            continue;
        }

        info!(media = %media.display(), "Processing");
        let report = orchestrator.process(media).await;
        if !cli.json {
            for line in summary_lines(&report) {
                println!("{}", line);
            }
        }
        reports.push(report);
    }

    let saved = reports.iter().filter(|r| r.outcome.is_success()).count();
    info!(
        processed = reports.len(),
        saved,
        skipped = skipped.len(),
        "Done"
    );

    if cli.json {
        let output = serde_json::json!({
            "processed": reports,
            "skipped": skipped,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn skip_line(media: &Path, reason: &SkipReason) -> String {
    format!("skipped  {} ({})", file_name(media), reason)
}

/// Human-readable summary of one report.
fn summary_lines(report: &SelectionReport) -> Vec<String> {
    let name = file_name(&report.media);
    match &report.outcome {
        SelectionOutcome::Success {
            path, tier, format, ..
        } => vec![format!(
            "saved    {} -> {} ({} tier, {})",
            name,
            file_name(path),
            tier,
            format
        )],
        SelectionOutcome::Exhausted => vec![format!(
            "failed   {}: no usable subtitle ({} candidates, {} failed attempts)",
            name,
            report.candidates,
            report.attempts.len()
        )],
        SelectionOutcome::SearchFailed { reason } => {
            vec![format!("failed   {}: {}", name, reason)]
        }
        SelectionOutcome::DryRun { planned } => {
            let mut lines = vec![format!(
                "dry-run  {}: {} planned attempts",
                name,
                planned.len()
            )];
            lines.extend(planned.iter().map(|p| {
                format!(
                    "         [{}] {} ({}) from {}",
                    p.tier, p.display_text, p.format, p.detail_url
                )
            }));
            lines
        }
    }
}

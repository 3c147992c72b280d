//! CLI entrypoint for config-council
//!
//! This is the main binary that wires together all layers using
//! dependency injection. The engine only returns data; this file owns
//! everything user-facing, including the process exit code.

use anyhow::{bail, Context, Result};
use clap::Parser;
use council_application::{ArtifactSource, ConsensusEngine, ReviewSession};
use council_domain::{ReviewRequest, Verdict};
use council_infrastructure::{
    build_reviewers, default_config_toml, ApiKeyStore, ConfigLoader, FsArtifactSource,
    JsonlReportLog,
};
use council_presentation::{Cli, ConsoleFormatter, ConsoleProgress, OutputFormat};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }
    if cli.init_config {
        print!("{}", default_config_toml());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("failed to load configuration: {e}"))?
    };
    let params = config.review_params();

    let artifact_root = match cli.artifact {
        Some(path) => path,
        None => bail!("artifact path is required (see --help)"),
    };

    // === Dependency Injection ===
    let keys = ApiKeyStore::from_config_dir();
    let reviewers = build_reviewers(&config, &keys);
    if reviewers.is_empty() {
        bail!(
            "no reviewers available; set OPENAI_API_KEY / GEMINI_API_KEY \
             or configure [[reviewers]] in council.toml"
        );
    }

    let timeout = cli
        .timeout
        .map(Duration::from_secs)
        .unwrap_or(params.timeout);

    let files = FsArtifactSource::new()
        .snapshot(&artifact_root)
        .with_context(|| format!("cannot snapshot artifact at {}", artifact_root.display()))?;

    let correlation_id = format!("review-{}", chrono::Utc::now().format("%Y%m%d%H%M%S%3f"));
    let request = ReviewRequest::new(artifact_root.clone(), files, correlation_id.clone())
        .with_timeout(timeout);

    info!(correlation_id = %correlation_id, "starting review cycle");

    // Print header
    if !cli.quiet {
        println!();
        println!("+============================================================+");
        println!("|          config-council - Configuration Review             |");
        println!("+============================================================+");
        println!();
        println!("Artifact: {}", artifact_root.display());
    }

    let dedup = params
        .deduplicator()
        .context("invalid dedup thresholds in configuration")?;
    let engine = ConsensusEngine::new(dedup);
    let mut session =
        ReviewSession::new(engine, reviewers).with_history_limit(params.history_limit);

    if !cli.quiet {
        println!("Council:  {}", session.reviewer_ids().join(", "));
        println!();
    }

    // Execute with or without progress reporting
    let report = if cli.quiet {
        session.run_cycle(request).await?
    } else {
        let progress = ConsoleProgress::new();
        session.run_cycle_with_progress(request, &progress).await?
    };

    // Audit trail is best-effort: a failed log never fails the review.
    if let Some(log) = JsonlReportLog::default_path().and_then(JsonlReportLog::new) {
        log.append(&report);
    }

    // Output results
    let output = match cli.output {
        OutputFormat::Full => ConsoleFormatter::format(&report),
        OutputFormat::Summary => ConsoleFormatter::format_summary(&report),
        OutputFormat::Json => ConsoleFormatter::format_json(&report),
    };
    println!("{}", output);

    if !cli.quiet && ReviewSession::should_retry(&report) {
        println!("Apply the suggested fixes and re-run the review.");
    }

    std::process::exit(match report.verdict {
        Verdict::Pass => 0,
        Verdict::Fail => 1,
        Verdict::Indeterminate => 2,
    });
}

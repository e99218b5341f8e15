//! ArchiveLinks main entry point
//!
//! This is the command-line interface for the ArchiveLinks preservation tool.

use anyhow::Context;
use archivelinks::archive::{archive_links, build_scheduler, RunReport, TracingProgressSink};
use archivelinks::config::{load_config_with_hash, validate, Config};
use archivelinks::input::read_links_file;
use archivelinks::output::{print_summary, write_csv, RunSummary};
use archivelinks::{LinkSet, RunKind};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// ArchiveLinks: preserve the links of a manuscript in a public web archive
///
/// ArchiveLinks submits every link to the archive's capture service, polls
/// until a snapshot is available, and writes a per-link results table.
/// DOI links are skipped, since they are persistent already.
#[derive(Parser, Debug)]
#[command(name = "archivelinks")]
#[command(version)]
#[command(about = "Preserve manuscript links in a public web archive", long_about = None)]
struct Cli {
    /// Text file with one raw link per line
    #[arg(value_name = "LINKS")]
    links: PathBuf,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of links archived at the same time
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Where to write the CSV results
    #[arg(short, long, value_name = "CSV")]
    output: Option<PathBuf>,

    /// Automatic retry runs over unresolved links
    #[arg(long, value_name = "N", default_value_t = 0)]
    retry_rounds: u32,

    /// Show which links would be archived without contacting the archive
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_effective_config(&cli)?;

    let raw_links = read_links_file(&cli.links)
        .with_context(|| format!("Failed to read links from {}", cli.links.display()))?;
    let mut links = LinkSet::from_extracted(raw_links.iter().map(String::as_str));
    tracing::info!(
        "Loaded {} link(s) from {} line(s), {} included",
        links.len(),
        raw_links.len(),
        links.included().count()
    );

    if cli.dry_run {
        handle_dry_run(&config, &links);
        return Ok(());
    }

    let summary = handle_archive(&config, &mut links, cli.retry_rounds).await?;
    print_summary(&summary, &links);

    let csv_path = Path::new(&config.output.csv_path);
    write_csv(&links, csv_path)
        .with_context(|| format!("Failed to write results to {}", csv_path.display()))?;
    println!("\nResults written to: {}", csv_path.display());

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("archivelinks=info,warn"),
            1 => EnvFilter::new("archivelinks=debug,info"),
            2 => EnvFilter::new("archivelinks=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file if one was given, then applies CLI overrides
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(concurrency) = cli.concurrency {
        config.scheduler.max_concurrent_saves = concurrency;
    }
    if let Some(output) = &cli.output {
        config.output.csv_path = output.display().to_string();
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: lists what a full run would archive
fn handle_dry_run(config: &Config, links: &LinkSet) {
    println!("=== ArchiveLinks Dry Run ===\n");

    println!("Archive:");
    println!("  Save endpoint: {}", config.archive.save_endpoint);
    println!(
        "  Availability endpoint: {}",
        config.archive.availability_endpoint
    );
    println!(
        "  Polling: {} attempt(s), {}ms apart, {}ms deadline",
        config.archive.poll_attempts, config.archive.poll_delay_ms, config.archive.preserve_deadline_ms
    );
    println!(
        "  Workers: {} (started {}ms apart)",
        config.scheduler.max_concurrent_saves, config.scheduler.worker_stagger_ms
    );
    println!("  User agent: {}", config.user_agent.header_value());

    println!("\nLinks ({}):", links.len());
    for item in links.items() {
        match item.skip_reason() {
            Some(reason) => println!("  - {} (skipped: {})", item.original_url(), reason),
            None => println!("  - {}", item.original_url()),
        }
    }

    println!(
        "\n✓ Would archive {} of {} link(s)",
        links.included().count(),
        links.len()
    );
    println!("✓ Results would be written to: {}", config.output.csv_path);
}

/// Handles the archive operation: one full run, then the retry rounds
async fn handle_archive(
    config: &Config,
    links: &mut LinkSet,
    retry_rounds: u32,
) -> anyhow::Result<RunSummary> {
    let scheduler = build_scheduler(config).context("Failed to set up the archive pipeline")?;
    let progress = TracingProgressSink;

    let (report, mut summary) = archive_links(links, RunKind::Full, &scheduler, &progress).await?;
    log_run_report("Full run", &report);

    for round in 1..=retry_rounds {
        if summary.all_saved() {
            break;
        }

        tracing::info!("Retry round {}/{}", round, retry_rounds);
        let (report, retried) =
            archive_links(links, RunKind::RetryUnresolved, &scheduler, &progress).await?;
        log_run_report(&format!("Retry round {}", round), &report);
        summary = retried;
    }

    if !summary.all_saved() {
        tracing::warn!(
            "{} link(s) unresolved; run again or pass --retry-rounds to retry them",
            summary.unresolved()
        );
    }

    Ok(summary)
}

fn log_run_report(name: &str, report: &RunReport) {
    tracing::info!(
        "{} processed {} link(s) with {} worker(s) in {:.1?} ({} to {})",
        name,
        report.processed,
        report.workers,
        report.elapsed,
        report.started_at.to_rfc3339(),
        report.finished_at.to_rfc3339()
    );
}

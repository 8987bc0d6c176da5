//! Frontier Warden main entry point
//!
//! This is the command-line interface for the Frontier Warden crawler.

use anyhow::{Context, Result};
use clap::Parser;
use frontier_warden::config::{load_config_with_hash, Config};
use frontier_warden::crawler::run_crawl;
use frontier_warden::output::{load_statistics, print_statistics};
use frontier_warden::storage::{JsonFileStore, SnapshotStore};
use frontier_warden::url::{normalize_url, UrlCanonicalizer};
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Frontier Warden: a polite single-site crawler
///
/// Crawls one site while respecting robots.txt, seeding from sitemaps,
/// and snapshotting its frontier so interrupted crawls can resume.
#[derive(Parser, Debug)]
#[command(name = "frontier-warden")]
#[command(version)]
#[command(about = "A polite single-site crawler with resumable frontier", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Start a fresh crawl, ignoring any snapshot (the default resumes)
    #[arg(long)]
    fresh: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the snapshot file and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config, &config_hash)
    } else if cli.stats {
        handle_stats(&config)
    } else {
        handle_crawl(&config, cli.fresh).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// `RUST_LOG` takes precedence when set.
fn setup_logging(verbose: u8, quiet: bool) {
    let default_filter = if quiet {
        "error"
    } else {
        match verbose {
            0 => "frontier_warden=info,warn",
            1 => "frontier_warden=debug,info",
            2 => "frontier_warden=trace,debug",
            _ => "trace",
        }
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, config_hash: &str) -> Result<()> {
    print!("{}", dry_run_report(config, config_hash)?);
    Ok(())
}

fn dry_run_report(config: &Config, config_hash: &str) -> Result<String> {
    let base = normalize_url(&config.crawler.base_url)
        .with_context(|| format!("Cannot canonicalize base-url {}", config.crawler.base_url))?;
    let filters = config.url_filters();
    let max_pages = match config.crawler.max_pages {
        0 => "unlimited".to_string(),
        n => n.to_string(),
    };

    let mut out = String::new();
    writeln!(out, "=== Frontier Warden Dry Run ===\n")?;

    writeln!(out, "Crawler Configuration:")?;
    writeln!(out, "  Base URL: {}", base)?;
    writeln!(out, "  Respect robots.txt: {}", config.crawler.respect_robots_txt)?;
    writeln!(out, "  Workers: {}", config.crawler.workers)?;
    writeln!(out, "  Save every: {} pages", config.crawler.save_every)?;
    writeln!(out, "  Max pages: {}", max_pages)?;

    writeln!(out, "\nUser Agent:")?;
    writeln!(out, "  {}", config.user_agent_string())?;

    writeln!(out, "\nPoliteness:")?;
    writeln!(out, "  robots.txt timeout: {}ms", config.politeness.robots_timeout_ms)?;
    writeln!(out, "  Sitemap timeout: {}ms", config.politeness.sitemap_timeout_ms)?;
    writeln!(out, "  Max sitemap depth: {}", config.politeness.max_sitemap_depth)?;

    writeln!(out, "\nFilters:")?;
    writeln!(out, "  Tracking params: {}", filters.tracking_params().join(", "))?;
    writeln!(out, "  Skip extensions: {}", filters.skip_extensions().join(", "))?;
    writeln!(out, "  Skip patterns: {}", filters.skip_patterns().join(", "))?;

    writeln!(out, "\nOutput:")?;
    writeln!(out, "  Snapshot: {}", config.output.snapshot_path)?;

    writeln!(out, "\nConfiguration hash: {}", config_hash)?;
    writeln!(out, "✓ Configuration is valid")?;
    Ok(out)
}

/// Handles the --stats mode: shows statistics from the snapshot file
fn handle_stats(config: &Config) -> Result<()> {
    let store = JsonFileStore::new(&config.output.snapshot_path);
    println!("Snapshot: {}\n", store.path().display());

    match store.load().context("Failed to read snapshot")? {
        Some(snapshot) => {
            let canonicalizer = UrlCanonicalizer::new(config.url_filters());
            let stats = load_statistics(&snapshot, &canonicalizer)
                .context("Snapshot has an unusable base URL")?;
            print_statistics(&stats);
        }
        None => println!("No snapshot found; nothing has been crawled yet"),
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, fresh: bool) -> Result<()> {
    if fresh {
        tracing::info!("Starting fresh crawl (ignoring previous state)");
    } else {
        tracing::info!("Starting crawl (will resume if a snapshot exists)");
    }

    let report = run_crawl(config, fresh).await.context("Crawl failed")?;

    if report.interrupted {
        tracing::info!(
            "Snapshot saved to {}; run again to resume",
            config.output.snapshot_path
        );
    } else {
        tracing::info!("Crawl completed successfully");
    }

    Ok(())
}

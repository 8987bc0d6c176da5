//! Statistics reporting for crawl snapshots
//!
//! This module provides functionality for summarizing a frontier and
//! displaying it, either from a live crawl or from a saved snapshot.

use crate::state::{FrontierStats, UrlState};
use crate::storage::Snapshot;
use crate::url::UrlCanonicalizer;
use crate::UrlResult;
use chrono::{DateTime, Utc};

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    pub base_url: String,
    pub started_at: DateTime<Utc>,
    pub last_saved_at: DateTime<Utc>,

    /// Frontier counts as they would be after a resume
    pub frontier: FrontierStats,

    /// URLs that were in flight when the snapshot was written
    pub interrupted: usize,
}

/// Builds statistics from a saved snapshot, counted the way a resume would
pub fn load_statistics(
    snapshot: &Snapshot,
    canonicalizer: &UrlCanonicalizer,
) -> UrlResult<CrawlStatistics> {
    let (base_url, frontier) = snapshot.restore(canonicalizer)?;

    Ok(CrawlStatistics {
        base_url: base_url.into_string(),
        started_at: snapshot.started_at,
        last_saved_at: snapshot.last_saved_at,
        frontier: frontier.stats(),
        interrupted: snapshot.queue.processing.len(),
    })
}

/// Share of `count` in `total`, as a percentage
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (count as f64 / total as f64) * 100.0
    }
}

/// One-line progress summary used in crawl logs
pub fn format_progress(stats: &FrontierStats) -> String {
    let done = stats.completed + stats.failed;
    format!(
        "{}/{} done ({:.1}%), {} pending, {} in flight, {} failed",
        done,
        stats.total,
        percentage(done, stats.total),
        stats.pending,
        stats.in_flight,
        stats.failed
    )
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Base URL: {}", stats.base_url);
    println!("  Started: {}", stats.started_at.to_rfc3339());
    println!("  Last saved: {}", stats.last_saved_at.to_rfc3339());
    let elapsed = stats.last_saved_at - stats.started_at;
    println!("  Elapsed at save: {}s", elapsed.num_seconds().max(0));
    println!("  Total URLs observed: {}", stats.frontier.total);
    println!();

    println!("URLs by State:");
    for state in UrlState::all_states() {
        let count = stats.frontier.count(state);
        println!(
            "  {}: {} ({:.1}%)",
            state,
            count,
            percentage(count, stats.frontier.total)
        );
    }
    println!();

    if stats.interrupted > 0 {
        println!(
            "{} URLs were in flight at save time and will be requeued on resume",
            stats.interrupted
        );
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} finished URLs completed)",
        percentage(
            stats.frontier.completed,
            stats.frontier.completed + stats.frontier.failed
        ),
        stats.frontier.completed,
        stats.frontier.completed + stats.frontier.failed
    );
}

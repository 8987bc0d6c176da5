//! Output module for crawl reporting
//!
//! This module handles:
//! - Summarizing saved snapshots for `--stats`
//! - Formatting progress lines for the crawl log

pub mod stats;

pub use stats::{format_progress, load_statistics, percentage, print_statistics, CrawlStatistics};

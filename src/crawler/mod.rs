//! Crawler module for frontier orchestration and page fetching
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and the `HttpSource` seam
//! - HTML link extraction
//! - The `Coordinator` that sequences seeding, discovery, and snapshots
//! - The worker-pool driver used by the binary

mod coordinator;
mod driver;
mod fetcher;
mod parser;

pub use coordinator::{
    Coordinator, CrawlOptions, CrawlPhase, ProgressCallback, DEFAULT_USER_AGENT,
};
pub use driver::{run_crawl, CrawlReport};
pub use fetcher::{build_http_client, fetch_page, FetchError, HttpSource};
pub use parser::extract_links;

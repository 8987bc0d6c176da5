//! Frontier Warden: a crawl frontier and politeness engine
//!
//! This crate discovers, deduplicates and re-offers URLs to an external page
//! fetcher while respecting robots.txt rules, expanding sitemaps, and
//! surviving interruption through JSON snapshots.

pub mod config;
pub mod crawler;
pub mod output;
pub mod robots;
pub mod sitemap;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Invalid frontier transition for {url}: {from:?} -> {to:?}")]
    InvalidTransition {
        url: String,
        from: Option<state::UrlState>,
        to: state::UrlState,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlOptions, CrawlPhase, Coordinator};
pub use robots::{PolitenessOracle, RobotsVerdict};
pub use sitemap::SitemapResolver;
pub use state::{Frontier, FrontierStats, UrlState};
pub use storage::{JsonFileStore, MemoryStore, Snapshot, SnapshotStore};
pub use crate::url::{is_same_domain, normalize_url, CanonicalUrl, UrlCanonicalizer, UrlFilters};

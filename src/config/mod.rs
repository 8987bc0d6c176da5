//! Configuration module for Frontier Warden
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use frontier_warden::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("warden.toml")).unwrap();
//! println!("Crawling {} with {} workers", config.crawler.base_url, config.crawler.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, FiltersConfig, OutputConfig, PolitenessConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};

use crate::crawler::CrawlOptions;
use crate::url::UrlFilters;
use std::time::Duration;

impl Config {
    /// The User-Agent string sent with every request and matched against robots.txt groups
    pub fn user_agent_string(&self) -> String {
        self.user_agent.user_agent_string()
    }

    /// Canonicalizer filter lists with configured overrides applied
    pub fn url_filters(&self) -> UrlFilters {
        self.filters.to_filters()
    }

    pub fn robots_timeout(&self) -> Duration {
        Duration::from_millis(self.politeness.robots_timeout_ms)
    }

    pub fn sitemap_timeout(&self) -> Duration {
        Duration::from_millis(self.politeness.sitemap_timeout_ms)
    }

    /// Builds the orchestrator options; the progress callback is left as a no-op
    pub fn crawl_options(&self) -> CrawlOptions {
        CrawlOptions {
            respect_robots_txt: self.crawler.respect_robots_txt,
            user_agent: self.user_agent_string(),
            ..CrawlOptions::default()
        }
    }
}

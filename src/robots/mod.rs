//! Robots.txt handling module
//!
//! This module provides functionality for fetching, parsing, and caching robots.txt files.
//! The `PolitenessOracle` is fail-open: an unreachable or broken robots.txt allows
//! everything and lists no sitemaps.

mod cache;
mod matcher;
mod parser;

pub use cache::RuleCache;
pub use matcher::matches_pattern;
pub use parser::{DomainRules, RobotsFile};

use crate::crawler::{FetchError, HttpSource};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

/// Default bound on a robots.txt fetch
pub const DEFAULT_ROBOTS_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of a politeness check for one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RobotsVerdict {
    pub allowed: bool,

    /// Set when `allowed` is false
    pub reason: Option<String>,

    /// `Sitemap:` URLs published by the URL's origin
    pub sitemap_urls: Vec<String>,
}

impl RobotsVerdict {
    /// The fail-open verdict: allowed, no sitemaps
    pub fn allow_all() -> Self {
        Self {
            allowed: true,
            reason: None,
            sitemap_urls: Vec::new(),
        }
    }
}

/// Fetches and caches robots.txt rules per origin and answers URL checks
pub struct PolitenessOracle {
    source: Arc<dyn HttpSource>,
    cache: RuleCache,
    timeout: Duration,
}

impl PolitenessOracle {
    pub fn new(source: Arc<dyn HttpSource>) -> Self {
        Self::with_timeout(source, DEFAULT_ROBOTS_TIMEOUT)
    }

    pub fn with_timeout(source: Arc<dyn HttpSource>, timeout: Duration) -> Self {
        Self {
            source,
            cache: RuleCache::new(),
            timeout,
        }
    }

    /// Checks whether `url` may be crawled by `user_agent`
    ///
    /// Never fails: an unparsable URL or a robots.txt that cannot be fetched
    /// yields `RobotsVerdict::allow_all()`.
    pub async fn check_url(&self, url: &str, user_agent: &str) -> RobotsVerdict {
        let parsed = match Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => {
                parsed
            }
            _ => {
                trace!("Not checking robots.txt for {}", url);
                return RobotsVerdict::allow_all();
            }
        };

        let rules = self.rules_for(&parsed, user_agent).await;

        let mut target = parsed.path().to_string();
        if let Some(query) = parsed.query() {
            target.push('?');
            target.push_str(query);
        }

        match rules.blocking_pattern(&target) {
            Some(pattern) => {
                debug!("{} blocked by robots.txt pattern {}", url, pattern);
                RobotsVerdict {
                    allowed: false,
                    reason: Some(format!("Disallowed by robots.txt: {}", pattern)),
                    sitemap_urls: rules.sitemap_urls,
                }
            }
            None => RobotsVerdict {
                allowed: true,
                reason: None,
                sitemap_urls: rules.sitemap_urls,
            },
        }
    }

    /// Number of origins whose robots.txt has been resolved
    pub fn cached_origins(&self) -> usize {
        self.cache.len()
    }

    async fn rules_for(&self, url: &Url, user_agent: &str) -> DomainRules {
        let origin = url.origin().ascii_serialization();
        let file = self
            .cache
            .get_or_fetch(&origin, || self.fetch_robots(&origin, user_agent))
            .await;
        file.rules_for(user_agent)
    }

    async fn fetch_robots(&self, origin: &str, user_agent: &str) -> RobotsFile {
        let robots_url = format!("{}/robots.txt", origin);
        debug!("Fetching {}", robots_url);

        let result = match tokio::time::timeout(
            self.timeout,
            self.source.get_text(&robots_url, user_agent),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.timeout)),
        };

        match result {
            Ok(body) => RobotsFile::parse(&body),
            Err(e) => {
                debug!("robots.txt unavailable for {} ({}), allowing all", origin, e);
                RobotsFile::default()
            }
        }
    }
}

impl std::fmt::Debug for PolitenessOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolitenessOracle")
            .field("cache", &self.cache)
            .field("timeout", &self.timeout)
            .finish()
    }
}

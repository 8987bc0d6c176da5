//! Sitemap resolution
//!
//! Expands sitemaps and sitemap indexes into a flat list of page URLs. Every
//! failure is soft: a document that cannot be fetched or parsed contributes
//! no URLs and never aborts its siblings.

mod parser;

pub use parser::{parse_sitemap, SitemapDocument};

use crate::crawler::{FetchError, HttpSource};
use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, warn};

/// Default bound on a single sitemap fetch
pub const DEFAULT_SITEMAP_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of index levels followed below the first document
pub const DEFAULT_MAX_SITEMAP_DEPTH: u32 = 4;

/// Fetches sitemap documents and flattens sitemap indexes
pub struct SitemapResolver {
    source: Arc<dyn HttpSource>,
    user_agent: String,
    timeout: Duration,
    max_depth: u32,
}

impl SitemapResolver {
    pub fn new(source: Arc<dyn HttpSource>, user_agent: impl Into<String>) -> Self {
        Self {
            source,
            user_agent: user_agent.into(),
            timeout: DEFAULT_SITEMAP_TIMEOUT,
            max_depth: DEFAULT_MAX_SITEMAP_DEPTH,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Resolves `sitemap_url` into raw (not normalized) page URLs
    ///
    /// Child sitemaps of an index are fetched concurrently. A sitemap URL is
    /// fetched at most once per call, so self-referencing indexes terminate.
    pub async fn resolve(&self, sitemap_url: &str) -> Vec<String> {
        let visited = Mutex::new(HashSet::new());
        let urls = self
            .resolve_inner(sitemap_url.to_string(), 0, &visited)
            .await;
        debug!("Sitemap {} yielded {} URLs", sitemap_url, urls.len());
        urls
    }

    fn resolve_inner<'a>(
        &'a self,
        url: String,
        depth: u32,
        visited: &'a Mutex<HashSet<String>>,
    ) -> BoxFuture<'a, Vec<String>> {
        async move {
            let first_visit = visited
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(url.clone());
            if !first_visit {
                debug!("Skipping already visited sitemap {}", url);
                return Vec::new();
            }

            let body = match self.fetch(&url).await {
                Ok(body) => body,
                Err(e) => {
                    debug!("Sitemap {} unavailable: {}", url, e);
                    return Vec::new();
                }
            };

            match parse_sitemap(&body) {
                SitemapDocument::UrlSet(urls) => urls,
                SitemapDocument::Index(children) => {
                    if depth >= self.max_depth {
                        warn!(
                            "Sitemap index {} exceeds depth {}, not expanding {} children",
                            url,
                            self.max_depth,
                            children.len()
                        );
                        return Vec::new();
                    }

                    let nested = join_all(
                        children
                            .into_iter()
                            .map(|child| self.resolve_inner(child, depth + 1, visited)),
                    )
                    .await;
                    nested.into_iter().flatten().collect()
                }
                SitemapDocument::Unknown => {
                    debug!("{} is not a sitemap document", url);
                    Vec::new()
                }
            }
        }
        .boxed()
    }

    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        match tokio::time::timeout(self.timeout, self.source.get_text(url, &self.user_agent)).await
        {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.timeout)),
        }
    }
}

impl std::fmt::Debug for SitemapResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SitemapResolver")
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

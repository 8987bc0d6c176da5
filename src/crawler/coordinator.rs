//! Crawl coordinator - seeding, discovery, and frontier lifecycle
//!
//! The coordinator owns the frontier behind a single lock and sequences the
//! other components:
//! - Seeding from the base URL, robots.txt sitemaps, and `/sitemap.xml`
//! - Filtering and politeness-checking discovered links
//! - Delegating frontier transitions and reporting progress
//! - Saving and restoring snapshots
//!
//! It never fetches pages itself; callers pull URLs with `next_url`, fetch
//! them, and report back.

use crate::crawler::parser::extract_links;
use crate::robots::PolitenessOracle;
use crate::sitemap::SitemapResolver;
use crate::state::{Frontier, FrontierStats};
use crate::storage::{Snapshot, SnapshotStore};
use crate::url::{CanonicalUrl, UrlCanonicalizer};
use crate::Result;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;
use tracing::{debug, info};
use url::Url;

/// User agent used when none is configured
pub const DEFAULT_USER_AGENT: &str = concat!("FrontierWarden/", env!("CARGO_PKG_VERSION"));

/// Callback invoked with fresh stats after every completed or failed URL
pub type ProgressCallback = Arc<dyn Fn(FrontierStats) + Send + Sync>;

/// Options recognized when seeding a crawl
#[derive(Clone)]
pub struct CrawlOptions {
    /// Consult robots.txt for discovered links and seed from its sitemaps
    pub respect_robots_txt: bool,

    /// Sent with robots.txt and sitemap requests and matched against robots groups
    pub user_agent: String,

    pub on_progress: ProgressCallback,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            respect_robots_txt: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            on_progress: Arc::new(|_| {}),
        }
    }
}

impl fmt::Debug for CrawlOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrawlOptions")
            .field("respect_robots_txt", &self.respect_robots_txt)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

/// Lifecycle of a single crawl
///
/// `Uninitialized -> Seeded -> Running -> Drained`. A crawl restored from a
/// snapshot starts at `Seeded`. Saving does not change the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    Uninitialized,
    Seeded,
    Running,
    Drained,
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Uninitialized => "uninitialized",
            Self::Seeded => "seeded",
            Self::Running => "running",
            Self::Drained => "drained",
        };
        f.write_str(label)
    }
}

struct CrawlState {
    base_url: CanonicalUrl,
    started_at: DateTime<Utc>,
    phase: CrawlPhase,
    frontier: Frontier,
}

/// Main crawl orchestrator
///
/// All methods take `&self`; share one coordinator between workers with an
/// `Arc`. The frontier lock is never held across an await.
pub struct Coordinator {
    canonicalizer: Arc<UrlCanonicalizer>,
    oracle: Arc<PolitenessOracle>,
    sitemaps: SitemapResolver,
    options: CrawlOptions,
    state: Mutex<CrawlState>,
    changed: Notify,
}

impl Coordinator {
    /// Creates a coordinator for `base_url` with an empty frontier
    ///
    /// # Errors
    ///
    /// Returns `CrawlError::Url` if the base URL cannot be canonicalized.
    pub fn new(
        base_url: &str,
        options: CrawlOptions,
        canonicalizer: Arc<UrlCanonicalizer>,
        oracle: Arc<PolitenessOracle>,
        sitemaps: SitemapResolver,
    ) -> Result<Self> {
        let base_url = canonicalizer.try_normalize(base_url)?;

        Ok(Self {
            canonicalizer,
            oracle,
            sitemaps,
            options,
            state: Mutex::new(CrawlState {
                base_url,
                started_at: Utc::now(),
                phase: CrawlPhase::Uninitialized,
                frontier: Frontier::new(),
            }),
            changed: Notify::new(),
        })
    }

    /// Seeds the frontier
    ///
    /// Enqueues the base URL, then (with politeness enabled) every URL from
    /// the sitemaps its robots.txt lists, then the conventional `/sitemap.xml`.
    /// Sitemap URLs are kept only if same-domain and not skipped. Every
    /// network failure here is silent. Returns the number of URLs enqueued.
    pub async fn initialize(&self) -> Result<usize> {
        let base_url = self.base_url();
        let base = base_url.to_url()?;

        let mut added = usize::from(self.lock().frontier.add(base_url.clone()));

        let mut sitemap_urls: Vec<String> = Vec::new();
        if self.options.respect_robots_txt {
            let verdict = self
                .oracle
                .check_url(base_url.as_str(), &self.options.user_agent)
                .await;
            sitemap_urls.extend(verdict.sitemap_urls);
        }

        let conventional = base.join("/sitemap.xml")?.to_string();
        if !sitemap_urls.contains(&conventional) {
            sitemap_urls.push(conventional);
        }

        debug!("Resolving {} sitemaps for {}", sitemap_urls.len(), base_url);
        let resolved = join_all(sitemap_urls.iter().map(|url| self.sitemaps.resolve(url))).await;

        let seeds: Vec<CanonicalUrl> = resolved
            .into_iter()
            .flatten()
            .filter_map(|raw| Url::parse(&raw).ok())
            .filter(|url| self.is_crawl_candidate(url, &base))
            .filter_map(|url| self.canonicalizer.normalize(url.as_str()))
            .collect();

        let mut state = self.lock();
        added += state.frontier.add_batch(seeds);
        state.phase = CrawlPhase::Seeded;
        info!("Seeded {} URLs for {}", added, state.base_url);
        Ok(added)
    }

    /// Extracts, filters and enqueues the links of a fetched page
    ///
    /// Links go through the same-domain filter, the skip filter, and (with
    /// politeness enabled) concurrent robots.txt checks. Survivors are
    /// canonicalized and added as one batch. Returns the URLs that were
    /// actually new.
    pub async fn discover(&self, html: &str, page_url: &str) -> Result<Vec<CanonicalUrl>> {
        let page = Url::parse(page_url)?;
        let base = self.base_url().to_url()?;

        let candidates: Vec<Url> = extract_links(html, &page)
            .into_iter()
            .filter_map(|raw| Url::parse(&raw).ok())
            .filter(|url| self.is_crawl_candidate(url, &base))
            .collect();

        let allowed: Vec<Url> = if self.options.respect_robots_txt {
            let verdicts = join_all(
                candidates
                    .iter()
                    .map(|url| self.oracle.check_url(url.as_str(), &self.options.user_agent)),
            )
            .await;

            candidates
                .into_iter()
                .zip(verdicts)
                .filter_map(|(url, verdict)| {
                    if verdict.allowed {
                        Some(url)
                    } else {
                        debug!("Not enqueueing {}: {}", url, verdict.reason.unwrap_or_default());
                        None
                    }
                })
                .collect()
        } else {
            candidates
        };

        let mut seen = HashSet::new();
        let canonical: Vec<CanonicalUrl> = allowed
            .iter()
            .filter_map(|url| self.canonicalizer.normalize(url.as_str()))
            .filter(|url| seen.insert(url.clone()))
            .collect();

        let newly_added: Vec<CanonicalUrl> = {
            let mut state = self.lock();
            canonical
                .into_iter()
                .filter(|url| state.frontier.add(url.clone()))
                .collect()
        };
        if !newly_added.is_empty() {
            self.changed.notify_waiters();
        }

        debug!("Discovered {} new URLs on {}", newly_added.len(), page_url);
        Ok(newly_added)
    }

    /// Hands out the next pending URL, moving it to in-flight
    pub fn next_url(&self) -> Option<CanonicalUrl> {
        let mut state = self.lock();
        let next = state.frontier.next_url();
        if next.is_some() && state.phase == CrawlPhase::Seeded {
            state.phase = CrawlPhase::Running;
        }
        next
    }

    /// Hands out the next pending URL, waiting while only in-flight work remains
    ///
    /// Wakes when `discover` adds URLs or a URL is marked. Returns `None`
    /// once the frontier is empty.
    pub async fn wait_for_url(&self) -> Option<CanonicalUrl> {
        loop {
            let changed = self.changed.notified();
            tokio::pin!(changed);
            // Registered before checking, so a wakeup between the check and the await is kept
            changed.as_mut().enable();

            if let Some(url) = self.next_url() {
                return Some(url);
            }
            if self.is_empty() {
                return None;
            }
            changed.await;
        }
    }

    /// Records a successful fetch and reports progress
    pub fn mark_completed(&self, url: &CanonicalUrl) -> Result<()> {
        let stats = {
            let mut state = self.lock();
            state.frontier.mark_completed(url)?;
            state.settle()
        };
        self.changed.notify_waiters();
        (self.options.on_progress)(stats);
        Ok(())
    }

    /// Records a failed fetch and reports progress; failed URLs are never retried
    pub fn mark_failed(&self, url: &CanonicalUrl) -> Result<()> {
        let stats = {
            let mut state = self.lock();
            state.frontier.mark_failed(url)?;
            state.settle()
        };
        self.changed.notify_waiters();
        (self.options.on_progress)(stats);
        Ok(())
    }

    /// True when nothing is pending or in flight
    pub fn is_empty(&self) -> bool {
        self.lock().frontier.is_empty()
    }

    pub fn stats(&self) -> FrontierStats {
        self.lock().frontier.stats()
    }

    pub fn phase(&self) -> CrawlPhase {
        self.lock().phase
    }

    pub fn base_url(&self) -> CanonicalUrl {
        self.lock().base_url.clone()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.lock().started_at
    }

    /// Captures the current state without storing it
    pub fn snapshot(&self) -> Snapshot {
        let state = self.lock();
        Snapshot::capture(&state.base_url, state.started_at, &state.frontier)
    }

    /// Writes a snapshot of the current state to `store`
    pub fn save_state(&self, store: &dyn SnapshotStore) -> Result<()> {
        let snapshot = self.snapshot();
        store.save(&snapshot)?;
        debug!(
            "Saved snapshot at {} ({} URLs)",
            snapshot.last_saved_at,
            snapshot.queue.len()
        );
        Ok(())
    }

    /// Replaces the base URL and frontier with the snapshot in `store`
    ///
    /// Returns false, leaving the coordinator untouched, if the store is empty.
    pub fn load_state(&self, store: &dyn SnapshotStore) -> Result<bool> {
        let Some(snapshot) = store.load()? else {
            return Ok(false);
        };

        let (base_url, frontier) = snapshot.restore(&self.canonicalizer)?;
        let stats = frontier.stats();

        let mut state = self.lock();
        state.base_url = base_url;
        state.started_at = snapshot.started_at;
        state.frontier = frontier;
        state.phase = CrawlPhase::Seeded;
        state.settle();

        info!(
            "Restored crawl of {} started {} ({} pending, {} completed, {} failed)",
            state.base_url, snapshot.started_at, stats.pending, stats.completed, stats.failed
        );
        Ok(true)
    }

    fn is_crawl_candidate(&self, url: &Url, base: &Url) -> bool {
        self.canonicalizer.is_same_domain(url, base) && !self.canonicalizer.should_skip(url)
    }

    fn lock(&self) -> MutexGuard<'_, CrawlState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CrawlState {
    /// Moves to `Drained` once the frontier empties and returns the stats
    fn settle(&mut self) -> FrontierStats {
        if self.phase != CrawlPhase::Uninitialized && self.frontier.is_empty() {
            self.phase = CrawlPhase::Drained;
        } else if self.phase == CrawlPhase::Drained && !self.frontier.is_empty() {
            self.phase = CrawlPhase::Running;
        }
        self.frontier.stats()
    }
}

impl fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("Coordinator")
            .field("base_url", &state.base_url)
            .field("phase", &state.phase)
            .field("stats", &state.frontier.stats())
            .field("options", &self.options)
            .finish()
    }
}

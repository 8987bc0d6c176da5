//! Per-origin robots.txt cache
//!
//! Entries live for the lifetime of the cache; nothing expires or is
//! invalidated mid-crawl. Each origin holds a `OnceCell`, so concurrent
//! checks against a new origin share one fetch.

use crate::robots::RobotsFile;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;

type Slot = Arc<OnceCell<Arc<RobotsFile>>>;

/// Cache of parsed robots.txt files keyed by `scheme://host[:port]`
#[derive(Debug, Default)]
pub struct RuleCache {
    entries: Mutex<HashMap<String, Slot>>,
}

impl RuleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached file for `origin`, running `fetch` if it is not cached yet
    ///
    /// `fetch` runs at most once per origin; callers arriving while it runs
    /// wait for its result.
    pub async fn get_or_fetch<F, Fut>(&self, origin: &str, fetch: F) -> Arc<RobotsFile>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RobotsFile>,
    {
        let slot = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            entries.entry(origin.to_string()).or_default().clone()
        };

        let file = slot
            .get_or_init(|| async move { Arc::new(fetch().await) })
            .await;
        Arc::clone(file)
    }

    /// Number of origins with a populated entry
    pub fn len(&self) -> usize {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.values().filter(|slot| slot.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

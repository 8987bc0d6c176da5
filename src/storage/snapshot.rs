//! Crawl snapshot codec
//!
//! The JSON layout is:
//!
//! ```json
//! {
//!   "baseUrl": "https://example.com/",
//!   "startedAt": "2024-01-01T00:00:00Z",
//!   "lastSavedAt": "2024-01-01T00:05:00Z",
//!   "queue": { "pending": [], "processing": [], "completed": [], "failed": [] }
//! }
//! ```

use crate::state::{Frontier, UrlState};
use crate::storage::{StorageError, StorageResult};
use crate::url::{CanonicalUrl, UrlCanonicalizer};
use crate::UrlResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Serializable crawl state plus metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub base_url: CanonicalUrl,
    pub started_at: DateTime<Utc>,
    pub last_saved_at: DateTime<Utc>,
    pub queue: QueueSnapshot,
}

/// The four frontier sets; `processing` holds URLs that were in flight
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    #[serde(default)]
    pub pending: Vec<CanonicalUrl>,
    #[serde(default)]
    pub processing: Vec<CanonicalUrl>,
    #[serde(default)]
    pub completed: Vec<CanonicalUrl>,
    #[serde(default)]
    pub failed: Vec<CanonicalUrl>,
}

impl QueueSnapshot {
    pub fn len(&self) -> usize {
        self.pending.len() + self.processing.len() + self.completed.len() + self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Snapshot {
    /// Captures the frontier as it is right now; `lastSavedAt` is set to now
    pub fn capture(base_url: &CanonicalUrl, started_at: DateTime<Utc>, frontier: &Frontier) -> Self {
        Self {
            base_url: base_url.clone(),
            started_at,
            last_saved_at: Utc::now(),
            queue: QueueSnapshot {
                pending: frontier.urls_in(UrlState::Pending),
                processing: frontier.urls_in(UrlState::InFlight),
                completed: frontier.urls_in(UrlState::Completed),
                failed: frontier.urls_in(UrlState::Failed),
            },
        }
    }

    /// Rebuilds the frontier, requeueing everything that was in flight
    ///
    /// Every entry is canonicalized again with `canonicalizer`, so snapshots
    /// that were edited by hand or written under other filter lists cannot
    /// bring back duplicate keys. Entries that no longer normalize are
    /// dropped. A URL listed in more than one set keeps the first state it
    /// is restored into, checked in the order completed, failed, pending,
    /// processing.
    ///
    /// # Errors
    ///
    /// Returns the `UrlError` if `baseUrl` itself cannot be canonicalized.
    pub fn restore(&self, canonicalizer: &UrlCanonicalizer) -> UrlResult<(CanonicalUrl, Frontier)> {
        let base_url = canonicalizer.try_normalize(self.base_url.as_str())?;
        let mut frontier = Frontier::new();

        let lists = [
            (UrlState::Completed, &self.queue.completed, UrlState::Completed),
            (UrlState::Failed, &self.queue.failed, UrlState::Failed),
            (UrlState::Pending, &self.queue.pending, UrlState::Pending),
            (UrlState::InFlight, &self.queue.processing, UrlState::Pending),
        ];

        for (listed_as, urls, restored_as) in lists {
            let mut dropped = 0;
            let mut inserted = 0;
            for raw in urls {
                match canonicalizer.normalize(raw.as_str()) {
                    Some(url) => {
                        if frontier.insert_with_state(url, restored_as) {
                            inserted += 1;
                        }
                    }
                    None => dropped += 1,
                }
            }

            if dropped > 0 {
                tracing::warn!(
                    "Dropped {} unparsable entries from queue.{}",
                    dropped,
                    listed_as.snapshot_key()
                );
            }
            if listed_as == UrlState::InFlight && inserted > 0 {
                tracing::info!("Requeued {} URLs that were in flight when the snapshot was taken", inserted);
            }
        }

        Ok((base_url, frontier))
    }

    /// Encodes the snapshot as pretty-printed JSON
    pub fn to_json(&self) -> StorageResult<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Decodes a snapshot from JSON bytes
    pub fn from_json(bytes: &[u8]) -> StorageResult<Self> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(StorageError::Corrupt("snapshot is empty".to_string()));
        }
        Ok(serde_json::from_slice(bytes)?)
    }
}

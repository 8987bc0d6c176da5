//! In-memory crawl frontier
//!
//! The frontier partitions every canonical URL the crawl has observed into
//! four disjoint sets: pending, in-flight, completed and failed. Membership is
//! tracked in a single index so a URL can never sit in two sets at once, and
//! pending URLs are additionally kept in a FIFO queue to give `next_url` a
//! stable dispatch order.

use crate::state::UrlState;
use crate::url::CanonicalUrl;
use crate::{CrawlError, Result};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};

/// Counts per frontier set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrontierStats {
    pub pending: usize,
    pub in_flight: usize,
    pub completed: usize,
    pub failed: usize,
    pub total: usize,
}

impl FrontierStats {
    /// Returns the count for a single state
    pub fn count(&self, state: UrlState) -> usize {
        match state {
            UrlState::Pending => self.pending,
            UrlState::InFlight => self.in_flight,
            UrlState::Completed => self.completed,
            UrlState::Failed => self.failed,
        }
    }

    fn slot(&mut self, state: UrlState) -> &mut usize {
        match state {
            UrlState::Pending => &mut self.pending,
            UrlState::InFlight => &mut self.in_flight,
            UrlState::Completed => &mut self.completed,
            UrlState::Failed => &mut self.failed,
        }
    }

    fn moved(&mut self, from: UrlState, to: UrlState) {
        *self.slot(from) -= 1;
        *self.slot(to) += 1;
    }
}

/// Frontier state machine over canonical URLs
#[derive(Debug, Clone, Default)]
pub struct Frontier {
    /// Current state of every URL ever observed
    index: HashMap<CanonicalUrl, UrlState>,

    /// Pending URLs in dispatch order
    queue: VecDeque<CanonicalUrl>,

    stats: FrontierStats,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a URL to `pending` unless it was already observed in any state
    ///
    /// # Returns
    ///
    /// * `true` - The URL was new and is now pending
    /// * `false` - The URL is already pending, in flight, completed or failed
    pub fn add(&mut self, url: CanonicalUrl) -> bool {
        self.insert_with_state(url, UrlState::Pending)
    }

    /// Adds every URL, returning how many were actually inserted
    pub fn add_batch<I>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = CanonicalUrl>,
    {
        let mut inserted = 0;
        for url in urls {
            if self.add(url) {
                inserted += 1;
            }
        }
        inserted
    }

    /// Moves the oldest pending URL to in-flight and returns it
    pub fn next_url(&mut self) -> Option<CanonicalUrl> {
        let url = self.queue.pop_front()?;

        if let Some(state) = self.index.get_mut(&url) {
            *state = UrlState::InFlight;
            self.stats.moved(UrlState::Pending, UrlState::InFlight);
        }

        Some(url)
    }

    /// Moves an in-flight URL to completed
    ///
    /// # Errors
    ///
    /// Returns `CrawlError::InvalidTransition` if the URL was never dispatched
    /// or has already been reported.
    pub fn mark_completed(&mut self, url: &CanonicalUrl) -> Result<()> {
        self.transition(url, UrlState::Completed)
    }

    /// Moves an in-flight URL to failed; failed URLs are never retried
    ///
    /// # Errors
    ///
    /// Returns `CrawlError::InvalidTransition` if the URL is not in flight.
    pub fn mark_failed(&mut self, url: &CanonicalUrl) -> Result<()> {
        self.transition(url, UrlState::Failed)
    }

    /// True when nothing is pending and nothing is in flight
    pub fn is_empty(&self) -> bool {
        self.stats.pending == 0 && self.stats.in_flight == 0
    }

    pub fn stats(&self) -> FrontierStats {
        self.stats
    }

    /// Returns the state of a URL, if it has been observed
    pub fn state_of(&self, url: &CanonicalUrl) -> Option<UrlState> {
        self.index.get(url).copied()
    }

    /// Lists the URLs in one state
    ///
    /// Pending URLs come back in dispatch order; the other sets are sorted so
    /// snapshots of the same frontier are byte-for-byte stable.
    pub fn urls_in(&self, state: UrlState) -> Vec<CanonicalUrl> {
        if state == UrlState::Pending {
            return self.queue.iter().cloned().collect();
        }

        let mut urls: Vec<CanonicalUrl> = self
            .index
            .iter()
            .filter(|(_, s)| **s == state)
            .map(|(url, _)| url.clone())
            .collect();
        urls.sort();
        urls
    }

    /// Inserts a URL directly into a state if it has never been observed
    ///
    /// Used when rebuilding a frontier from a snapshot.
    pub(crate) fn insert_with_state(&mut self, url: CanonicalUrl, state: UrlState) -> bool {
        if self.index.contains_key(&url) {
            return false;
        }

        if state == UrlState::Pending {
            self.queue.push_back(url.clone());
        }
        self.index.insert(url, state);
        *self.stats.slot(state) += 1;
        self.stats.total += 1;
        true
    }

    fn transition(&mut self, url: &CanonicalUrl, to: UrlState) -> Result<()> {
        match self.index.get_mut(url) {
            Some(current) if current.can_transition_to(to) => {
                let from = *current;
                *current = to;
                self.stats.moved(from, to);
                tracing::trace!("{} moved {} -> {}", url, from, to);
                Ok(())
            }
            other => Err(CrawlError::InvalidTransition {
                url: url.to_string(),
                from: other.map(|s| *s),
                to,
            }),
        }
    }
}

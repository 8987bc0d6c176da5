//! Frontier membership states for a canonical URL
//!
//! Every URL the crawl has ever observed is in exactly one of these states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents which frontier set a URL currently belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlState {
    /// Waiting to be handed to a fetcher
    Pending,

    /// Handed out by `next()` and not yet reported back
    InFlight,

    /// Fetched and processed successfully
    Completed,

    /// Reported as failed by the caller; never retried automatically
    Failed,
}

impl UrlState {
    /// Returns true if `self -> next` is a legal frontier transition
    pub fn can_transition_to(&self, next: UrlState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::InFlight)
                | (Self::InFlight, Self::Completed)
                | (Self::InFlight, Self::Failed)
        )
    }

    /// Name of the snapshot list holding URLs in this state
    pub fn snapshot_key(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InFlight => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Returns all possible URL states
    pub fn all_states() -> [Self; 4] {
        [Self::Pending, Self::InFlight, Self::Completed, Self::Failed]
    }
}

impl fmt::Display for UrlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::InFlight => "in-flight",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

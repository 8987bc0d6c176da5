//! Storage traits and error types
//!
//! This module defines the trait interface for snapshot sinks and
//! associated error types.

use crate::storage::Snapshot;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt snapshot: {0}")]
    Corrupt(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A durable home for crawl snapshots
///
/// Implementations hold at most one snapshot; `save` replaces whatever was
/// there before.
pub trait SnapshotStore: Send + Sync {
    /// Persists the snapshot, replacing any previous one
    fn save(&self, snapshot: &Snapshot) -> StorageResult<()>;

    /// Loads the stored snapshot, or `None` if nothing has been saved yet
    fn load(&self) -> StorageResult<Option<Snapshot>>;
}

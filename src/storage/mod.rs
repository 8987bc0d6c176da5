//! Storage module for persisting crawl state
//!
//! This module handles snapshotting the frontier so an interrupted crawl can
//! resume:
//! - The snapshot codec (JSON, camelCase fields)
//! - The `SnapshotStore` sink trait
//! - File and in-memory stores

mod file;
mod snapshot;
mod traits;

pub use file::{JsonFileStore, MemoryStore};
pub use snapshot::{QueueSnapshot, Snapshot};
pub use traits::{SnapshotStore, StorageError, StorageResult};

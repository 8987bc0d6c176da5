//! Snapshot store implementations

use crate::storage::{Snapshot, SnapshotStore, StorageResult};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Stores the snapshot as a JSON file
///
/// Writes go to a sibling `.tmp` file that is then renamed over the target,
/// so an interrupted save leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name: OsString = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl SnapshotStore for JsonFileStore {
    fn save(&self, snapshot: &Snapshot) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let bytes = snapshot.to_json()?;
        let temp = self.temp_path();
        std::fs::write(&temp, &bytes)?;
        std::fs::rename(&temp, &self.path)?;

        tracing::debug!(
            "Saved snapshot with {} URLs to {}",
            snapshot.queue.len(),
            self.path.display()
        );
        Ok(())
    }

    fn load(&self) -> StorageResult<Option<Snapshot>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Snapshot::from_json(&bytes).map(Some)
    }
}

/// Keeps the encoded snapshot in memory
///
/// Stores the JSON bytes rather than the value, so loads go through the same
/// decoding path as the file store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    bytes: Mutex<Option<Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw JSON of the last save, if any
    pub fn raw(&self) -> Option<Vec<u8>> {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SnapshotStore for MemoryStore {
    fn save(&self, snapshot: &Snapshot) -> StorageResult<()> {
        let encoded = snapshot.to_json()?;
        *self.bytes.lock().unwrap_or_else(PoisonError::into_inner) = Some(encoded);
        Ok(())
    }

    fn load(&self) -> StorageResult<Option<Snapshot>> {
        match self.raw() {
            Some(bytes) => Snapshot::from_json(&bytes).map(Some),
            None => Ok(None),
        }
    }
}

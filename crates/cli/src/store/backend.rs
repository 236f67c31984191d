// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence backends for collection snapshots.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use super::{StoreError, StoreResult};

/// Storage for one opaque blob per collection.
pub trait SnapshotBackend: Send + Sync {
    /// Reads the snapshot of `collection`, or `None` if it was never saved.
    fn load(&self, collection: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Replaces the snapshot of `collection` as a unit.
    fn save(&self, collection: &str, bytes: &[u8]) -> StoreResult<()>;
}

/// Rejects names that could escape the state directory.
pub(crate) fn check_collection(name: &str) -> StoreResult<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidCollection(name.to_string()))
    }
}

/// One `<collection>.json` file per collection under a directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileBackend { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the snapshot file for `collection`.
    pub fn path(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{}.json", collection))
    }
}

impl SnapshotBackend for FileBackend {
    fn load(&self, collection: &str) -> StoreResult<Option<Vec<u8>>> {
        check_collection(collection)?;
        match fs::read(self.path(collection)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, collection: &str, bytes: &[u8]) -> StoreResult<()> {
        check_collection(collection)?;
        fs::create_dir_all(&self.dir)?;

        // Write-then-rename so readers never see a partial snapshot
        let path = self.path(collection);
        let temp = self.dir.join(format!(".{}.json.tmp", collection));
        let mut file = File::create(&temp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&temp, &path)?;

        Ok(())
    }
}

/// Shared in-memory backend. Clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw snapshot bytes of `collection`, if any.
    pub fn get(&self, collection: &str) -> Option<Vec<u8>> {
        self.blobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(collection)
            .cloned()
    }

    /// Overwrites the raw snapshot bytes of `collection`.
    pub fn put(&self, collection: &str, bytes: impl Into<Vec<u8>>) {
        self.blobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(collection.to_string(), bytes.into());
    }
}

impl SnapshotBackend for MemoryBackend {
    fn load(&self, collection: &str) -> StoreResult<Option<Vec<u8>>> {
        check_collection(collection)?;
        Ok(self.get(collection))
    }

    fn save(&self, collection: &str, bytes: &[u8]) -> StoreResult<()> {
        check_collection(collection)?;
        self.put(collection, bytes);
        Ok(())
    }
}

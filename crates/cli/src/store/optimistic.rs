// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Version-stamped record store with conditional update.

use std::collections::HashSet;

use tether_core::{Fields, Origin, Record, RecordStatus};
use tracing::debug;
use uuid::Uuid;

use super::backend::{check_collection, SnapshotBackend};
use super::{StoreError, StoreResult};

/// Prefix of ids issued by the local store.
const LOCAL_ID_PREFIX: &str = "local-";

/// In-memory snapshot of one collection, persisted after every mutation.
///
/// Records keep insertion order. Every mutation builds the next snapshot,
/// persists it, and only then replaces the in-memory one; a failed save
/// leaves the store unchanged.
pub struct OptimisticStore<B: SnapshotBackend> {
    backend: B,
    collection: String,
    records: Vec<Record>,
    /// Every id this instance has seen or issued.
    issued: HashSet<String>,
}

impl<B: SnapshotBackend> OptimisticStore<B> {
    /// Load `collection` from `backend`, or start empty.
    pub fn open(backend: B, collection: impl Into<String>) -> StoreResult<Self> {
        let collection = collection.into();
        check_collection(&collection)?;

        let records: Vec<Record> = match backend.load(&collection)? {
            Some(bytes) => {
                let parsed: Option<Vec<Record>> =
                    serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupted {
                        collection: collection.clone(),
                        reason: e.to_string(),
                    })?;
                parsed.unwrap_or_default()
            }
            None => Vec::new(),
        };

        let mut issued = HashSet::with_capacity(records.len());
        for record in &records {
            record.validate().map_err(|e| StoreError::Corrupted {
                collection: collection.clone(),
                reason: e.to_string(),
            })?;
            if !issued.insert(record.id.clone()) {
                return Err(StoreError::Corrupted {
                    collection: collection.clone(),
                    reason: format!("duplicate id {}", record.id),
                });
            }
        }
        debug!("opened collection {} ({} records)", collection, records.len());

        Ok(OptimisticStore {
            backend,
            collection,
            records,
            issued,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// All records, in insertion order.
    pub fn list(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    /// The local record forked from remote entity `remote_id`, if any.
    pub fn find_by_origin(&self, remote_id: &str) -> Option<&Record> {
        self.records
            .iter()
            .find(|r| r.origin.as_ref().is_some_and(|o| o.id == remote_id))
    }

    /// Add a new record at version 1 under a fresh id.
    pub fn create(&mut self, fields: Fields) -> StoreResult<Record> {
        let record = Record::new(self.fresh_id(), fields);
        self.append(record)
    }

    /// Add a new record forked from a remote binding.
    pub fn create_shadow(&mut self, fields: Fields, origin: Origin) -> StoreResult<Record> {
        let record = Record::new(self.fresh_id(), fields).with_origin(origin);
        self.append(record)
    }

    /// Copy the fields of `id` into a new active record.
    pub fn clone_record(&mut self, id: &str) -> StoreResult<Record> {
        let source = self
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let fields = source.fields.clone();
        self.create(fields)
    }

    /// Merge `fields` into record `id` if its version is still `expected`.
    ///
    /// Fails with [`StoreError::VersionConflict`] and changes nothing when the
    /// stored version differs.
    pub fn update(&mut self, id: &str, fields: &Fields, expected: u64) -> StoreResult<Record> {
        let index = self.checked(id, expected)?;
        let next = self.records[index].merged(fields);
        self.replace(index, next)
    }

    /// Archive record `id` if its version is still `expected`.
    pub fn archive(&mut self, id: &str, expected: u64) -> StoreResult<Record> {
        let index = self.checked(id, expected)?;
        let next = self.records[index].with_status(RecordStatus::Archived);
        self.replace(index, next)
    }

    fn checked(&self, id: &str, expected: u64) -> StoreResult<usize> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let actual = self.records[index].version;
        if actual != expected {
            return Err(StoreError::VersionConflict {
                id: id.to_string(),
                expected,
                actual,
            });
        }
        Ok(index)
    }

    fn append(&mut self, record: Record) -> StoreResult<Record> {
        let mut next = self.records.clone();
        next.push(record.clone());
        self.commit(next)?;
        self.issued.insert(record.id.clone());
        Ok(record)
    }

    fn replace(&mut self, index: usize, record: Record) -> StoreResult<Record> {
        let mut next = self.records.clone();
        next[index] = record.clone();
        self.commit(next)?;
        Ok(record)
    }

    fn commit(&mut self, next: Vec<Record>) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(&next)?;
        self.backend.save(&self.collection, &bytes)?;
        self.records = next;
        Ok(())
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = format!("{}{}", LOCAL_ID_PREFIX, Uuid::new_v4().simple());
            if !self.issued.contains(&id) {
                return id;
            }
        }
    }
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Local, version-stamped record store used when the remote API is
//! unreachable.
//!
//! The whole collection is held in memory and rewritten through a
//! [`SnapshotBackend`] after every mutation. A mutation becomes visible only
//! once its snapshot is persisted.

mod backend;
mod draft;
mod optimistic;

pub use backend::{FileBackend, MemoryBackend, SnapshotBackend};
pub use draft::{DraftStore, DRAFT_COLLECTION};
pub use optimistic::OptimisticStore;

/// Error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error(
        "version conflict on {id}: expected version {expected}, stored version is {actual}\n  hint: re-fetch the record before updating"
    )]
    VersionConflict {
        id: String,
        expected: u64,
        actual: u64,
    },

    #[error("invalid collection name: '{0}'")]
    InvalidCollection(String),

    #[error("corrupted snapshot '{collection}': {reason}")]
    Corrupted { collection: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;


#[cfg(test)]
mod draft_tests;

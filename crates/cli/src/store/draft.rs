// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Unsaved form input kept between invocations.

use tether_core::Fields;
use tracing::warn;

use super::backend::SnapshotBackend;
use super::StoreResult;

/// Collection holding the draft.
pub const DRAFT_COLLECTION: &str = "draft";

/// A single field map persisted under the `draft` collection.
pub struct DraftStore<B: SnapshotBackend> {
    backend: B,
}

impl<B: SnapshotBackend> DraftStore<B> {
    pub fn new(backend: B) -> Self {
        DraftStore { backend }
    }

    pub fn save(&self, fields: &Fields) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(fields)?;
        self.backend.save(DRAFT_COLLECTION, &bytes)
    }

    /// The saved draft. An unreadable draft is discarded with a warning.
    pub fn load(&self) -> StoreResult<Option<Fields>> {
        let Some(bytes) = self.backend.load(DRAFT_COLLECTION)? else {
            return Ok(None);
        };
        match serde_json::from_slice::<Option<Fields>>(&bytes) {
            Ok(fields) => Ok(fields),
            Err(e) => {
                warn!("ignoring unreadable draft: {}", e);
                Ok(None)
            }
        }
    }

    pub fn clear(&self) -> StoreResult<()> {
        self.backend.save(DRAFT_COLLECTION, b"null")
    }
}

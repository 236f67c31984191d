// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use serde_json::json;
use tether_core::Fields;

use super::backend::MemoryBackend;
use super::draft::*;

fn fields() -> Fields {
    let mut fields = Fields::new();
    fields.insert("name".into(), json!("Retro Hits"));
    fields.insert("mode".into(), json!("public"));
    fields
}

#[test]
fn empty_backend_has_no_draft() {
    let drafts = DraftStore::new(MemoryBackend::new());
    assert_eq!(drafts.load().unwrap(), None);
}

#[test]
fn save_then_load() {
    let backend = MemoryBackend::new();
    DraftStore::new(backend.clone()).save(&fields()).unwrap();

    let reopened = DraftStore::new(backend);
    assert_eq!(reopened.load().unwrap(), Some(fields()));
}

#[test]
fn clear_removes_draft() {
    let drafts = DraftStore::new(MemoryBackend::new());
    drafts.save(&fields()).unwrap();
    drafts.clear().unwrap();
    assert_eq!(drafts.load().unwrap(), None);
}

#[test]
fn corrupt_draft_is_ignored() {
    let backend = MemoryBackend::new();
    backend.put(DRAFT_COLLECTION, "{not json");
    assert_eq!(DraftStore::new(backend).load().unwrap(), None);
}

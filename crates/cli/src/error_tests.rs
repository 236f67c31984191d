// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use crate::coordinator::ChannelRef;

#[test]
fn test_config_error_display() {
    let err = Error::Config("failed to parse config: bad".to_string());
    assert_eq!(
        err.to_string(),
        "configuration error: failed to parse config: bad"
    );
}

#[test]
fn test_invalid_field_has_hint() {
    let msg = Error::InvalidField("name".to_string()).to_string();
    assert!(msg.contains("invalid field 'name'"));
    assert!(msg.contains("hint: fields are given as --field key=value"));
}

#[test]
fn test_socket_disabled_has_hint() {
    assert!(Error::SocketDisabled.to_string().contains("--socket"));
}

#[test]
fn test_store_error_is_transparent() {
    let err: Error = StoreError::NotFound("local-1".to_string()).into();
    assert_eq!(
        err.to_string(),
        StoreError::NotFound("local-1".to_string()).to_string()
    );
}

#[test]
fn test_stale_binding_passes_hint_through() {
    let err: Error = CoordinatorError::StaleBinding {
        remote: ChannelRef::remote("ch-1", 3),
        local: ChannelRef::local("local-9", 1),
    }
    .into();
    let msg = err.to_string();
    assert!(msg.contains("ch-1 v3 (remote)"));
    assert!(msg.contains("local-9 v1 (local)"));
    assert!(msg.contains("--local"));
}

#[test]
fn test_validation_error_lists_messages() {
    let err: Error = CoordinatorError::Validation(vec![
        "Name must be at least 3 characters.".to_string(),
        "Slug is invalid.".to_string(),
    ])
    .into();
    assert!(err.to_string().contains("Name must be at least 3 characters."));
    assert!(err.to_string().contains("Slug is invalid."));
}

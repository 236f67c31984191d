// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Channel command specs.
//!
//! Offline cases point the API at a closed port with retries disabled, so
//! every operation lands in the local store. Online cases use a canned HTTP
//! responder on an ephemeral port.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;

use common::*;
use serde_json::Value;

fn local_id(outcome: &Value) -> String {
    outcome["channel"]["id"].as_str().unwrap().to_string()
}

// =============================================================================
// Offline
// =============================================================================

#[test]
fn list_offline_reports_local_source() {
    let sandbox = Sandbox::offline();
    sandbox
        .tether()
        .args(["channels", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No channels found."))
        .stdout(predicate::str::contains("source: local store"));
}

#[test]
fn create_offline_is_accepted_locally() {
    let sandbox = Sandbox::offline();
    sandbox
        .tether()
        .args(["channels", "create", "-f", "name=Retro Hits", "-f", "slug=retro-hits"])
        .assert()
        .success()
        .stdout(predicate::str::contains("v1 (local) [active] Retro Hits"))
        .stdout(predicate::str::contains("accepted locally (pending sync)"));

    sandbox
        .tether()
        .args(["channels", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Retro Hits"));
}

#[test]
fn create_json_states_provenance() {
    let sandbox = Sandbox::offline();
    let outcome = sandbox.create(&["name=Retro Hits"]);

    assert_eq!(outcome["provenance"], "local");
    assert!(outcome["cause"].as_str().is_some());
    assert_eq!(outcome["channel"]["space"], "local");
    assert_eq!(outcome["channel"]["version"], 1);
    assert!(local_id(&outcome).starts_with("local-"));
}

#[test]
fn local_save_bumps_version() {
    let sandbox = Sandbox::offline();
    let id = local_id(&sandbox.create(&["name=Retro Hits"]));

    sandbox
        .tether()
        .args(["channels", "save", &id, "--version", "1", "--local"])
        .args(["-f", "desc=80s and 90s"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("{} v2 (local)", id)))
        .stdout(predicate::str::contains("bound to local record"));
}

#[test]
fn stale_local_save_is_rejected() {
    let sandbox = Sandbox::offline();
    let id = local_id(&sandbox.create(&["name=Retro Hits"]));
    sandbox.stdout(&["channels", "save", &id, "--version", "1", "--local", "-f", "desc=a"]);

    sandbox
        .tether()
        .args(["channels", "save", &id, "--version", "1", "--local", "-f", "desc=b"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("version conflict"))
        .stderr(predicate::str::contains("stored version is 2"));
}

#[test]
fn remote_save_offline_forks_shadow() {
    let sandbox = Sandbox::offline();
    sandbox
        .tether()
        .args(["channels", "save", "ch-1", "--version", "3", "-f", "name=Retro Hits"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(forked from ch-1 v3)"))
        .stdout(predicate::str::contains("accepted locally (pending sync)"));

    sandbox
        .tether()
        .args(["channels", "save", "ch-1", "--version", "3", "-f", "name=Other"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("was forked locally"))
        .stderr(predicate::str::contains("--local"));
}

#[test]
fn archive_local_channel() {
    let sandbox = Sandbox::offline();
    let id = local_id(&sandbox.create(&["name=Retro Hits"]));

    sandbox
        .tether()
        .args(["channels", "archive", &id, "--version", "1", "--local"])
        .assert()
        .success()
        .stdout(predicate::str::contains("v2 (local) [archived]"));
}

#[test]
fn clone_local_channel() {
    let sandbox = Sandbox::offline();
    let id = local_id(&sandbox.create(&["name=Retro Hits"]));

    let output = sandbox.stdout(&["channels", "clone", &id, "--version", "1", "--local", "-o", "json"]);
    let outcome: Value = serde_json::from_str(&output).unwrap();
    assert_ne!(local_id(&outcome), id);
    assert_eq!(outcome["channel"]["fields"]["name"], "Retro Hits");
    assert_eq!(outcome["channel"]["version"], 1);
}

#[test]
fn search_offline_matches_local_records() {
    let sandbox = Sandbox::offline();
    sandbox.create(&["name=Retro Hits", "slug=retro-hits"]);
    sandbox.create(&["name=Morning News"]);

    sandbox
        .tether()
        .args(["channels", "search", "RETRO"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Retro Hits"))
        .stdout(predicate::str::contains("Morning News").not());
}

#[test]
fn invalid_fields_are_rejected_before_io() {
    let sandbox = Sandbox::offline();
    sandbox
        .tether()
        .args(["channels", "create", "-f", "name=ab", "-f", "mode=secret"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("validation failed"));

    sandbox
        .tether()
        .args(["channels", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No channels found."));
}

#[test]
fn malformed_field_flag_fails() {
    let sandbox = Sandbox::offline();
    sandbox
        .tether()
        .args(["channels", "create", "-f", "name"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected KEY=VALUE"));
}

// =============================================================================
// Online
// =============================================================================

#[test]
fn list_online_is_served_by_api() {
    let (api, server) = canned_api(vec![(
        200,
        r#"{"channels":[{"channelId":"ch-1","version":2,"name":"Retro Hits"}]}"#,
    )]);
    let sandbox = Sandbox::offline();

    sandbox
        .tether()
        .args(["--api", &api, "channels", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ch-1 v2 (remote) [active] Retro Hits"))
        .stdout(predicate::str::contains("source: api"));

    let seen = server.join().unwrap();
    assert_eq!(seen, vec!["GET /api/channels HTTP/1.1"]);
}

#[test]
fn create_online_is_confirmed_remotely() {
    let (api, server) = canned_api(vec![(201, r#"{"channelId":"ch-7","version":1}"#)]);
    let sandbox = Sandbox::offline();

    sandbox
        .tether()
        .args(["--api", &api, "channels", "create", "-f", "name=Retro Hits"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ch-7 v1 (remote)"))
        .stdout(predicate::str::contains("confirmed remotely"));

    let seen = server.join().unwrap();
    assert_eq!(seen, vec!["POST /api/channels HTTP/1.1"]);
}

#[test]
fn health_reports_online_and_offline() {
    let (api, server) = canned_api(vec![(200, r#"{"status":"ok"}"#)]);
    let sandbox = Sandbox::offline();

    sandbox
        .tether()
        .args(["--api", &api, "health"])
        .assert()
        .success()
        .stdout(predicate::str::contains("api: online"));
    server.join().unwrap();

    sandbox
        .tether()
        .arg("health")
        .assert()
        .failure()
        .stdout(predicate::str::contains("api: offline (local fallback)"))
        .stderr(predicate::str::contains("api unreachable"));
}

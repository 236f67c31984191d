// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Draft specs: the draft survives failed submissions and is consumed by
//! successful ones.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;

use common::*;

#[test]
fn save_show_clear() {
    let sandbox = Sandbox::offline();
    sandbox
        .tether()
        .args(["draft", "save", "-f", "name=Retro Hits", "-f", "slug=retro-hits"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Draft saved (2 fields)."));

    sandbox
        .tether()
        .args(["draft", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Retro Hits\""));

    sandbox.tether().args(["draft", "clear"]).assert().success();
    sandbox
        .tether()
        .args(["draft", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No draft saved."));
}

#[test]
fn rejected_create_keeps_draft() {
    let sandbox = Sandbox::offline();
    sandbox
        .tether()
        .args(["channels", "create", "-f", "name=ab"])
        .assert()
        .failure();

    sandbox
        .tether()
        .args(["draft", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"ab\""));
}

#[test]
fn create_submits_and_consumes_draft() {
    let sandbox = Sandbox::offline();
    sandbox.stdout(&["draft", "save", "-f", "name=From Draft"]);

    sandbox
        .tether()
        .args(["channels", "create"])
        .assert()
        .success()
        .stdout(predicate::str::contains("From Draft"));

    sandbox
        .tether()
        .args(["draft", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No draft saved."));
}

#[test]
fn create_without_draft_fails() {
    let sandbox = Sandbox::offline();
    sandbox
        .tether()
        .args(["channels", "create"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no draft saved"));
}

#[test]
fn show_prints_fields_as_json() {
    let sandbox = Sandbox::offline();
    sandbox.stdout(&["draft", "save", "-f", "slug=retro-hits", "-f", "rank:=3"]);

    let shown = sandbox.stdout(&["draft", "show"]);
    similar_asserts::assert_eq!(shown, "{\n  \"rank\": 3,\n  \"slug\": \"retro-hits\"\n}\n");
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration specs: defaults, overrides and rejection of bad values.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;

use common::*;
use yare::parameterized;

#[test]
fn show_prints_defaults() {
    let sandbox = Sandbox::with_config("");
    sandbox
        .tether()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "api_base_url = \"http://127.0.0.1:8080/api\"",
        ))
        .stdout(predicate::str::contains("max_attempts = 4"))
        .stdout(predicate::str::contains("collection = \"channels\""))
        .stdout(predicate::str::contains("channel-status"));
}

#[test]
fn show_reflects_flags() {
    let sandbox = Sandbox::with_config("max_attempts = 1\n");
    sandbox
        .tether()
        .args(["--api", "http://flag.test/api", "--socket", "ws://flag.test/ws"])
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("api_base_url = \"http://flag.test/api\""))
        .stdout(predicate::str::contains("socket_url = \"ws://flag.test/ws\""))
        .stdout(predicate::str::contains("max_attempts = 1"))
        .stdout(predicate::str::contains(
            sandbox.state_dir().to_string_lossy().to_string(),
        ));
}

#[test]
fn show_masks_token() {
    let sandbox = Sandbox::with_config("token = \"very-secret\"\n");
    sandbox
        .tether()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("very-secret").not());
}

#[parameterized(
    unknown_field = { "retries = 2\n", "failed to parse config" },
    jitter = { "backoff_jitter = 2.0\n", "backoff_jitter" },
    zero_timeout = { "request_timeout_ms = 0\n", "request_timeout_ms" },
    socket_scheme = { "socket_url = \"http://rt.test\"\n", "ws://" },
    draft_collection = { "collection = \"draft\"\n", "reserved for the draft" },
)]
fn bad_config_is_rejected(content: &str, message: &str) {
    let sandbox = Sandbox::with_config(content);
    sandbox
        .tether()
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error: configuration error"))
        .stderr(predicate::str::contains(message));
}

#[test]
fn watch_without_socket_explains_setup() {
    let sandbox = Sandbox::offline();
    sandbox
        .tether()
        .args(["watch", "--for-secs", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no socket endpoint configured"))
        .stderr(predicate::str::contains("hint:"));
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use super::*;
use clap::CommandFactory;
use serde_json::json;
use yare::parameterized;

#[test]
fn test_cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[parameterized(
    save = { "save" },
    archive = { "archive" },
    clone = { "clone" },
)]
fn test_remote_fallback_is_explained_in_help(name: &str) {
    let mut cmd = Cli::command();
    let channels = cmd.find_subcommand_mut("channels").unwrap();
    let sub = channels.find_subcommand_mut(name).unwrap();
    let help = sub.render_long_help().to_string();
    assert!(help.contains("API is unreachable"), "{} help: {}", name, help);
    assert!(help.contains("fetched in"), "{} help: {}", name, help);
}

#[parameterized(
    plain = { "name=Retro Hits", "name", json!("Retro Hits") },
    empty_value = { "desc=", "desc", json!("") },
    value_with_equals = { "note=a=b", "note", json!("a=b") },
    raw_number = { "rank:=3", "rank", json!(3) },
    raw_list = { "tags:=[\"live\"]", "tags", json!(["live"]) },
    numeric_text_stays_text = { "slug=123", "slug", json!("123") },
)]
fn test_parse_field(input: &str, key: &str, value: Value) {
    assert_eq!(parse_field(input).unwrap(), (key.to_string(), value));
}

#[parameterized(
    no_separator = { "name" },
    empty_key = { "=value" },
    bad_json = { "rank:=three" },
)]
fn test_parse_field_rejects(input: &str) {
    assert!(parse_field(input).is_err());
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "tether",
        "channels",
        "list",
        "--api",
        "http://127.0.0.1:1/api",
        "-v",
    ])
    .unwrap();
    assert_eq!(cli.global.api.as_deref(), Some("http://127.0.0.1:1/api"));
    assert!(cli.global.verbose);
}

#[test]
fn test_save_requires_version() {
    let result = Cli::try_parse_from(["tether", "channels", "save", "ch-1", "-f", "name=x"]);
    assert!(result.is_err());
}

#[test]
fn test_local_ref() {
    let cli = Cli::try_parse_from([
        "tether", "channels", "archive", "local-1", "--version", "2", "--local",
    ])
    .unwrap();
    match cli.command {
        Command::Channels(ChannelsCommand::Archive { target, output }) => {
            assert_eq!(target.id, "local-1");
            assert_eq!(target.version, 2);
            assert!(target.local);
            assert_eq!(output, OutputFormat::Text);
        }
        _ => panic!("expected channels archive"),
    }
}

#[test]
fn test_watch_topics() {
    let cli = Cli::try_parse_from([
        "tether", "watch", "-t", "alerts", "--topic", "playout-events", "--for-secs", "5",
    ])
    .unwrap();
    match cli.command {
        Command::Watch { topics, for_secs } => {
            assert_eq!(topics, vec!["alerts", "playout-events"]);
            assert_eq!(for_secs, Some(5));
        }
        _ => panic!("expected watch"),
    }
}

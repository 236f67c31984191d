// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::Value;

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

// Custom help template that groups commands into sections
const HELP_TEMPLATE: &str = "{about-with-newline}
{usage-heading} {usage}

{before-help}Options:
{options}{after-help}";

const COMMANDS_HELP: &str = "\
Channels:
  channels    List, create, save, clone, archive and search channels
  draft       Keep an unsaved channel form locally
  health      Probe the API

Realtime:
  watch       Follow realtime topics

Setup:
  config      Show the effective configuration";

// A fallback on a remote channel only knows what this run fetched
const FORK_NOTE: &str = "\
If the API is unreachable, a remote channel is forked into a local record.
The local record holds only the fields given here plus any fetched in the
same run; later commands must address it with --local.";

const QUICKSTART_HELP: &str = "\
Get started:
  tether health                                 Check the API
  tether channels list                          List channels
  tether channels create --field name=\"Hits\"    Create a channel
  tether watch --topic alerts                   Follow alerts";

#[derive(Parser)]
#[command(name = "tether")]
#[command(version)]
#[command(about = "Channel client with retrying requests, realtime topics and local fallback")]
#[command(
    long_about = "Channel client with retrying requests, realtime topics and local fallback.\n\n\
    When the API is unreachable, writes are accepted by a local versioned store \
    and reported as pending sync."
)]
#[command(help_template = HELP_TEMPLATE)]
#[command(before_help = COMMANDS_HELP)]
#[command(after_help = QUICKSTART_HELP)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command.
#[derive(Args, Clone, Debug, Default)]
pub struct GlobalArgs {
    /// Configuration file (default: <config dir>/tether/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// API base URL, overriding the config file
    #[arg(long, global = true, value_name = "URL")]
    pub api: Option<String>,

    /// Realtime endpoint (ws:// or wss://), overriding the config file
    #[arg(long, global = true, value_name = "URL")]
    pub socket: Option<String>,

    /// Local store directory, overriding the config file
    #[arg(long, global = true, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    /// Log debug detail to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Manage channels
    #[command(subcommand)]
    Channels(ChannelsCommand),

    /// Probe the API once
    Health,

    /// Subscribe to realtime topics and print events
    #[command(after_help = "Examples:\n  \
        tether watch                          Default topics until interrupted\n  \
        tether watch --topic alerts           One topic\n  \
        tether watch --for-secs 30            Stop after 30 seconds")]
    Watch {
        /// Topic to subscribe (repeatable; default: configured topics)
        #[arg(long = "topic", short, value_name = "TOPIC")]
        topics: Vec<String>,

        /// Stop after this many seconds
        #[arg(long, value_name = "N")]
        for_secs: Option<u64>,
    },

    /// Manage the local channel draft
    #[command(subcommand)]
    Draft(DraftCommand),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Reference to a channel as printed by earlier commands.
#[derive(Args, Clone, Debug)]
pub struct RefArgs {
    /// Channel id
    pub id: String,

    /// Version the channel was last seen at
    #[arg(long)]
    pub version: u64,

    /// The id names a local record
    #[arg(long)]
    pub local: bool,
}

/// Field input.
#[derive(Args, Clone, Debug, Default)]
pub struct FieldArgs {
    /// Field as key=value, or key:=json for raw JSON (repeatable)
    #[arg(long = "field", short = 'f', value_name = "KEY=VALUE", value_parser = parse_field)]
    pub fields: Vec<(String, Value)>,
}

#[derive(Subcommand)]
pub enum ChannelsCommand {
    /// List channels
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Create a channel
    #[command(after_help = "Examples:\n  \
        tether channels create -f name=\"Retro Hits\" -f slug=retro-hits\n  \
        tether channels create -f name=News -f tags:='[\"live\"]'")]
    Create {
        #[command(flatten)]
        fields: FieldArgs,

        /// Output format
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Update a channel last seen at --version
    #[command(
        arg_required_else_help = true,
        before_long_help = FORK_NOTE,
        after_help = "Examples:\n  \
        tether channels save ch-1 --version 3 -f name=\"Retro Hits\"\n  \
        tether channels save local-7f3a --version 1 --local -f desc=Updated"
    )]
    Save {
        #[command(flatten)]
        target: RefArgs,

        #[command(flatten)]
        fields: FieldArgs,

        /// Output format
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Copy a channel into a new one
    ///
    /// If the API is unreachable, the copy is made locally from the fields
    /// fetched in the same run; the source itself is left untouched.
    #[command(arg_required_else_help = true)]
    Clone {
        #[command(flatten)]
        target: RefArgs,

        /// Output format
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Archive a channel last seen at --version
    #[command(arg_required_else_help = true, before_long_help = FORK_NOTE)]
    Archive {
        #[command(flatten)]
        target: RefArgs,

        /// Output format
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Search channels by name, description, format or slug
    #[command(arg_required_else_help = true)]
    Search {
        /// Case-insensitive text to look for
        query: String,

        /// Output format
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },
}

#[derive(Subcommand)]
pub enum DraftCommand {
    /// Store fields as the current draft
    Save {
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Print the current draft
    Show,
    /// Discard the current draft
    Clear,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show,
}

/// Parse `key=value` (string) or `key:=json` (raw JSON).
pub fn parse_field(input: &str) -> Result<(String, Value), String> {
    if let Some((key, raw)) = input.split_once(":=") {
        if !key.is_empty() && !key.contains('=') {
            let value = serde_json::from_str(raw)
                .map_err(|e| format!("invalid JSON for '{}': {}", key, e))?;
            return Ok((key.to_string(), value));
        }
    }
    match input.split_once('=') {
        Some((key, value)) if !key.is_empty() => {
            Ok((key.to_string(), Value::String(value.to_string())))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", input)),
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Utc};
use serde::Serialize;
use tether_core::{Fields, RecordStatus};

use crate::cli::{ChannelsCommand, OutputFormat, RefArgs};
use crate::config::Config;
use crate::coordinator::{Channel, ChannelRef, Coordinator, Outcome, Provenance};
use crate::error::{Error, Result};
use crate::request::HttpTransport;
use crate::store::{DraftStore, SnapshotBackend};

use super::{collect_fields, open_coordinator, open_drafts};

/// Execute a channels subcommand.
pub async fn run(cmd: ChannelsCommand, config: &Config) -> Result<()> {
    let mut coordinator = open_coordinator(config)?;
    let drafts = open_drafts(config);
    run_impl(&mut coordinator, &drafts, cmd).await
}

/// Internal implementation that accepts the coordinator for testing.
pub(crate) async fn run_impl<T, B, D>(
    coordinator: &mut Coordinator<T, B>,
    drafts: &DraftStore<D>,
    cmd: ChannelsCommand,
) -> Result<()>
where
    T: HttpTransport,
    B: SnapshotBackend,
    D: SnapshotBackend,
{
    match cmd {
        ChannelsCommand::List { output } => {
            let outcome = coordinator.list().await?;
            print_many(&outcome, output)
        }
        ChannelsCommand::Search { query, output } => {
            let outcome = coordinator.search(&query).await?;
            print_many(&outcome, output)
        }
        ChannelsCommand::Create { fields, output } => {
            let fields = fields_or_draft(drafts, collect_fields(fields))?;
            drafts.save(&fields)?;
            let outcome = coordinator.create(fields).await?;
            drafts.clear()?;
            print_one(&outcome, output)
        }
        ChannelsCommand::Save {
            target,
            fields,
            output,
        } => {
            let fields = fields_or_draft(drafts, collect_fields(fields))?;
            drafts.save(&fields)?;
            let outcome = coordinator.save(&binding(&target), fields).await?;
            drafts.clear()?;
            print_one(&outcome, output)
        }
        ChannelsCommand::Clone { target, output } => {
            let outcome = coordinator.clone_channel(&binding(&target)).await?;
            print_one(&outcome, output)
        }
        ChannelsCommand::Archive { target, output } => {
            let outcome = coordinator.archive(&binding(&target)).await?;
            print_one(&outcome, output)
        }
    }
}

fn binding(target: &RefArgs) -> ChannelRef {
    if target.local {
        ChannelRef::local(&target.id, target.version)
    } else {
        ChannelRef::remote(&target.id, target.version)
    }
}

/// Without explicit fields, submit the saved draft.
fn fields_or_draft<D: SnapshotBackend>(drafts: &DraftStore<D>, fields: Fields) -> Result<Fields> {
    if !fields.is_empty() {
        return Ok(fields);
    }
    drafts.load()?.ok_or(Error::NoDraft)
}

/// One-line summary of a channel.
pub(crate) fn format_channel_line(channel: &Channel) -> String {
    let mut line = format!(
        "{} [{}] {}",
        channel.binding,
        channel.status,
        channel.name().unwrap_or("(unnamed)")
    );
    if let Some(origin) = &channel.origin {
        line.push_str(&format!(" (forked from {} v{})", origin.id, origin.version));
    }
    line
}

/// Provenance as shown to the user.
pub(crate) fn format_provenance(provenance: &Provenance) -> String {
    match provenance {
        Provenance::Remote => provenance.describe().to_string(),
        Provenance::Local { cause } => format!("{}: {}", provenance.describe(), cause),
    }
}

#[derive(Serialize)]
struct ChannelJson<'a> {
    id: &'a str,
    space: String,
    version: u64,
    status: RecordStatus,
    fields: &'a Fields,
    #[serde(skip_serializing_if = "Option::is_none")]
    origin: Option<OriginJson<'a>>,
}

#[derive(Serialize)]
struct OriginJson<'a> {
    id: &'a str,
    version: u64,
}

#[derive(Serialize)]
struct OutcomeJson<V> {
    #[serde(flatten)]
    value: V,
    provenance: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    cause: Option<String>,
    at: DateTime<Utc>,
}

#[derive(Serialize)]
struct ManyJson<'a> {
    channels: Vec<ChannelJson<'a>>,
}

#[derive(Serialize)]
struct OneJson<'a> {
    channel: ChannelJson<'a>,
}

impl<'a> From<&'a Channel> for ChannelJson<'a> {
    fn from(channel: &'a Channel) -> Self {
        ChannelJson {
            id: &channel.binding.id,
            space: channel.binding.space.to_string(),
            version: channel.binding.version,
            status: channel.status,
            fields: &channel.fields,
            origin: channel.origin.as_ref().map(|o| OriginJson {
                id: &o.id,
                version: o.version,
            }),
        }
    }
}

fn outcome_json<V, T>(outcome: &Outcome<T>, value: V) -> OutcomeJson<V> {
    let (provenance, cause) = match &outcome.provenance {
        Provenance::Remote => ("remote", None),
        Provenance::Local { cause } => ("local", Some(cause.clone())),
    };
    OutcomeJson {
        value,
        provenance,
        cause,
        at: outcome.at,
    }
}

fn print_many(outcome: &Outcome<Vec<Channel>>, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Text => {
            if outcome.value.is_empty() {
                println!("No channels found.");
            }
            for channel in &outcome.value {
                println!("{}", format_channel_line(channel));
            }
            let source = match &outcome.provenance {
                Provenance::Remote => "api".to_string(),
                Provenance::Local { cause } => format!("local store ({})", cause),
            };
            println!("source: {}", source);
        }
        OutputFormat::Json => {
            let many = ManyJson {
                channels: outcome.value.iter().map(ChannelJson::from).collect(),
            };
            println!("{}", serde_json::to_string_pretty(&outcome_json(outcome, many))?);
        }
    }
    Ok(())
}

fn print_one(outcome: &Outcome<Channel>, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Text => {
            println!("{}", format_channel_line(&outcome.value));
            println!("{}", format_provenance(&outcome.provenance));
        }
        OutputFormat::Json => {
            let one = OneJson {
                channel: ChannelJson::from(&outcome.value),
            };
            println!("{}", serde_json::to_string_pretty(&outcome_json(outcome, one))?);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "channels_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::cli::DraftCommand;
use crate::config::Config;
use crate::error::Result;
use crate::store::{DraftStore, SnapshotBackend};

use super::{collect_fields, open_drafts};

/// Execute a draft subcommand.
pub fn run(cmd: DraftCommand, config: &Config) -> Result<()> {
    run_impl(&open_drafts(config), cmd)
}

pub(crate) fn run_impl<B: SnapshotBackend>(drafts: &DraftStore<B>, cmd: DraftCommand) -> Result<()> {
    match cmd {
        DraftCommand::Save { fields } => {
            let mut draft = drafts.load()?.unwrap_or_default();
            draft.extend(collect_fields(fields));
            drafts.save(&draft)?;
            println!("Draft saved ({} fields).", draft.len());
        }
        DraftCommand::Show => match drafts.load()? {
            Some(draft) => println!("{}", serde_json::to_string_pretty(&draft)?),
            None => println!("No draft saved."),
        },
        DraftCommand::Clear => {
            drafts.clear()?;
            println!("Draft cleared.");
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "draft_tests.rs"]
mod tests;

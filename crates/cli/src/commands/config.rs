// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::cli::ConfigCommand;
use crate::config::Config;
use crate::error::Result;

/// Execute a config subcommand.
pub fn run(cmd: ConfigCommand, config: &Config) -> Result<()> {
    match cmd {
        ConfigCommand::Show => print!("{}", config.to_display_toml()?),
    }
    Ok(())
}

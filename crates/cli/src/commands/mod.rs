// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod channels;
pub mod config;
pub mod draft;
pub mod health;
pub mod watch;

use tether_core::Fields;

use crate::cli::{FieldArgs, GlobalArgs};
use crate::config::{default_config_path, Config};
use crate::coordinator::Coordinator;
use crate::error::Result;
use crate::request::RequestClient;
use crate::store::{DraftStore, FileBackend, OptimisticStore};
use crate::validate::ChannelRules;

/// Load the config file and apply command-line overrides.
pub fn load_config(global: &GlobalArgs) -> Result<Config> {
    let path = match &global.config {
        Some(path) => path.clone(),
        None => default_config_path(),
    };
    let mut config = Config::load(&path)?;

    if let Some(api) = &global.api {
        config.api_base_url = api.clone();
    }
    if let Some(socket) = &global.socket {
        config.socket_url = Some(socket.clone());
    }
    if let Some(dir) = &global.state_dir {
        config.state_dir = Some(dir.clone());
    }
    config.validate()?;
    Ok(config)
}

/// Open the coordinator over the HTTP API and the on-disk store.
pub(crate) fn open_coordinator(config: &Config) -> Result<Coordinator> {
    let client = RequestClient::new(
        &config.api_base_url,
        config.retry_policy(),
        config.request_timeout(),
    )
    .with_session(config.session());
    let store = OptimisticStore::open(FileBackend::new(config.state_dir()), &config.collection)?;

    Ok(Coordinator::new(client, store)
        .with_validator(ChannelRules)
        .with_health_timeout(config.health_timeout()))
}

pub(crate) fn open_drafts(config: &Config) -> DraftStore<FileBackend> {
    DraftStore::new(FileBackend::new(config.state_dir()))
}

/// Collect repeated `--field` values; later keys win.
pub(crate) fn collect_fields(args: FieldArgs) -> Fields {
    args.fields.into_iter().collect()
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

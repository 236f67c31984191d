// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! tether - a channel client that keeps working when the API does not.
//!
//! # Main Components
//!
//! - [`RequestClient`] - HTTP requests with per-attempt timeouts, bounded
//!   retries and a stable idempotency key
//! - [`ReconnectingSocket`] - realtime connection with backoff and resubscribe
//! - [`OptimisticStore`] - local versioned records with conditional updates
//! - [`Coordinator`] - remote-first channel operations with local fallback
//!
//! ```rust,ignore
//! use tether::{Config, Coordinator, OptimisticStore, FileBackend, RequestClient};
//!
//! let config = Config::load(&path)?;
//! let client = RequestClient::new(&config.api_base_url, config.retry_policy(), config.request_timeout());
//! let store = OptimisticStore::open(FileBackend::new(config.state_dir()), "channels")?;
//! let mut coordinator = Coordinator::new(client, store);
//!
//! let outcome = coordinator.list().await?;
//! println!("{} channels, {}", outcome.value.len(), outcome.provenance.describe());
//! ```

mod cli;
mod commands;

pub mod config;
pub mod coordinator;
pub mod error;
pub mod request;
pub mod socket;
pub mod store;
pub mod validate;

pub use cli::{
    ChannelsCommand, Cli, Command, ConfigCommand, DraftCommand, FieldArgs, GlobalArgs,
    OutputFormat, RefArgs,
};
pub use config::Config;
pub use coordinator::{ChannelRef, Coordinator, Outcome, Provenance};
pub use error::{Error, Result};
pub use request::{RequestClient, RetryPolicy};
pub use socket::{ReconnectingSocket, SocketConfig, SocketHandle, SocketState};
pub use store::{FileBackend, MemoryBackend, OptimisticStore};

/// Run one parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let config = commands::load_config(&cli.global)?;

    match cli.command {
        Command::Channels(cmd) => commands::channels::run(cmd, &config).await,
        Command::Health => commands::health::run(&config).await,
        Command::Watch { topics, for_secs } => {
            commands::watch::run(topics, for_secs, &config).await
        }
        Command::Draft(cmd) => commands::draft::run(cmd, &config),
        Command::Config(cmd) => commands::config::run(cmd, &config),
    }
}

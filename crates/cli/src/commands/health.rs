// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::config::Config;
use crate::coordinator::{ApiState, Coordinator};
use crate::error::Result;
use crate::request::HttpTransport;
use crate::store::SnapshotBackend;

use super::open_coordinator;

/// Probe the API once and report its state.
pub async fn run(config: &Config) -> Result<()> {
    let mut coordinator = open_coordinator(config)?;
    run_impl(&mut coordinator).await
}

pub(crate) async fn run_impl<T: HttpTransport, B: SnapshotBackend>(
    coordinator: &mut Coordinator<T, B>,
) -> Result<()> {
    let base_url = coordinator.client().base_url().to_string();
    match coordinator.health().await {
        Ok(state) => {
            println!("api: {} ({})", state, base_url);
            Ok(())
        }
        Err(e) => {
            println!("api: {} ({})", ApiState::Offline, base_url);
            Err(e.into())
        }
    }
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;

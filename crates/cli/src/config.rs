// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration.
//!
//! Configuration is read from a TOML file (by default
//! `<config dir>/tether/config.toml`). Every field is optional; a missing
//! file yields the defaults. Command-line flags override file values.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tether_core::Session;

use crate::error::{Error, Result};
use crate::request::RetryPolicy;
use crate::socket::SocketConfig;
use crate::store::DRAFT_COLLECTION;

const APP_DIR_NAME: &str = "tether";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default socket topics.
pub const DEFAULT_TOPICS: &[&str] = &["channel-status", "playout-events", "alerts"];

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base URL of the channel API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Realtime endpoint (`ws://` or `wss://`). Absent disables the socket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket_url: Option<String>,
    /// Deadline for a single request attempt.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Retries after the initial attempt.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the first retry; doubles per retry.
    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,
    /// Optional cap on the retry delay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_backoff_ms: Option<u64>,
    /// Fraction of each retry delay that may be shaved off at random.
    #[serde(default)]
    pub backoff_jitter: f64,
    /// Reconnect backoff base.
    #[serde(default = "default_base_reconnect_ms")]
    pub base_reconnect_ms: u64,
    /// Reconnect backoff cap.
    #[serde(default = "default_max_reconnect_delay_ms")]
    pub max_reconnect_delay_ms: u64,
    /// Deadline for one socket handshake.
    #[serde(default = "default_socket_connect_timeout_ms")]
    pub socket_connect_timeout_ms: u64,
    /// Deadline for the health probe.
    #[serde(default = "default_health_timeout_ms")]
    pub health_timeout_ms: u64,
    /// Directory of the local store. Defaults to the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<PathBuf>,
    /// Collection name of the local store.
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Topics subscribed by `watch` when none are given.
    #[serde(default = "default_topics")]
    pub topics: Vec<String>,
    /// Bearer token of the static session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Identity presented on the socket handshake.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
}

fn default_api_base_url() -> String {
    "http://127.0.0.1:8080/api".to_string()
}

fn default_request_timeout_ms() -> u64 {
    12_000
}

fn default_max_attempts() -> u32 {
    4
}

fn default_base_backoff_ms() -> u64 {
    500
}

fn default_base_reconnect_ms() -> u64 {
    1_000
}

fn default_max_reconnect_delay_ms() -> u64 {
    30_000
}

fn default_socket_connect_timeout_ms() -> u64 {
    10_000
}

fn default_health_timeout_ms() -> u64 {
    4_000
}

fn default_collection() -> String {
    "channels".to_string()
}

fn default_topics() -> Vec<String> {
    DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: default_api_base_url(),
            socket_url: None,
            request_timeout_ms: default_request_timeout_ms(),
            max_attempts: default_max_attempts(),
            base_backoff_ms: default_base_backoff_ms(),
            max_backoff_ms: None,
            backoff_jitter: 0.0,
            base_reconnect_ms: default_base_reconnect_ms(),
            max_reconnect_delay_ms: default_max_reconnect_delay_ms(),
            socket_connect_timeout_ms: default_socket_connect_timeout_ms(),
            health_timeout_ms: default_health_timeout_ms(),
            state_dir: None,
            collection: default_collection(),
            topics: default_topics(),
            token: None,
            identity: None,
        }
    }
}

impl Config {
    /// Load and validate the configuration at `path`.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        Self::parse(&content)
    }

    /// Parse and validate configuration text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no component could work with.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.backoff_jitter) {
            return Err(Error::Config(format!(
                "backoff_jitter must be between 0 and 1, got {}",
                self.backoff_jitter
            )));
        }
        let timeouts = [
            ("request_timeout_ms", self.request_timeout_ms),
            ("base_reconnect_ms", self.base_reconnect_ms),
            ("max_reconnect_delay_ms", self.max_reconnect_delay_ms),
            ("socket_connect_timeout_ms", self.socket_connect_timeout_ms),
            ("health_timeout_ms", self.health_timeout_ms),
        ];
        if let Some((name, _)) = timeouts.iter().find(|(_, value)| *value == 0) {
            return Err(Error::Config(format!("{} must be greater than zero", name)));
        }
        if let Some(url) = &self.socket_url {
            if !url.starts_with("ws://") && !url.starts_with("wss://") {
                return Err(Error::Config(format!(
                    "socket_url must start with ws:// or wss://, got '{}'",
                    url
                )));
            }
        }
        if self.api_base_url.trim().is_empty() {
            return Err(Error::Config("api_base_url must not be empty".to_string()));
        }
        // Both live in the same state directory
        if self.collection == DRAFT_COLLECTION {
            return Err(Error::Config(format!(
                "collection '{}' is reserved for the draft",
                DRAFT_COLLECTION
            )));
        }
        Ok(())
    }

    /// Serialize for display, with the token masked.
    pub fn to_display_toml(&self) -> Result<String> {
        let mut shown = self.clone();
        if shown.token.is_some() {
            shown.token = Some("********".to_string());
        }
        shown.state_dir = Some(self.state_dir());
        toml::to_string_pretty(&shown)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))
    }

    /// Directory of the local store.
    pub fn state_dir(&self) -> PathBuf {
        match &self.state_dir {
            Some(dir) => dir.clone(),
            None => default_state_dir(),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        let policy = RetryPolicy::new()
            .with_max_attempts(self.max_attempts)
            .with_base_delay(Duration::from_millis(self.base_backoff_ms))
            .with_jitter(self.backoff_jitter);
        match self.max_backoff_ms {
            Some(cap) => policy.with_max_delay(Duration::from_millis(cap)),
            None => policy,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_millis(self.health_timeout_ms)
    }

    pub fn socket_config(&self) -> SocketConfig {
        SocketConfig {
            url: self.socket_url.clone(),
            base_delay: Duration::from_millis(self.base_reconnect_ms),
            max_delay: Duration::from_millis(self.max_reconnect_delay_ms),
            connect_timeout: Duration::from_millis(self.socket_connect_timeout_ms),
        }
    }

    /// Static session built from `token` and `identity`.
    pub fn session(&self) -> Arc<Session> {
        Arc::new(Session {
            token: self.token.clone(),
            identity: self.identity.clone(),
        })
    }
}

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}

/// Default directory of the local store.
pub fn default_state_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

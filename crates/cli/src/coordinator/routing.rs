// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The coordinator and the provenance types it returns.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use tether_core::{Fields, Origin, Record, RecordStatus};
use tracing::{debug, info, warn};

use super::wire::{ChannelList, RemoteChannel};
use crate::request::{HttpTransport, Request, RequestClient, RequestError, ReqwestTransport};
use crate::store::{FileBackend, OptimisticStore, SnapshotBackend, StoreError};
use crate::validate::{NoValidation, Validator};

const CHANNELS_PATH: &str = "/channels";
const HEALTH_PATH: &str = "/health";
const LOCAL_BINDING: &str = "bound to local record";

/// Error type for coordinator operations.
///
/// Remote failures never appear here for routed operations; they trigger
/// the local fallback instead.
#[derive(Debug, thiserror::Error)]
pub enum CoordinatorError {
    #[error("validation failed: {}", .0.join(" "))]
    Validation(Vec<String>),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("remote channel {remote} was forked locally as {local}\n  hint: address it by its local id with --local")]
    StaleBinding { remote: ChannelRef, local: ChannelRef },

    #[error("api unreachable: {0}")]
    Remote(#[from] RequestError),
}

/// Result type for coordinator operations.
pub type CoordinatorResult<T> = Result<T, CoordinatorError>;

/// Id/version space a reference belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Space {
    Remote,
    Local,
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Space::Remote => write!(f, "remote"),
            Space::Local => write!(f, "local"),
        }
    }
}

/// A channel id and the version last observed for it, in one space.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelRef {
    pub space: Space,
    pub id: String,
    pub version: u64,
}

impl ChannelRef {
    pub fn remote(id: impl Into<String>, version: u64) -> Self {
        ChannelRef {
            space: Space::Remote,
            id: id.into(),
            version,
        }
    }

    pub fn local(id: impl Into<String>, version: u64) -> Self {
        ChannelRef {
            space: Space::Local,
            id: id.into(),
            version,
        }
    }
}

impl fmt::Display for ChannelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v{} ({})", self.id, self.version, self.space)
    }
}

/// Where the result of an operation was decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    /// The API accepted the operation.
    Remote,
    /// The local store accepted the operation; nothing was synced.
    Local { cause: String },
}

impl Provenance {
    pub fn is_remote(&self) -> bool {
        matches!(self, Provenance::Remote)
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Provenance::Remote => "confirmed remotely",
            Provenance::Local { .. } => "accepted locally (pending sync)",
        }
    }
}

/// Result of a routed operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub value: T,
    pub provenance: Provenance,
    pub at: DateTime<Utc>,
}

impl<T> Outcome<T> {
    fn remote(value: T) -> Self {
        Outcome {
            value,
            provenance: Provenance::Remote,
            at: Utc::now(),
        }
    }

    fn local(value: T, cause: impl Into<String>) -> Self {
        Outcome {
            value,
            provenance: Provenance::Local {
                cause: cause.into(),
            },
            at: Utc::now(),
        }
    }
}

/// A channel as seen by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    pub binding: ChannelRef,
    pub status: RecordStatus,
    pub fields: Fields,
    /// Remote entity a local shadow was forked from.
    pub origin: Option<Origin>,
}

impl Channel {
    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(|v| v.as_str())
    }

    fn from_record(record: &Record) -> Self {
        Channel {
            binding: ChannelRef::local(&record.id, record.version),
            status: record.status,
            fields: record.fields.clone(),
            origin: record.origin.clone(),
        }
    }

    fn from_remote(mut remote: RemoteChannel, id: String, version: u64) -> Self {
        Channel {
            binding: ChannelRef::remote(id, version),
            status: remote.take_status(),
            fields: remote.fields,
            origin: None,
        }
    }
}

/// A recorded switch of one entity from the remote to the local space.
#[derive(Debug, Clone, PartialEq)]
pub struct Crossing {
    pub remote: ChannelRef,
    pub local: ChannelRef,
    pub cause: String,
    pub at: DateTime<Utc>,
}

/// Reachability of the API as last observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiState {
    Unknown,
    Online,
    Offline,
}

impl fmt::Display for ApiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiState::Unknown => write!(f, "unknown"),
            ApiState::Online => write!(f, "online"),
            ApiState::Offline => write!(f, "offline (local fallback)"),
        }
    }
}

/// Routes channel operations to the API, falling back to the local store.
pub struct Coordinator<T: HttpTransport = ReqwestTransport, B: SnapshotBackend = FileBackend> {
    client: RequestClient<T>,
    store: OptimisticStore<B>,
    validator: Box<dyn Validator>,
    health_timeout: Duration,
    api_state: ApiState,
    /// Last remote view of each remote channel, keyed by remote id.
    observed: HashMap<String, Channel>,
    crossings: Vec<Crossing>,
}

impl<T: HttpTransport, B: SnapshotBackend> Coordinator<T, B> {
    pub fn new(client: RequestClient<T>, store: OptimisticStore<B>) -> Self {
        Coordinator {
            client,
            store,
            validator: Box::new(NoValidation),
            health_timeout: Duration::from_millis(4000),
            api_state: ApiState::Unknown,
            observed: HashMap::new(),
            crossings: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    #[must_use]
    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    pub fn api_state(&self) -> ApiState {
        self.api_state
    }

    /// Every remote-to-local switch made by this coordinator, oldest first.
    pub fn crossings(&self) -> &[Crossing] {
        &self.crossings
    }

    pub fn store(&self) -> &OptimisticStore<B> {
        &self.store
    }

    pub fn client(&self) -> &RequestClient<T> {
        &self.client
    }

    /// Probe the API once, without retries.
    pub async fn health(&mut self) -> CoordinatorResult<ApiState> {
        let request = Request::get(HEALTH_PATH).with_timeout(self.health_timeout);
        match self.client.execute_once(&request).await {
            Ok(_) => {
                self.api_state = ApiState::Online;
                Ok(ApiState::Online)
            }
            Err(e) => {
                self.api_state = ApiState::Offline;
                Err(e.into())
            }
        }
    }

    /// All channels.
    pub async fn list(&mut self) -> CoordinatorResult<Outcome<Vec<Channel>>> {
        match self.remote::<ChannelList>(Request::get(CHANNELS_PATH)).await {
            Ok(list) => {
                let channels: Vec<Channel> = list
                    .channels
                    .into_iter()
                    .filter_map(|remote| {
                        let id = remote.channel_id.clone()?;
                        let version = remote.version.unwrap_or(1);
                        Some(Channel::from_remote(remote, id, version))
                    })
                    .collect();
                for channel in &channels {
                    self.observe(channel);
                }
                Ok(Outcome::remote(channels))
            }
            Err(e) => {
                let cause = self.fell_back("list", &e);
                let channels = self.store.list().iter().map(Channel::from_record).collect();
                Ok(Outcome::local(channels, cause))
            }
        }
    }

    /// Channels whose name, description, format or slug contains `query`.
    pub async fn search(&mut self, query: &str) -> CoordinatorResult<Outcome<Vec<Channel>>> {
        let needle = query.to_lowercase();
        let mut outcome = self.list().await?;
        outcome.value.retain(|channel| {
            ["name", "desc", "format", "slug"].iter().any(|key| {
                channel
                    .fields
                    .get(*key)
                    .and_then(|v| v.as_str())
                    .is_some_and(|s| s.to_lowercase().contains(&needle))
            })
        });
        Ok(outcome)
    }

    /// Create a channel.
    pub async fn create(&mut self, fields: Fields) -> CoordinatorResult<Outcome<Channel>> {
        self.check(&fields)?;

        let request = Request::post(CHANNELS_PATH).with_body(body(&fields, None)?);
        let result = self
            .remote::<RemoteChannel>(request)
            .await
            .and_then(|ack| with_id(ack, "create"));

        match result {
            Ok((mut ack, id)) => {
                let mut merged = fields;
                merged.append(&mut ack.fields);
                let channel = self.settle(id, ack.version.unwrap_or(1), merged);
                info!("created channel {}", channel.binding);
                Ok(Outcome::remote(channel))
            }
            Err(e) => {
                let cause = self.fell_back("create", &e);
                let record = self.store.create(fields)?;
                Ok(Outcome::local(Channel::from_record(&record), cause))
            }
        }
    }

    /// Update a channel the caller last saw at `binding.version`.
    pub async fn save(
        &mut self,
        binding: &ChannelRef,
        fields: Fields,
    ) -> CoordinatorResult<Outcome<Channel>> {
        self.check(&fields)?;

        if binding.space == Space::Local {
            let record = self.store.update(&binding.id, &fields, binding.version)?;
            return Ok(Outcome::local(Channel::from_record(&record), LOCAL_BINDING));
        }
        self.ensure_unshadowed(binding)?;

        let request = Request::put(format!("{}/{}", CHANNELS_PATH, binding.id))
            .with_expected_version(binding.version)
            .with_body(body(&fields, Some(binding.version))?);

        match self.remote::<RemoteChannel>(request).await {
            Ok(mut ack) => {
                let mut merged = self.observed_fields(&binding.id);
                merged.extend(fields);
                merged.append(&mut ack.fields);
                let version = ack.version.unwrap_or(binding.version + 1);
                let channel = self.settle(binding.id.clone(), version, merged);
                info!("saved channel {}", channel.binding);
                Ok(Outcome::remote(channel))
            }
            Err(e) => {
                let cause = self.fell_back("save", &e);
                let shadow = self.cross_to_local(binding, &fields, &cause)?;
                Ok(Outcome::local(Channel::from_record(&shadow), cause))
            }
        }
    }

    /// Copy a channel into a new one.
    pub async fn clone_channel(
        &mut self,
        binding: &ChannelRef,
    ) -> CoordinatorResult<Outcome<Channel>> {
        if binding.space == Space::Local {
            let record = self.store.clone_record(&binding.id)?;
            return Ok(Outcome::local(Channel::from_record(&record), LOCAL_BINDING));
        }
        self.ensure_unshadowed(binding)?;

        let request = Request::post(format!("{}/{}/clone", CHANNELS_PATH, binding.id));
        let result = self
            .remote::<RemoteChannel>(request)
            .await
            .and_then(|ack| with_id(ack, "clone"));

        match result {
            Ok((mut ack, id)) => {
                let mut fields = self.observed_fields(&binding.id);
                fields.append(&mut ack.fields);
                fields
                    .entry("status".to_string())
                    .or_insert_with(|| RecordStatus::Active.as_str().into());
                let channel = self.settle(id, ack.version.unwrap_or(1), fields);
                info!("cloned {} into {}", binding, channel.binding);
                Ok(Outcome::remote(channel))
            }
            Err(e) => {
                // The source is only read, so it stays bound to the remote space
                let cause = self.fell_back("clone", &e);
                let fields = self.observed_fields(&binding.id);
                let copy = self.store.create(fields)?;
                info!("cloned {} into {} locally", binding, copy.id);
                Ok(Outcome::local(Channel::from_record(&copy), cause))
            }
        }
    }

    /// Archive a channel the caller last saw at `binding.version`.
    pub async fn archive(&mut self, binding: &ChannelRef) -> CoordinatorResult<Outcome<Channel>> {
        if binding.space == Space::Local {
            let record = self.store.archive(&binding.id, binding.version)?;
            return Ok(Outcome::local(Channel::from_record(&record), LOCAL_BINDING));
        }
        self.ensure_unshadowed(binding)?;

        let request = Request::post(format!("{}/{}/archive", CHANNELS_PATH, binding.id));
        match self.remote::<RemoteChannel>(request).await {
            Ok(mut ack) => {
                let mut fields = self.observed_fields(&binding.id);
                fields.append(&mut ack.fields);
                fields.insert(
                    "status".to_string(),
                    RecordStatus::Archived.as_str().into(),
                );
                let version = ack.version.unwrap_or(binding.version + 1);
                let channel = self.settle(binding.id.clone(), version, fields);
                info!("archived channel {}", channel.binding);
                Ok(Outcome::remote(channel))
            }
            Err(e) => {
                let cause = self.fell_back("archive", &e);
                let shadow = self.cross_to_local(binding, &Fields::new(), &cause)?;
                let archived = self.store.archive(&shadow.id, shadow.version)?;
                Ok(Outcome::local(Channel::from_record(&archived), cause))
            }
        }
    }

    /// Record the remote view of a channel after a successful operation.
    ///
    /// A `status` key in `fields` becomes the channel status; otherwise the
    /// previously observed status is kept.
    fn settle(&mut self, id: String, version: u64, mut fields: Fields) -> Channel {
        let status = match fields.remove("status") {
            Some(value) => value
                .as_str()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            None => self.observed_status(&id),
        };
        let channel = Channel {
            binding: ChannelRef::remote(id, version),
            status,
            fields,
            origin: None,
        };
        self.observe(&channel);
        channel
    }

    async fn remote<R: DeserializeOwned>(&mut self, request: Request) -> Result<R, RequestError> {
        let response = self.client.execute(&request).await?;
        let decoded = response.json()?;
        self.api_state = ApiState::Online;
        Ok(decoded)
    }

    fn check(&self, fields: &Fields) -> CoordinatorResult<()> {
        let errors = self.validator.validate(fields);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(CoordinatorError::Validation(errors))
        }
    }

    fn ensure_unshadowed(&self, binding: &ChannelRef) -> CoordinatorResult<()> {
        match self.store.find_by_origin(&binding.id) {
            Some(shadow) => Err(CoordinatorError::StaleBinding {
                remote: binding.clone(),
                local: ChannelRef::local(&shadow.id, shadow.version),
            }),
            None => Ok(()),
        }
    }

    fn fell_back(&mut self, operation: &str, error: &RequestError) -> String {
        self.api_state = ApiState::Offline;
        warn!("{} fell back to local store: {}", operation, error);
        error.to_string()
    }

    /// Fork a local shadow of a remote channel with `fields` applied.
    fn cross_to_local(
        &mut self,
        binding: &ChannelRef,
        fields: &Fields,
        cause: &str,
    ) -> CoordinatorResult<Record> {
        let mut base = self.observed_fields(&binding.id);
        base.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        let origin = Origin {
            id: binding.id.clone(),
            version: binding.version,
        };
        let shadow = self.store.create_shadow(base, origin)?;

        let crossing = Crossing {
            remote: binding.clone(),
            local: ChannelRef::local(&shadow.id, shadow.version),
            cause: cause.to_string(),
            at: Utc::now(),
        };
        warn!("{} now bound to {}", crossing.remote, crossing.local);
        self.crossings.push(crossing);
        Ok(shadow)
    }

    fn observe(&mut self, channel: &Channel) {
        debug!("observed {}", channel.binding);
        self.observed
            .insert(channel.binding.id.clone(), channel.clone());
    }

    fn observed_fields(&self, id: &str) -> Fields {
        self.observed
            .get(id)
            .map(|c| c.fields.clone())
            .unwrap_or_default()
    }

    fn observed_status(&self, id: &str) -> RecordStatus {
        self.observed.get(id).map(|c| c.status).unwrap_or_default()
    }
}

fn body(fields: &Fields, version: Option<u64>) -> CoordinatorResult<serde_json::Value> {
    serde_json::to_value(RemoteChannel::body(fields, version))
        .map_err(|e| CoordinatorError::Remote(e.into()))
}

/// Pairs an acknowledgement with the channel id it must carry.
fn with_id(ack: RemoteChannel, operation: &str) -> Result<(RemoteChannel, String), RequestError> {
    match ack.channel_id.clone() {
        Some(id) => Ok((ack, id)),
        None => Err(RequestError::Payload(serde::de::Error::custom(format!(
            "{} response has no channelId",
            operation
        )))),
    }
}

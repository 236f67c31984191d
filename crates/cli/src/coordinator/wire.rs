// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSON shapes exchanged with the channel API.

use serde::{Deserialize, Serialize};
use tether_core::{Fields, RecordStatus};

/// A channel as the API sends and receives it: `{channelId, version, ...fields}`.
///
/// Acknowledgements may omit any part, so every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteChannel {
    #[serde(rename = "channelId", default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    #[serde(flatten)]
    pub fields: Fields,
}

impl RemoteChannel {
    /// Request body carrying `fields` and, for updates, the expected version.
    pub fn body(fields: &Fields, version: Option<u64>) -> Self {
        RemoteChannel {
            channel_id: None,
            version,
            fields: fields.clone(),
        }
    }

    /// Splits the lifecycle status out of the field map.
    ///
    /// Unknown or missing statuses read as active.
    pub fn take_status(&mut self) -> RecordStatus {
        self.fields
            .remove("status")
            .and_then(|v| v.as_str().and_then(|s| s.parse().ok()))
            .unwrap_or_default()
    }
}

/// Response of `GET /channels`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelList {
    #[serde(default)]
    pub channels: Vec<RemoteChannel>,
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket protocol messages for the reconnecting socket.
//!
//! The protocol is small:
//! - Client sends subscribe requests and heartbeat replies
//! - Server sends a bare `ping` sentinel to probe liveness; every other
//!   inbound payload is an opaque application event

use serde::{Deserialize, Serialize};

/// Reserved non-JSON payload the server sends to ask "are you alive".
pub const HEARTBEAT_SENTINEL: &str = "ping";

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Ask the server to push events for a topic.
    ///
    /// The server forgets subscriptions across connections, so these are
    /// resent after every successful open.
    Subscribe {
        /// Topic name.
        topic: String,
    },

    /// Liveness reply to a heartbeat sentinel.
    Pong {
        /// Client wall clock in milliseconds since the Unix epoch.
        ts: i64,
    },
}

impl ClientFrame {
    /// Creates a Subscribe message.
    pub fn subscribe(topic: impl Into<String>) -> Self {
        ClientFrame::Subscribe {
            topic: topic.into(),
        }
    }

    /// Creates a Pong message with the given timestamp.
    pub fn pong(ts: i64) -> Self {
        ClientFrame::Pong { ts }
    }

    /// Creates a Pong message stamped with the current time.
    pub fn pong_now() -> Self {
        ClientFrame::pong(chrono::Utc::now().timestamp_millis())
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Classification of a text payload received from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    /// The heartbeat sentinel; must be answered with a pong.
    Heartbeat,
    /// Anything else, handed to the application untouched.
    Event(String),
}

impl InboundFrame {
    /// Classifies a raw text payload.
    pub fn classify(text: &str) -> Self {
        if text == HEARTBEAT_SENTINEL {
            InboundFrame::Heartbeat
        } else {
            InboundFrame::Event(text.to_string())
        }
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;

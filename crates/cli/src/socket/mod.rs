// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Persistent push connection with automatic reconnect.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐ commands ┌────────────────────┐     ┌─────────────────┐
//! │ SocketHandle │─────────►│ ReconnectingSocket │────►│ SocketTransport │
//! └──────────────┘          │  (driver task)     │◄────│     (trait)     │
//!        ▲                  └────────────────────┘     └─────────────────┘
//!        │ watch<SocketState>     │ mpsc<String>
//!        └────────────────────────┴──► application events
//! ```
//!
//! # Features
//!
//! - Explicit state machine: Disabled, Disconnected, Connecting, Connected,
//!   Reconnecting
//! - Reconnect backoff `min(base * 2^attempt, cap)`, reset on open
//! - Topic set survives reconnects and is resent after every open
//! - Heartbeat sentinel answered with a timestamped pong
//! - Injectable transport trait for testing

mod handle;
mod machine;
mod reconnect;
mod transport;

pub use handle::{HandleError, SocketHandle, SocketTask};
pub use machine::{next, reconnect_delay, SocketState, Transition};
pub use reconnect::{ReconnectingSocket, SocketConfig};
pub use transport::{
    SocketTransport, TransportError, TransportResult, WebSocketTransport, HEADER_IDENTITY,
};




#[cfg(test)]
pub(crate) mod transport_tests;

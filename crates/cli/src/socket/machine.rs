// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connection state machine.

use std::fmt;
use std::time::Duration;

use tether_core::backoff;

/// Lifecycle state of the reconnecting socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketState {
    /// No endpoint configured. Terminal.
    Disabled,
    Disconnected,
    Connecting,
    Connected,
    /// Waiting for the reconnect timer.
    Reconnecting,
}

impl SocketState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SocketState::Disabled => "disabled",
            SocketState::Disconnected => "disconnected",
            SocketState::Connecting => "connecting",
            SocketState::Connected => "connected",
            SocketState::Reconnecting => "reconnecting",
        }
    }
}

impl fmt::Display for SocketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Events that drive the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Caller asked to connect.
    Connect,
    /// Handshake completed.
    Opened,
    /// Handshake failed or the connection closed.
    Failed,
    /// Reconnect timer expired.
    TimerFired,
    /// Caller forced an immediate reconnect.
    ManualReconnect,
    /// Caller shut the socket down.
    Close,
}

/// Returns the state reached from `state` on `transition`, or `None` when
/// the transition does not apply.
pub fn next(state: SocketState, transition: Transition) -> Option<SocketState> {
    use SocketState::*;
    use Transition::*;

    match (state, transition) {
        (Disabled, _) => None,
        (Disconnected, Connect) => Some(Connecting),
        (Connecting, Opened) => Some(Connected),
        (Connecting | Connected, Failed) => Some(Reconnecting),
        (Reconnecting, TimerFired) => Some(Connecting),
        (_, ManualReconnect) => Some(Connecting),
        (Disconnected, Close) => None,
        (_, Close) => Some(Disconnected),
        _ => None,
    }
}

/// Delay before reconnect cycle `attempt` (1-based): `min(base * 2^attempt, cap)`.
pub fn reconnect_delay(attempt: u32, base: Duration, cap: Duration) -> Duration {
    backoff::exponential(base, attempt, Some(cap))
}

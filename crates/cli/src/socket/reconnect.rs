// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The reconnecting socket itself.
//!
//! All lifecycle changes go through [`machine::next`]; the socket only
//! performs the side effects attached to each transition.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tether_core::{ClientFrame, InboundFrame, SessionProvider};
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::machine::{self, SocketState, Transition};
use super::transport::{SocketTransport, TransportError, TransportResult, WebSocketTransport};

/// Configuration for the reconnecting socket.
#[derive(Debug, Clone, PartialEq)]
pub struct SocketConfig {
    /// Endpoint; `None` leaves the socket permanently disabled.
    pub url: Option<String>,
    /// Reconnect backoff base.
    pub base_delay: Duration,
    /// Reconnect backoff cap.
    pub max_delay: Duration,
    /// Deadline for a single handshake.
    pub connect_timeout: Duration,
}

impl Default for SocketConfig {
    fn default() -> Self {
        SocketConfig {
            url: None,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(30_000),
            connect_timeout: Duration::from_millis(10_000),
        }
    }
}

/// One logical persistent connection with reconnect and resubscribe.
pub struct ReconnectingSocket<T: SocketTransport = WebSocketTransport> {
    config: SocketConfig,
    transport: T,
    session: Arc<dyn SessionProvider>,
    state: SocketState,
    /// Failed connection cycles since the last successful open.
    attempt: u32,
    subscriptions: BTreeSet<String>,
    reconnect_at: Option<Instant>,
    state_tx: watch::Sender<SocketState>,
    events: mpsc::Sender<String>,
}

impl<T: SocketTransport> ReconnectingSocket<T> {
    /// Create a socket; application events are delivered on `events`.
    pub fn new(
        config: SocketConfig,
        transport: T,
        session: Arc<dyn SessionProvider>,
        events: mpsc::Sender<String>,
    ) -> Self {
        let state = if config.url.is_some() {
            SocketState::Disconnected
        } else {
            SocketState::Disabled
        };
        let (state_tx, _) = watch::channel(state);

        ReconnectingSocket {
            config,
            transport,
            session,
            state,
            attempt: 0,
            subscriptions: BTreeSet::new(),
            reconnect_at: None,
            state_tx,
            events,
        }
    }

    pub fn state(&self) -> SocketState {
        self.state
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn subscriptions(&self) -> impl Iterator<Item = &str> {
        self.subscriptions.iter().map(String::as_str)
    }

    /// Subscribe to state changes.
    pub fn watch(&self) -> watch::Receiver<SocketState> {
        self.state_tx.subscribe()
    }

    /// When the scheduled reconnect is due, if one is pending.
    pub fn pending_reconnect(&self) -> Option<Instant> {
        self.reconnect_at
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn apply(&mut self, transition: Transition) -> bool {
        let Some(next) = machine::next(self.state, transition) else {
            return false;
        };
        if next != self.state {
            debug!("socket {} -> {} ({:?})", self.state, next, transition);
        }
        self.state = next;
        self.state_tx.send_replace(next);
        true
    }

    /// Start connecting. A no-op unless the socket is disconnected.
    pub async fn connect(&mut self) {
        if self.apply(Transition::Connect) {
            self.open().await;
        }
    }

    /// Add a topic; sent now if connected, otherwise on the next open.
    pub async fn subscribe(&mut self, topic: impl Into<String>) {
        let topic = topic.into();
        if !self.subscriptions.insert(topic.clone()) {
            return;
        }
        if self.state == SocketState::Connected {
            if let Err(e) = self.send_frame(&ClientFrame::subscribe(topic)).await {
                self.on_failure(&e.to_string()).await;
            }
        }
    }

    /// Drop any live connection and connect again immediately.
    pub async fn reconnect_now(&mut self) {
        if self.state == SocketState::Disabled {
            return;
        }
        self.drop_connection().await;
        self.attempt = 0;
        self.reconnect_at = None;
        if self.apply(Transition::ManualReconnect) {
            info!("manual reconnect");
            self.open().await;
        }
    }

    /// Fire the reconnect timer if the socket is waiting on it.
    pub async fn fire_timer(&mut self) {
        self.reconnect_at = None;
        if self.apply(Transition::TimerFired) {
            self.open().await;
        }
    }

    /// Close the connection and cancel any pending reconnect.
    pub async fn close(&mut self) {
        self.drop_connection().await;
        self.reconnect_at = None;
        self.apply(Transition::Close);
    }

    /// Receive the next inbound frame from the live connection.
    pub async fn recv(&mut self) -> TransportResult<Option<String>> {
        self.transport.recv().await
    }

    /// React to the outcome of [`recv`](Self::recv).
    pub async fn on_inbound(&mut self, inbound: TransportResult<Option<String>>) {
        match inbound {
            Ok(Some(text)) => self.handle_frame(&text).await,
            Ok(None) => self.on_failure("connection closed").await,
            Err(e) => self.on_failure(&e.to_string()).await,
        }
    }

    /// Answer heartbeats and hand every other payload to the application.
    pub async fn handle_frame(&mut self, text: &str) {
        match InboundFrame::classify(text) {
            InboundFrame::Heartbeat => {
                if let Err(e) = self.send_frame(&ClientFrame::pong_now()).await {
                    self.on_failure(&e.to_string()).await;
                }
            }
            InboundFrame::Event(payload) => match self.events.try_send(payload) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!("event consumer is behind, dropping event");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    debug!("event consumer gone, dropping event");
                }
            },
        }
    }

    async fn drop_connection(&mut self) {
        if let Err(e) = self.transport.disconnect().await {
            debug!("socket disconnect failed: {}", e);
        }
    }

    async fn open(&mut self) {
        let Some(url) = self.config.url.clone() else {
            return;
        };
        let session = self.session.session();
        debug!("connecting to {} (attempt {})", url, self.attempt + 1);

        let result = tokio::time::timeout(
            self.config.connect_timeout,
            self.transport.connect(&url, session),
        )
        .await;

        match result {
            Ok(Ok(())) => self.on_open().await,
            Ok(Err(e)) => self.on_failure(&e.to_string()).await,
            Err(_) => self.on_failure("handshake timed out").await,
        }
    }

    async fn on_open(&mut self) {
        if !self.apply(Transition::Opened) {
            return;
        }
        self.attempt = 0;
        self.reconnect_at = None;
        info!("socket connected");

        let topics: Vec<String> = self.subscriptions.iter().cloned().collect();
        for topic in topics {
            if let Err(e) = self.send_frame(&ClientFrame::subscribe(topic)).await {
                self.on_failure(&e.to_string()).await;
                return;
            }
        }
    }

    async fn on_failure(&mut self, reason: &str) {
        if !self.apply(Transition::Failed) {
            return;
        }
        self.drop_connection().await;
        self.attempt = self.attempt.saturating_add(1);
        let delay =
            machine::reconnect_delay(self.attempt, self.config.base_delay, self.config.max_delay);
        self.reconnect_at = Some(Instant::now() + delay);
        warn!(
            "socket failure ({}), reconnect {} in {}ms",
            reason,
            self.attempt,
            delay.as_millis()
        );
    }

    async fn send_frame(&mut self, frame: &ClientFrame) -> TransportResult<()> {
        let json = frame
            .to_json()
            .map_err(|e| TransportError::SendFailed(format!("encode: {}", e)))?;
        self.transport.send(json).await
    }
}

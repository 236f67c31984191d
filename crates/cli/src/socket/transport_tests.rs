// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the transport module.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::transport::{SocketTransport, TransportError, TransportResult};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use tether_core::Session;
use tokio::sync::mpsc;

/// Scripted outcome of one connect call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    Accept,
    Refuse,
    /// Never completes; exercises the handshake deadline.
    Hang,
}

#[derive(Default)]
struct Shared {
    connected: bool,
    outcomes: VecDeque<ConnectOutcome>,
    connects: u32,
    sessions: Vec<Session>,
    sent: Vec<String>,
    failing_disconnects: bool,
}

/// Mock transport for testing without real sockets.
pub struct MockSocketTransport {
    shared: Arc<Mutex<Shared>>,
    /// Frames pushed by the test; `None` means the server closed.
    incoming: mpsc::UnboundedReceiver<Option<String>>,
}

/// Test-side controller for a [`MockSocketTransport`].
#[derive(Clone)]
pub struct MockServer {
    shared: Arc<Mutex<Shared>>,
    incoming: mpsc::UnboundedSender<Option<String>>,
}

/// Create a connected mock transport/server pair.
pub fn mock_socket() -> (MockSocketTransport, MockServer) {
    let shared = Arc::new(Mutex::new(Shared::default()));
    let (tx, rx) = mpsc::unbounded_channel();
    (
        MockSocketTransport {
            shared: Arc::clone(&shared),
            incoming: rx,
        },
        MockServer {
            shared,
            incoming: tx,
        },
    )
}

impl MockServer {
    /// Script the next connect outcomes. Unscripted connects are accepted.
    pub fn script(&self, outcomes: &[ConnectOutcome]) {
        self.shared
            .lock()
            .unwrap()
            .outcomes
            .extend(outcomes.iter().copied());
    }

    /// Deliver a text frame to the client.
    pub fn push(&self, text: &str) {
        self.incoming.send(Some(text.to_string())).unwrap();
    }

    /// Close the connection from the server side.
    pub fn hang_up(&self) {
        self.incoming.send(None).unwrap();
    }

    /// Frames the client has sent, oldest first.
    pub fn sent(&self) -> Vec<String> {
        self.shared.lock().unwrap().sent.clone()
    }

    pub fn clear_sent(&self) {
        self.shared.lock().unwrap().sent.clear();
    }

    pub fn connects(&self) -> u32 {
        self.shared.lock().unwrap().connects
    }

    pub fn sessions(&self) -> Vec<Session> {
        self.shared.lock().unwrap().sessions.clone()
    }

    /// Make every later disconnect report an error after closing.
    pub fn fail_disconnects(&self) {
        self.shared.lock().unwrap().failing_disconnects = true;
    }

    pub fn is_connected(&self) -> bool {
        self.shared.lock().unwrap().connected
    }
}

impl SocketTransport for MockSocketTransport {
    fn connect(
        &mut self,
        _url: &str,
        session: Session,
    ) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>> {
        let outcome = {
            let mut shared = self.shared.lock().unwrap();
            shared.connects += 1;
            shared.sessions.push(session);
            shared.outcomes.pop_front().unwrap_or(ConnectOutcome::Accept)
        };
        let shared = Arc::clone(&self.shared);
        Box::pin(async move {
            match outcome {
                ConnectOutcome::Accept => {
                    shared.lock().unwrap().connected = true;
                    Ok(())
                }
                ConnectOutcome::Refuse => {
                    Err(TransportError::ConnectionFailed("mock refusal".into()))
                }
                ConnectOutcome::Hang => std::future::pending().await,
            }
        })
    }

    fn disconnect(&mut self) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>> {
        let shared = Arc::clone(&self.shared);
        Box::pin(async move {
            let mut shared = shared.lock().unwrap();
            shared.connected = false;
            if shared.failing_disconnects {
                return Err(TransportError::ConnectionFailed("mock close error".into()));
            }
            Ok(())
        })
    }

    fn send(
        &mut self,
        text: String,
    ) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>> {
        let shared = Arc::clone(&self.shared);
        Box::pin(async move {
            let mut shared = shared.lock().unwrap();
            if !shared.connected {
                return Err(TransportError::ConnectionClosed);
            }
            shared.sent.push(text);
            Ok(())
        })
    }

    fn recv(
        &mut self,
    ) -> Pin<Box<dyn Future<Output = TransportResult<Option<String>>> + Send + '_>> {
        Box::pin(async move {
            match self.incoming.recv().await {
                Some(Some(text)) => Ok(Some(text)),
                Some(None) => {
                    self.shared.lock().unwrap().connected = false;
                    Ok(None)
                }
                None => std::future::pending().await,
            }
        })
    }

    fn is_connected(&self) -> bool {
        self.shared.lock().unwrap().connected
    }
}

#[tokio::test]
async fn test_mock_transport_connect() {
    let (mut transport, server) = mock_socket();
    assert!(!transport.is_connected());

    transport
        .connect("ws://localhost:1234", Session::anonymous())
        .await
        .unwrap();
    assert!(transport.is_connected());
    assert_eq!(server.connects(), 1);

    transport.disconnect().await.unwrap();
    assert!(!transport.is_connected());
}

#[tokio::test]
async fn test_mock_transport_refusal() {
    let (mut transport, server) = mock_socket();
    server.script(&[ConnectOutcome::Refuse]);

    let result = transport.connect("ws://x", Session::anonymous()).await;
    assert!(matches!(result, Err(TransportError::ConnectionFailed(_))));
    assert!(!transport.is_connected());
}

#[tokio::test]
async fn test_mock_transport_send_recv() {
    let (mut transport, server) = mock_socket();
    transport.connect("ws://x", Session::anonymous()).await.unwrap();

    transport.send("hello".into()).await.unwrap();
    assert_eq!(server.sent(), vec!["hello".to_string()]);

    server.push("ping");
    assert_eq!(transport.recv().await.unwrap(), Some("ping".to_string()));

    server.hang_up();
    assert_eq!(transport.recv().await.unwrap(), None);
    assert!(!transport.is_connected());
}

#[tokio::test]
async fn test_mock_transport_send_when_closed() {
    let (mut transport, _server) = mock_socket();
    let result = transport.send("x".into()).await;
    assert!(matches!(result, Err(TransportError::ConnectionClosed)));
}

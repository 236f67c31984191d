// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::Arc;

use tether_core::{ClientFrame, Session};

use super::*;
use crate::socket::transport_tests::mock_socket;
use crate::socket::SocketConfig;

#[tokio::test(start_paused = true)]
async fn prints_events_until_deadline() {
    let (transport, server) = mock_socket();
    let (events_tx, events) = mpsc::channel(8);
    let socket = ReconnectingSocket::new(
        SocketConfig {
            url: Some("ws://127.0.0.1:9/ws".into()),
            ..Default::default()
        },
        transport,
        Arc::new(Session::anonymous()),
        events_tx,
    );
    server.push(r#"{"topic":"alerts","level":"warn"}"#);
    server.push(r#"{"topic":"alerts","level":"info"}"#);

    let topics = vec!["alerts".to_string()];
    let received = run_impl(socket, events, &topics, Some(Duration::from_secs(5)))
        .await
        .unwrap();

    assert_eq!(received, 2);
    assert_eq!(server.connects(), 1);
    assert!(!server.is_connected());
    let subscribe = ClientFrame::subscribe("alerts").to_json().unwrap();
    assert!(server.sent().contains(&subscribe));
}

#[tokio::test]
async fn disabled_socket_is_rejected() {
    let err = run(vec![], Some(1), &Config::default()).await.unwrap_err();
    assert!(matches!(err, Error::SocketDisabled));
}

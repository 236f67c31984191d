// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::info;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::socket::{ReconnectingSocket, SocketHandle, SocketTransport, WebSocketTransport};

/// Capacity of the inbound event queue.
const EVENT_QUEUE: usize = 256;

/// Follow realtime topics until interrupted or `for_secs` elapses.
pub async fn run(topics: Vec<String>, for_secs: Option<u64>, config: &Config) -> Result<()> {
    if config.socket_url.is_none() {
        return Err(Error::SocketDisabled);
    }
    let topics = if topics.is_empty() {
        config.topics.clone()
    } else {
        topics
    };

    let (events_tx, events) = mpsc::channel(EVENT_QUEUE);
    let socket = ReconnectingSocket::new(
        config.socket_config(),
        WebSocketTransport::new(),
        config.session(),
        events_tx,
    );
    let received = run_impl(socket, events, &topics, for_secs.map(Duration::from_secs)).await?;
    info!("watch finished after {} events", received);
    Ok(())
}

/// Drive `socket` and print events; returns the number of events seen.
pub(crate) async fn run_impl<T: SocketTransport + 'static>(
    socket: ReconnectingSocket<T>,
    mut events: mpsc::Receiver<String>,
    topics: &[String],
    limit: Option<Duration>,
) -> Result<usize> {
    let (handle, task) = SocketHandle::spawn(socket);
    let mut state = handle.state();

    for topic in topics {
        handle.subscribe(topic.as_str()).await?;
    }
    handle.connect().await?;

    let deadline = limit.map(|d| Instant::now() + d);
    let mut received = 0;
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => {
                    println!("{}", event);
                    received += 1;
                }
                None => break,
            },
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = *state.borrow_and_update();
                println!("[socket] {}", current);
            }
            _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => break,
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    handle.shutdown().await?;
    task.join().await?;
    Ok(received)
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Background driver task for a [`ReconnectingSocket`].
//!
//! The driver owns the socket and multiplexes three wake sources on one
//! task: caller commands, inbound frames and the reconnect timer.

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::machine::SocketState;
use super::reconnect::ReconnectingSocket;
use super::transport::{SocketTransport, TransportResult};

/// Error returned once the driver task has stopped.
#[derive(Debug, thiserror::Error)]
pub enum HandleError {
    #[error("socket driver has stopped")]
    Stopped,
}

#[derive(Debug)]
enum Command {
    Connect,
    Subscribe(String),
    ReconnectNow,
    Shutdown,
}

/// Cloneable control surface for a spawned socket.
#[derive(Clone)]
pub struct SocketHandle {
    commands: mpsc::Sender<Command>,
    state: watch::Receiver<SocketState>,
}

/// Join handle of the driver task.
pub struct SocketTask(JoinHandle<()>);

impl SocketTask {
    /// Wait for the driver to finish.
    pub async fn join(self) -> Result<(), HandleError> {
        self.0.await.map_err(|_| HandleError::Stopped)
    }
}

impl SocketHandle {
    /// Move `socket` onto a background task and return its handle.
    pub fn spawn<T: SocketTransport + 'static>(socket: ReconnectingSocket<T>) -> (Self, SocketTask) {
        let (commands, rx) = mpsc::channel(32);
        let state = socket.watch();
        let task = tokio::spawn(drive(socket, rx));
        (SocketHandle { commands, state }, SocketTask(task))
    }

    /// Subscribe to state changes.
    pub fn state(&self) -> watch::Receiver<SocketState> {
        self.state.clone()
    }

    pub async fn connect(&self) -> Result<(), HandleError> {
        self.send(Command::Connect).await
    }

    pub async fn subscribe(&self, topic: impl Into<String>) -> Result<(), HandleError> {
        self.send(Command::Subscribe(topic.into())).await
    }

    pub async fn reconnect_now(&self) -> Result<(), HandleError> {
        self.send(Command::ReconnectNow).await
    }

    /// Ask the driver to close the connection and exit.
    pub async fn shutdown(&self) -> Result<(), HandleError> {
        self.send(Command::Shutdown).await
    }

    async fn send(&self, command: Command) -> Result<(), HandleError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| HandleError::Stopped)
    }
}

enum Wake {
    Command(Option<Command>),
    Inbound(TransportResult<Option<String>>),
    Timer,
}

async fn drive<T: SocketTransport>(
    mut socket: ReconnectingSocket<T>,
    mut commands: mpsc::Receiver<Command>,
) {
    loop {
        let connected = socket.state() == SocketState::Connected;
        let due = socket.pending_reconnect();

        let wake = tokio::select! {
            command = commands.recv() => Wake::Command(command),
            inbound = socket.recv(), if connected => Wake::Inbound(inbound),
            _ = tokio::time::sleep_until(due.unwrap_or_else(Instant::now)), if due.is_some() => {
                Wake::Timer
            }
        };

        match wake {
            Wake::Command(Some(Command::Connect)) => socket.connect().await,
            Wake::Command(Some(Command::Subscribe(topic))) => socket.subscribe(topic).await,
            Wake::Command(Some(Command::ReconnectNow)) => socket.reconnect_now().await,
            Wake::Command(Some(Command::Shutdown) | None) => {
                socket.close().await;
                break;
            }
            Wake::Inbound(inbound) => socket.on_inbound(inbound).await,
            Wake::Timer => socket.fire_timer().await,
        }
    }
}

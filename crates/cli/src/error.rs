// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::coordinator::CoordinatorError;
use crate::request::RequestError;
use crate::socket::HandleError;
use crate::store::StoreError;

/// Errors surfaced by the `tether` command line.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid field '{0}'\n  hint: fields are given as --field key=value")]
    InvalidField(String),

    #[error("no socket endpoint configured\n  hint: set socket_url in the config file or pass --socket")]
    SocketDisabled,

    #[error("no draft saved")]
    NoDraft,

    #[error(transparent)]
    Coordinator(#[from] CoordinatorError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Socket(#[from] HandleError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;

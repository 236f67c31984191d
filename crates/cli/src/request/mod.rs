// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Request/response exchange with the remote API.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────┐     ┌───────────────┐     ┌─────────────┐
//! │ RequestClient │────►│ HttpTransport │────►│  Remote API │
//! │  (retry loop) │◄────│    (trait)    │◄────│             │
//! └───────────────┘     └───────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌───────────────┐
//! │  RetryState   │  (one per logical request)
//! └───────────────┘
//! ```
//!
//! # Features
//!
//! - Per-attempt deadline; an expired attempt is cancelled and retried
//! - 5xx/429 and network failures are retried, other statuses are terminal
//! - Exponential backoff from a base delay, optional cap and jitter
//! - One idempotency key per logical request, fresh trace id per attempt
//! - Injectable transport trait for testing

mod client;
mod retry;
mod transport;

pub use client::{
    ErrorKind, Request, RequestClient, RequestError, RequestResult, Response, HEADER_IDEMPOTENCY_KEY,
    HEADER_IF_MATCH, HEADER_REQUEST_ID,
};
pub use retry::{RetryDecision, RetryPolicy, RetryState};
pub use transport::{
    HttpRequest, HttpResponse, HttpTransport, Method, ReqwestTransport, TransportError,
    TransportResult,
};

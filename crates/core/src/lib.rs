// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! tether-core: Shared data model for the tether client.
//!
//! This crate provides the record types, socket wire messages, session
//! abstraction and backoff arithmetic used by the request client, the
//! reconnecting socket and the local optimistic store.

pub mod backoff;
pub mod error;
pub mod protocol;
pub mod record;
pub mod session;

pub use error::{Error, Result};
pub use protocol::{ClientFrame, InboundFrame, HEARTBEAT_SENTINEL};
pub use record::{Fields, Origin, Record, RecordStatus};
pub use session::{Session, SessionProvider};

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote-first channel operations with local fallback.
//!
//! Every operation is tried against the API first. When the request client
//! gives up, the same intent is applied to the local store and the result
//! is tagged with [`Provenance::Local`].
//!
//! A channel reference names exactly one id/version space. When a save or
//! archive on a remote-bound channel falls back, the coordinator forks a local
//! *shadow* record that remembers its remote origin; later operations must use
//! the shadow's local reference.

mod routing;
mod wire;

pub use routing::{
    ApiState, Channel, ChannelRef, Coordinator, CoordinatorError, CoordinatorResult, Crossing,
    Outcome, Provenance, Space,
};
pub use wire::{ChannelList, RemoteChannel};

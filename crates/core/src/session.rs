// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Session credentials supplied by an authentication collaborator.
//!
//! The request client and the socket only read the session; they never
//! refresh or mutate it.

use serde::{Deserialize, Serialize};

/// Bearer token and identity of the current user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    pub identity: Option<String>,
}

impl Session {
    /// Anonymous session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Returns the `Authorization` header value, if a token is present.
    pub fn bearer(&self) -> Option<String> {
        self.token
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(|t| format!("Bearer {}", t))
    }
}

/// Source of the current session.
pub trait SessionProvider: Send + Sync {
    /// Returns a snapshot of the current session.
    fn session(&self) -> Session;
}

impl SessionProvider for Session {
    fn session(&self) -> Session {
        self.clone()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Version-stamped records shared by the remote and local record spaces.
//!
//! A record is created at version 1. Every accepted update yields a new
//! record value at `version + 1` that replaces the previous one as a unit.
//! Records are never removed; archival is a status transition.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Opaque field map carried by a record.
pub type Fields = BTreeMap<String, serde_json::Value>;

/// Lifecycle status of a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// Live record. Initial state for new records.
    #[default]
    Active,
    /// Archived record. Still stored, still versioned.
    Archived,
}

impl RecordStatus {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Active => "active",
            RecordStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "active" => Ok(RecordStatus::Active),
            "archived" => Ok(RecordStatus::Archived),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }
}

/// Remote binding a local record was forked from.
///
/// Present only on records created when an operation on a remote-bound
/// entity fell back to the local store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    /// Remote id of the entity.
    pub id: String,
    /// Last remote version observed before the fallback.
    pub version: u64,
}

/// A versioned record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub version: u64,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default)]
    pub fields: Fields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
}

impl Record {
    /// Creates a fresh record at version 1.
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Record {
            id: id.into(),
            version: 1,
            status: RecordStatus::Active,
            fields,
            origin: None,
        }
    }

    /// Marks the record as forked from a remote binding.
    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Returns the successor of this record with `fields` merged in.
    ///
    /// Keys present in `fields` overwrite existing values; other keys are kept.
    pub fn merged(&self, fields: &Fields) -> Record {
        let mut next = self.clone();
        next.fields
            .extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        next.version = self.version + 1;
        next
    }

    /// Returns the successor of this record with a new status.
    pub fn with_status(&self, status: RecordStatus) -> Record {
        let mut next = self.clone();
        next.status = status;
        next.version = self.version + 1;
        next
    }

    /// Returns a string field, if present and a string.
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(|v| v.as_str())
    }

    /// Display name of the record, if it has one.
    pub fn name(&self) -> Option<&str> {
        self.field_str("name")
    }

    /// Checks the structural invariants of a record read from storage.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::InvalidRecord("id must not be empty".to_string()));
        }
        if self.version == 0 {
            return Err(Error::InvalidRecord(format!(
                "{}: version must be positive",
                self.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;

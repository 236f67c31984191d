// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Field validation applied before a channel operation leaves the process.

use std::sync::LazyLock;

use regex::Regex;
use tether_core::Fields;

pub const MIN_NAME_LENGTH: usize = 3;
pub const MIN_TIMEZONE_LENGTH: usize = 2;
pub const MODES: &[&str] = &["public", "private", "premium"];
pub const OUTPUT_PROFILES: &[&str] = &["SD", "HD", "FHD", "UHD"];

// Compile-time constant pattern, verified at test time.
static SLUG_RE: LazyLock<Regex> = LazyLock::new(|| match Regex::new(r"^[a-z0-9-]{3,64}$") {
    Ok(re) => re,
    Err(_) => unreachable!("static regex pattern"),
});

/// A present field as text; non-string values read as empty.
fn text_field<'a>(fields: &'a Fields, key: &str) -> Option<&'a str> {
    fields.get(key).map(|v| v.as_str().unwrap_or_default())
}

/// Checks a field map and returns one message per violation.
pub trait Validator: Send + Sync {
    fn validate(&self, fields: &Fields) -> Vec<String>;
}

/// Accepts everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoValidation;

impl Validator for NoValidation {
    fn validate(&self, _fields: &Fields) -> Vec<String> {
        Vec::new()
    }
}

/// Rules for channel fields. Absent fields are not checked, so partial
/// updates validate only what they change.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelRules;

impl Validator for ChannelRules {
    fn validate(&self, fields: &Fields) -> Vec<String> {
        let mut errors = Vec::new();
        let text = |key| text_field(fields, key);

        if let Some(name) = text("name") {
            if name.trim().chars().count() < MIN_NAME_LENGTH {
                errors.push(format!(
                    "Channel name must be at least {} characters.",
                    MIN_NAME_LENGTH
                ));
            }
        }
        if let Some(slug) = text("slug") {
            if !SLUG_RE.is_match(slug) {
                errors.push(
                    "Slug must be 3-64 chars: lowercase letters, numbers, hyphen.".to_string(),
                );
            }
        }
        if let Some(mode) = text("mode") {
            if !MODES.contains(&mode) {
                errors.push(format!("Invalid mode '{}' (expected {}).", mode, MODES.join(", ")));
            }
        }
        if let Some(profile) = text("outputProfile") {
            if !OUTPUT_PROFILES.contains(&profile) {
                errors.push(format!(
                    "Invalid output profile '{}' (expected {}).",
                    profile,
                    OUTPUT_PROFILES.join(", ")
                ));
            }
        }
        if let Some(timezone) = text("timezone") {
            if timezone.trim().len() < MIN_TIMEZONE_LENGTH {
                errors.push("Timezone is required.".to_string());
            }
        }

        errors
    }
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;

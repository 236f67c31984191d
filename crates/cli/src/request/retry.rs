// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Retry policy and per-request retry bookkeeping.

use std::time::Duration;

use tether_core::backoff;

/// Configuration for retry behavior.
///
/// `max_attempts` counts retries after the initial attempt, so a request
/// is tried at most `max_attempts + 1` times. The delay before retry `n`
/// (1-based) is `base_delay * 2^(n-1)`, clamped to `max_delay` and then
/// shortened by up to `jitter` of itself.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries allowed after the initial attempt.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Optional upper bound for any single delay.
    pub max_delay: Option<Duration>,
    /// Fraction of each delay that may be randomly cut (0.0 disables).
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(500),
            max_delay: None,
            jitter: 0.0,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy that never retries.
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 0,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_max_attempts(mut self, max: u32) -> Self {
        self.max_attempts = max;
        self
    }

    #[must_use]
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    #[must_use]
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = Some(delay);
        self
    }

    #[must_use]
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter;
        self
    }

    /// Upper bound on attempts for one request, the initial one included.
    pub fn total_attempts(&self) -> u32 {
        self.max_attempts.saturating_add(1)
    }

    /// Un-jittered delay before retry `retry` (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        backoff::exponential(self.base_delay, retry.saturating_sub(1), self.max_delay)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RetryDecision {
    Retry(Duration),
    GiveUp,
}

/// Retry bookkeeping scoped to one logical request.
#[derive(Debug, Clone)]
pub struct RetryState {
    failures: u32,
    policy: RetryPolicy,
}

impl RetryState {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            failures: 0,
            policy,
        }
    }

    /// Number of failed attempts recorded so far.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Delay that would precede the next retry, before jitter.
    pub fn next_backoff(&self) -> Duration {
        self.policy.delay_for(self.failures + 1)
    }

    /// Records a retryable failure and decides whether to try again.
    pub fn record_failure(&mut self) -> RetryDecision {
        let delay = self.next_backoff();
        self.failures += 1;
        if self.failures > self.policy.max_attempts {
            return RetryDecision::GiveUp;
        }
        RetryDecision::Retry(backoff::jitter(delay, self.policy.jitter))
    }
}

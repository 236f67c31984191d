// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Exponential backoff arithmetic shared by request retries and socket
//! reconnects.

use std::time::Duration;

use rand::Rng;

/// Returns `base * 2^exponent`, saturating, clamped to `cap` when given.
pub fn exponential(base: Duration, exponent: u32, cap: Option<Duration>) -> Duration {
    let base_ms = u64::try_from(base.as_millis()).unwrap_or(u64::MAX);
    let factor = 1u64.checked_shl(exponent).unwrap_or(u64::MAX);
    let delay = Duration::from_millis(base_ms.saturating_mul(factor));
    match cap {
        Some(cap) => delay.min(cap),
        None => delay,
    }
}

/// Shortens `delay` by a random share of up to `fraction` (0.0 ..= 1.0).
///
/// Never lengthens the delay, so a configured cap still holds.
pub fn jitter(delay: Duration, fraction: f64) -> Duration {
    jitter_with(delay, fraction, &mut rand::thread_rng())
}

/// Like [`jitter`] with an explicit random source.
pub fn jitter_with<R: Rng + ?Sized>(delay: Duration, fraction: f64, rng: &mut R) -> Duration {
    if fraction <= 0.0 || delay.is_zero() {
        return delay;
    }
    let fraction = fraction.min(1.0);
    let cut = rng.gen_range(0.0..=fraction);
    delay.mul_f64(1.0 - cut)
}

#[cfg(test)]
#[path = "backoff_tests.rs"]
mod tests;

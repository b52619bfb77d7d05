//! Retry policy for side-effect delivery.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Exponential backoff policy applied to each queued side effect.
///
/// The delay before retry `n` (1-indexed) is
/// `base_delay_ms * multiplier^(n - 1)`, capped at `max_delay_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total delivery attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds.
    pub base_delay_ms: u64,
    /// Growth factor applied per further retry.
    pub multiplier: f64,
    /// Upper bound on any single delay, in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_ms: 200,
            multiplier: 2.0,
            max_delay_ms: 30_000,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy that retries without waiting.
    ///
    /// Useful for tests that exercise retry counts.
    #[must_use]
    pub const fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay_ms: 0,
            multiplier: 1.0,
            max_delay_ms: 0,
        }
    }

    /// Creates a policy that delivers each effect once.
    #[must_use]
    pub const fn no_retry() -> Self {
        Self::immediate(1)
    }

    /// Returns the delay to wait after `attempts` failed attempts.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "backoff growth is a fractional multiplier over millisecond delays"
    )]
    pub fn next_delay(&self, attempts: u32) -> Duration {
        let exponent = i32::try_from(attempts.saturating_sub(1)).unwrap_or(i32::MAX);
        let cap_ms = self.max_delay_ms as f64;
        let delay_ms = (self.base_delay_ms as f64 * self.multiplier.powi(exponent)).min(cap_ms);
        Duration::try_from_secs_f64(delay_ms / 1000.0).unwrap_or(Duration::ZERO)
    }
}

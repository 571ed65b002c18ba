//! Retry policy with capped exponential backoff for transient transfer faults.

use std::time::Duration;

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Delay before the first retry.
const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Upper bound on any single backoff delay.
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(60);

/// Decision after a transient failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Sleep for `delay`, then run retry number `retry` (1-based).
    Retry { delay: Duration, retry: u32 },
    /// The retry budget is spent.
    GiveUp,
}

/// Bounded retry with delay `min(base * 2^k, max)` after failed attempt `k`.
///
/// `k` is the 0-based index of the attempt that just failed, so with the
/// defaults the delays run 1s, 2s, 4s, ... capped at 60s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES)
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }

    /// Replace the backoff unit, keeping the 60-unit cap.
    #[must_use]
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self.max_delay = base_delay.saturating_mul(60);
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Total number of attempts made before giving up.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Backoff after the failed attempt with 0-based index `attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Decide what to do after `failures` transient failures in a row.
    pub fn decide(&self, failures: u32) -> RetryDecision {
        if failures == 0 || failures > self.max_retries {
            return RetryDecision::GiveUp;
        }
        RetryDecision::Retry {
            delay: self.delay_for(failures - 1),
            retry: failures,
        }
    }
}

//! Retry policy for opening connections

use std::time::Duration;

/// How often, and after how long, a failed open is retried
///
/// Every error is considered retryable. The wait before retry number `attempt`
/// (counted from zero) is `backoff_unit * attempt²`, so the first retry is
/// immediate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub retry_limit: u32,
    /// Time unit the squared attempt number is multiplied by
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retry_limit: 1,
            backoff_unit: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(retry_limit: u32, backoff_unit: Duration) -> Self {
        Self {
            retry_limit,
            backoff_unit,
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Wait before retry number `attempt`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_unit
            .saturating_mul(attempt.saturating_mul(attempt))
    }

    /// Total number of tries, the first one included.
    pub fn max_attempts(&self) -> u32 {
        self.retry_limit.saturating_add(1)
    }
}

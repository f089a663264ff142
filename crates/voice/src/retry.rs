//! Retry with exponential backoff for speech API calls.

use std::time::Duration;

/// Retry policy for speech API calls.
///
/// Controls how many times a failed request is retried and how long to wait
/// between attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry (doubles each retry).
    pub base_delay: Duration,
    /// Maximum delay cap.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Total attempts including the first.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay before retry number `retry` (zero-based): `min(base * 2^retry, max)`.
    #[must_use]
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(retry))
            .min(self.max_delay)
    }
}

/// Whether an HTTP status is worth retrying: rate limits (429) and server errors (5xx).
#[must_use]
pub fn is_retryable(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

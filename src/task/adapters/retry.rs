//! Exponential backoff for transient provider errors.
//!
//! Rate-limit and 5xx responses are retried with a delay that starts at the
//! policy's base delay and doubles per attempt. Every other error class
//! propagates on first sight. When attempts run out the most recent error is
//! returned.

use crate::task::ports::{ConnectorError, ConnectorResult};
use std::future::Future;
use std::time::Duration;

/// Retry tuning for one provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry; doubled for each later retry.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with the given attempt cap and base delay.
    #[must_use]
    pub const fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Returns the backoff delay after the given failed attempt (1-based).
    #[must_use]
    pub fn delay_for(&self, failed_attempt: u32) -> Duration {
        let exponent = failed_attempt.saturating_sub(1);
        let factor = 2_u32.checked_pow(exponent).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Runs `call` until it succeeds, fails permanently, or attempts run out.
    ///
    /// # Errors
    ///
    /// Returns the first non-transient error, or the last transient error
    /// once `max_attempts` calls have failed.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut call: F) -> ConnectorResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ConnectorResult<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < max_attempts => {
                    let delay = self.next_delay(attempt, &err);
                    tracing::warn!(
                        operation,
                        attempt,
                        max_attempts,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "transient provider error, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn next_delay(&self, failed_attempt: u32, err: &ConnectorError) -> Duration {
        let backoff = self.delay_for(failed_attempt);
        match err {
            ConnectorError::RateLimited {
                retry_after: Some(requested),
            } => backoff.max(*requested),
            _ => backoff,
        }
    }
}

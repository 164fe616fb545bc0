//! Bounded retry with linear backoff
//!
//! Every model call in the dialogue pipeline gets the same treatment: a small
//! number of sequential attempts, waiting `attempt × base_delay` before each
//! retry. The wait happens inline; there is no background scheduler.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// All attempts failed, or the error was not worth retrying
#[derive(Debug, Error)]
#[error("Gave up after {attempts} attempt(s): {last_error}")]
pub struct RetryExhausted<E: std::fmt::Display> {
    pub attempts: u32,
    pub last_error: E,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Policy that never sleeps, for tests and offline tools
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }

    /// Wait before the given 1-based attempt (nothing before the first)
    pub fn delay_before(&self, attempt: u32) -> Duration {
        self.base_delay * attempt.saturating_sub(1)
    }

    /// Run `op` until it succeeds or attempts run out. Every error is retried.
    pub async fn run<T, E, F, Fut>(&self, purpose: &str, op: F) -> Result<T, RetryExhausted<E>>
    where
        E: std::fmt::Display,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.run_if(purpose, op, |_| true).await
    }

    /// Run `op`, retrying only errors for which `should_retry` holds.
    ///
    /// `op` receives the 1-based attempt number.
    pub async fn run_if<T, E, F, Fut, P>(
        &self,
        purpose: &str,
        mut op: F,
        should_retry: P,
    ) -> Result<T, RetryExhausted<E>>
    where
        E: std::fmt::Display,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
    {
        let mut attempt = 1;
        loop {
            let delay = self.delay_before(attempt);
            if !delay.is_zero() {
                tracing::info!(
                    purpose,
                    attempt,
                    max_attempts = self.max_attempts,
                    delay_ms = %delay.as_millis(),
                    "Retrying"
                );
                tokio::time::sleep(delay).await;
            }

            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    let retryable = should_retry(&e);
                    tracing::warn!(
                        purpose,
                        attempt,
                        max_attempts = self.max_attempts,
                        retryable,
                        error = %e,
                        "Attempt failed"
                    );
                    if !retryable || attempt >= self.max_attempts {
                        return Err(RetryExhausted {
                            attempts: attempt,
                            last_error: e,
                        });
                    }
                }
            }
            attempt += 1;
        }
    }
}

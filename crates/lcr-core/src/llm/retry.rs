//! Exponential backoff for model calls

use crate::error::{EvalError, EvalResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Backoff schedule: `min(max_delay, base_delay * 2^attempt)`, zero-based,
/// so the default gives 0.5s, 1s, 2s, 4s, 8s, 8s, ...
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    pub fn new(base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            base_delay,
            max_delay,
        }
    }

    /// Delay after the failed attempt with zero-based index `attempt`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.min(31));
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

/// Run `operation` up to `attempts` times (at least once).
///
/// Every failure is retried; there is no sleep after the final attempt. When
/// all attempts fail, the last error's description is wrapped in a single
/// [`EvalError::TerminalCall`].
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    attempts: u32,
    mut operation: F,
) -> EvalResult<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = EvalResult<T>>,
{
    let attempts = attempts.max(1);
    let mut last_error: Option<EvalError> = None;

    for attempt in 0..attempts {
        match operation(attempt).await {
            Ok(value) => {
                if attempt > 0 {
                    tracing::info!(attempt = attempt + 1, "call succeeded after retry");
                }
                return Ok(value);
            }
            Err(error) => {
                if attempt + 1 < attempts {
                    let delay = policy.delay_for(attempt);
                    tracing::warn!(
                        attempt = attempt + 1,
                        max_attempts = attempts,
                        delay_secs = delay.as_secs_f64(),
                        error = %error,
                        "call failed, retrying"
                    );
                    sleep(delay).await;
                } else {
                    tracing::error!(attempts, error = %error, "all retry attempts exhausted");
                }
                last_error = Some(error);
            }
        }
    }

    let message = last_error
        .map(|e| e.to_string())
        .unwrap_or_else(|| "no error details".to_string());
    Err(EvalError::terminal_call(attempts, message))
}

//! Retry logic.
//!
//! # Responsibilities
//! - Decide whether a failed operation is worth repeating
//! - Execute retries with exponential backoff + jitter

use std::future::Future;

use crate::config::RetryConfig;
use crate::resilience::backoff::backoff_for;

/// Errors that know whether repeating the same request could succeed.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// attempt budget is exhausted. The last error is returned unchanged.
pub async fn retry_with_backoff<T, E, F, Fut>(
    config: &RetryConfig,
    operation: &str,
    mut op: F,
) -> Result<T, E>
where
    E: Retryable + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = if config.enabled {
        config.max_attempts.max(1)
    } else {
        1
    };

    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                attempt += 1;
                if !e.is_retryable() || attempt >= max_attempts {
                    return Err(e);
                }
                let delay = backoff_for(config, attempt);
                tracing::warn!(
                    operation,
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Transient failure, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

//! Exponential backoff with jitter.

use rand::Rng;
use std::time::Duration;

use crate::config::RetryConfig;

/// Calculate exponential backoff delay with jitter.
///
/// `attempt` counts retries, so attempt 0 means "no wait".
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);
    let capped_delay = delay_ms.min(max_ms);

    // Jitter: up to 10% on top of the capped delay
    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay.saturating_add(jitter))
}

/// Backoff for a retry attempt using the configured bounds.
pub fn backoff_for(config: &RetryConfig, attempt: u32) -> Duration {
    calculate_backoff(attempt, config.base_delay_ms, config.max_delay_ms)
}

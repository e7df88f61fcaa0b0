//! Retry with exponential backoff for page fetches.
//!
//! Only transient failures are retried: HTTP 429 and network-level errors.
//! Anything else (unexpected status, bad search URL) is returned at once.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

fn is_retriable(err: &ScraperError) -> bool {
    matches!(
        err,
        ScraperError::RateLimited { .. } | ScraperError::Http(_)
    )
}

/// Runs `operation`, retrying transient errors up to `max_retries` times.
///
/// The sleep before retry `n` (1-based) is `backoff_base_secs * 2^(n-1)`
/// seconds, or the server's `Retry-After` when a 429 carried a longer one.
/// With `max_retries = 2` the operation runs at most three times; the last
/// error is returned once retries are exhausted.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if !is_retriable(&err) || attempt >= max_retries => return Err(err),
            Err(err) => err,
        };

        let backoff_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        let delay_secs = match &err {
            ScraperError::RateLimited {
                retry_after_secs, ..
            } => backoff_secs.max(*retry_after_secs),
            _ => backoff_secs,
        };
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient fetch error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}

//! Bounded retry with linearly increasing backoff.

use std::future::Future;
use std::time::Duration;

use askvault_core::error::Result;

/// Run `op` up to `max_attempts` times.
///
/// Only rate-limit-class failures are retried; the wait before attempt
/// `n + 1` is `base_delay * n`, so a 2s base waits 2s then 4s. Any other
/// failure, or exhaustion of the attempt budget, propagates the error.
pub async fn with_backoff<T, F, Fut>(
    label: &str,
    max_attempts: u32,
    base_delay: Duration,
    mut op: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_rate_limit() && attempt < max_attempts => {
                let wait = base_delay * attempt;
                tracing::warn!("⚠️ {label} rate limit hit, retrying in {}s...", wait.as_secs());
                tokio::time::sleep(wait).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

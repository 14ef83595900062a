//! Fixed-delay bounded retry for idempotent reads.

use std::future::Future;
use std::time::Duration;

/// Retry budget: total attempts (first try included) and the fixed delay
/// between them. The delay is deliberately not exponential; list and
/// report fetches are cheap and the budget is small.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_millis(1000),
        }
    }
}

/// Invoke `op` until it succeeds, the attempt budget runs out, or it fails
/// with an error `retryable` rejects. The last error propagates unmodified.
///
/// Logically-expected negative results (e.g. a `None` lookup) are values,
/// not errors, and never reach the retry loop; `retryable` additionally
/// keeps domain errors from being retried.
pub async fn retry<T, E, F, Fut, P>(policy: RetryPolicy, mut op: F, retryable: P) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < attempts && retryable(&err) => {
                tracing::debug!(attempt, "retrying after transient failure");
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

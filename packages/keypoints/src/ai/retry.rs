//! Bounded retry with a fixed delay between attempts.

use std::future::Future;

use tracing::warn;

use crate::types::config::RetryPolicy;

/// Run `call` until it succeeds, returns a non-retryable error, or the
/// policy's attempts are spent. The last error is returned.
pub async fn with_retry<T, E, F, Fut, R>(
    policy: &RetryPolicy,
    operation: &str,
    is_retryable: R,
    mut call: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    R: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let attempts = policy.attempts();
    let mut attempt = 1;

    loop {
        match call().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < attempts && is_retryable(&e) => {
                warn!(
                    operation,
                    attempt,
                    max_attempts = attempts,
                    error = %e,
                    "Call failed, retrying"
                );
                tokio::time::sleep(policy.delay()).await;
                attempt += 1;
            }
            Err(e) => {
                warn!(operation, attempt, error = %e, "Call failed, giving up");
                return Err(e);
            }
        }
    }
}

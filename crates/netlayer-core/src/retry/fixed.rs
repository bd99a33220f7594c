//! Fixed-budget, immediate retry.

use super::strategy::{RetryHandler, Retryable};
use async_trait::async_trait;
use std::future::Future;

/// Run `operation` once, then retry failures up to `retry_count` more times.
///
/// Attempts are strictly sequential with no delay between them. The loop stops
/// at the first success, at the first error whose
/// [`Retryable::is_retryable`] is `false`, or when the budget is spent. In the
/// latter two cases the error from the **last** attempt is returned.
///
/// A budget of `0` runs the operation exactly once.
///
/// # Examples
///
/// ```rust
/// use netlayer_core::retry::execute_with_retry;
///
/// # async fn example() {
/// let mut attempt = 0;
/// let result: Result<(), std::io::Error> = execute_with_retry(2, || {
///     attempt += 1;
///     let current = attempt;
///     async move { Err(std::io::Error::other(format!("attempt {current}"))) }
/// })
/// .await;
///
/// assert_eq!(result.unwrap_err().to_string(), "attempt 3");
/// # }
/// ```
pub async fn execute_with_retry<F, Fut, T, E>(retry_count: u32, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable,
{
    let mut remaining = retry_count;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if !err.is_retryable() => return Err(err),
            Err(err) if remaining == 0 => return Err(err),
            Err(_) => {
                remaining -= 1;
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    next_attempt = retry_count - remaining + 1,
                    remaining,
                    "Retrying failed operation"
                );
            }
        }
    }
}

/// Retry strategy with a fixed budget and no delay between attempts.
///
/// This is the [`RetryHandler`] form of [`execute_with_retry`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedRetry;

#[async_trait]
impl RetryHandler for FixedRetry {
    async fn execute_with_retry<F, Fut, T, E>(&self, retry_count: u32, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
        T: Send,
        E: Retryable + Send,
    {
        execute_with_retry(retry_count, operation).await
    }
}

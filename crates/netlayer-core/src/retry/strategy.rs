//! Retry strategy trait and retry classification.

use async_trait::async_trait;
use std::future::Future;

/// Classifies an error as worth another attempt or terminal.
///
/// The default is to retry everything. Errors describing an outcome that
/// cannot change on a second attempt (a cancelled request, for instance)
/// override [`is_retryable`](Retryable::is_retryable) to return `false`.
///
/// # Examples
///
/// ```rust
/// use netlayer_core::retry::Retryable;
///
/// #[derive(Debug)]
/// enum FetchError {
///     Flaky,
///     Cancelled,
/// }
///
/// impl Retryable for FetchError {
///     fn is_retryable(&self) -> bool {
///         !matches!(self, FetchError::Cancelled)
///     }
/// }
///
/// assert!(FetchError::Flaky.is_retryable());
/// assert!(!FetchError::Cancelled.is_retryable());
/// ```
pub trait Retryable {
    /// Whether another attempt may be made after this error.
    fn is_retryable(&self) -> bool {
        true
    }
}

impl Retryable for std::io::Error {}

/// A strategy for re-running failed asynchronous operations.
///
/// Implementations decide how many times an operation runs and in what order;
/// they must never run two attempts of the same operation concurrently.
///
/// # Examples
///
/// ```rust
/// use netlayer_core::retry::{FixedRetry, RetryHandler};
///
/// # async fn example() -> Result<(), std::io::Error> {
/// let value = FixedRetry
///     .execute_with_retry(3, || async { Ok::<_, std::io::Error>(7) })
///     .await?;
/// assert_eq!(value, 7);
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait RetryHandler: Send + Sync {
    /// Run `operation`, retrying failures up to `retry_count` additional times.
    ///
    /// # Returns
    /// - `Ok(T)`: the first successful result
    /// - `Err(E)`: the error from the last attempt made
    async fn execute_with_retry<F, Fut, T, E>(&self, retry_count: u32, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
        T: Send,
        E: Retryable + Send;
}

//! Bounded retry of asynchronous operations.
//!
//! Retries are immediate and strictly sequential: the next attempt starts only
//! after the previous one has resolved. There is no backoff and no jitter; the
//! only knob is the retry budget, the number of additional attempts allowed
//! after the first failure.
//!
//! # Key Types
//!
//! - [`Retryable`] - lets an error opt out of being retried
//! - [`RetryHandler`] - strategy trait, so callers can be generic over retry
//! - [`FixedRetry`] - the fixed-budget strategy
//!
//! # Examples
//!
//! ```rust
//! use netlayer_core::retry::execute_with_retry;
//! use std::sync::atomic::{AtomicU32, Ordering};
//!
//! # async fn example() {
//! let calls = AtomicU32::new(0);
//! let result = execute_with_retry(2, || async {
//!     if calls.fetch_add(1, Ordering::SeqCst) < 2 {
//!         Err(std::io::Error::other("flaky"))
//!     } else {
//!         Ok("done")
//!     }
//! })
//! .await;
//!
//! assert_eq!(result.unwrap(), "done");
//! assert_eq!(calls.load(Ordering::SeqCst), 3);
//! # }
//! ```

mod fixed;
mod strategy;

pub use fixed::{FixedRetry, execute_with_retry};
pub use strategy::{RetryHandler, Retryable};

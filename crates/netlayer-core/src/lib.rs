#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Core abstractions for the netlayer ecosystem.
//!
//! This crate holds the pieces of the request pipeline that know nothing about
//! HTTP:
//!
//! - **Bounded retry** via the [`RetryHandler`](retry::RetryHandler) trait and
//!   the [`execute_with_retry`](retry::execute_with_retry) free function
//! - **Retry classification** via the [`Retryable`](retry::Retryable) trait
//!
//! # Examples
//!
//! ```rust
//! use netlayer_core::prelude::*;
//!
//! # async fn example() -> Result<(), std::io::Error> {
//! let value = FixedRetry.execute_with_retry(2, || async {
//!     Ok::<_, std::io::Error>(42)
//! }).await?;
//! assert_eq!(value, 42);
//! # Ok(())
//! # }
//! ```

pub mod retry;

/// Convenient re-exports of commonly used items.
///
/// ```rust
/// use netlayer_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::retry::{FixedRetry, RetryHandler, Retryable, execute_with_retry};
}

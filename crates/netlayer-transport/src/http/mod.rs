//! HTTP transport implementation
//!
//! Provides a reqwest-backed client that implements the Transport trait.
//! It performs exactly one exchange per dispatch; retries are the pipeline's
//! concern.

pub mod client;

pub use client::{HttpTransport, HttpTransportConfig};

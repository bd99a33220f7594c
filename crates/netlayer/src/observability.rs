//! Structured logging for pipeline calls
//!
//! All request/response/error events go through this module so the field
//! names stay consistent. Credentials never reach the log: query-string API
//! keys are replaced with `REDACTED` and header values are not logged at all.

use crate::config::API_KEY_QUERY_PARAM;
use crate::error::NetworkError;
use netlayer_transport::{TransportRequest, TransportResponse};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

const REDACTED: &str = "REDACTED";

/// Outgoing request metadata for structured logging
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request URL with credentials redacted
    pub url: String,
    /// Request body size in bytes (optional)
    pub body_size: Option<usize>,
}

impl RequestMetadata {
    /// Create new request metadata
    pub fn new(method: impl Into<String>, url: &Url) -> Self {
        Self {
            method: method.into(),
            url: redact_url(url),
            body_size: None,
        }
    }

    /// Capture method, redacted URL and body size from a built request
    pub fn from_request(request: &TransportRequest) -> Self {
        let metadata = Self::new(request.method.as_str(), &request.url);
        match request.body_len() {
            Some(size) => metadata.with_body_size(size),
            None => metadata,
        }
    }

    /// Set the request body size
    pub fn with_body_size(mut self, size: usize) -> Self {
        self.body_size = Some(size);
        self
    }

    /// Log request being sent
    pub fn log_request(&self) {
        debug!(
            method = %self.method,
            url = %self.url,
            body_size = self.body_size,
            "Sending HTTP request"
        );
    }

    /// Log a request that could not be built
    pub fn log_build_error(method: &str, path: &str, error: &NetworkError) {
        warn!(
            method = %method,
            path = %path,
            error = %error,
            "Failed to build HTTP request"
        );
    }
}

/// Raw response metadata for structured logging
#[derive(Debug, Clone)]
pub struct ResponseMetadata {
    /// HTTP status code
    pub status: u16,
    /// Response body size in bytes
    pub body_size: usize,
    /// Time elapsed for this attempt
    pub elapsed: Duration,
    /// 1-based attempt number
    pub attempt: u32,
}

impl ResponseMetadata {
    /// Create new response metadata
    pub fn new(response: &TransportResponse, elapsed: Duration) -> Self {
        Self {
            status: response.status,
            body_size: response.body.len(),
            elapsed,
            attempt: 1,
        }
    }

    /// Set the attempt number
    pub fn with_attempt(mut self, attempt: u32) -> Self {
        self.attempt = attempt;
        self
    }

    /// Log successful response
    pub fn log_success(&self, request: &RequestMetadata) {
        info!(
            method = %request.method,
            url = %request.url,
            status = self.status,
            elapsed_ms = self.elapsed.as_millis(),
            body_size = self.body_size,
            attempt = self.attempt,
            "HTTP request succeeded"
        );
    }

    /// Log failed response
    pub fn log_error(&self, request: &RequestMetadata, error: &NetworkError) {
        warn!(
            method = %request.method,
            url = %request.url,
            status = self.status,
            elapsed_ms = self.elapsed.as_millis(),
            body_size = self.body_size,
            error = %error,
            attempt = self.attempt,
            "HTTP request failed"
        );
    }
}

/// Log an attempt that never produced a response
pub fn log_transport_error(
    request: &RequestMetadata,
    error: &NetworkError,
    elapsed: Duration,
    attempt: u32,
) {
    warn!(
        method = %request.method,
        url = %request.url,
        elapsed_ms = elapsed.as_millis(),
        error = %error,
        attempt,
        "HTTP request did not complete"
    );
}

/// Log a call refused by the reachability probe
pub fn log_unreachable(method: &str, path: &str) {
    warn!(
        method = %method,
        path = %path,
        "Network unreachable, request not sent"
    );
}

/// Timer for measuring request duration
pub struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    /// Start a new timer
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Render `url` with the API key query item replaced by `REDACTED`.
pub fn redact_url(url: &Url) -> String {
    if !url.query_pairs().any(|(k, _)| k == API_KEY_QUERY_PARAM) {
        return url.to_string();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == API_KEY_QUERY_PARAM {
                REDACTED.to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();

    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

/// Install a `tracing-subscriber` fmt subscriber filtered by `RUST_LOG`.
///
/// Defaults to `netlayer=info` when `RUST_LOG` is unset. Does nothing if a
/// global subscriber is already installed.
#[cfg(feature = "trace")]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("netlayer=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

//! Transport trait and the wire-level request/response types
//!
//! Defines the generic Transport trait that a network backend implements, and
//! the plain data it exchanges with the pipeline.

use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use std::time::Duration;
use url::Url;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Caching hint forwarded to the transport.
///
/// The pipeline never interprets this value; transports map it onto whatever
/// their backend understands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CachePolicy {
    /// Let the protocol decide
    #[default]
    UseProtocolDefault,

    /// Always go to the origin
    ReloadIgnoringCache,

    /// Prefer cached data, even stale, loading only when absent
    ReturnCacheDataElseLoad,

    /// Only ever use cached data
    ReturnCacheDataDontLoad,
}

impl CachePolicy {
    /// The `Cache-Control` request directive matching this policy, if any.
    pub fn cache_control(&self) -> Option<&'static str> {
        match self {
            Self::UseProtocolDefault => None,
            Self::ReloadIgnoringCache => Some("no-cache"),
            Self::ReturnCacheDataElseLoad => Some("max-stale"),
            Self::ReturnCacheDataDontLoad => Some("only-if-cached"),
        }
    }
}

/// Fully resolved, wire-ready HTTP request.
///
/// Header names are case-insensitive, as `HeaderMap` normalizes them.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method
    pub method: Method,

    /// Fully-qualified URL, including any query string
    pub url: Url,

    /// Request headers
    pub headers: HeaderMap,

    /// Request body (optional)
    pub body: Option<Bytes>,

    /// Time allowed for a single dispatch
    pub timeout: Duration,

    /// Caching hint
    pub cache_policy: CachePolicy,
}

impl TransportRequest {
    /// Create a new request with no headers, no body and default timeout
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            timeout: DEFAULT_TIMEOUT,
            cache_policy: CachePolicy::default(),
        }
    }

    /// Set a header, replacing any previous value with the same name
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set the request body
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the cache policy
    pub fn with_cache_policy(mut self, cache_policy: CachePolicy) -> Self {
        self.cache_policy = cache_policy;
        self
    }

    /// Body size in bytes, if there is a body
    pub fn body_len(&self) -> Option<usize> {
        self.body.as_ref().map(Bytes::len)
    }

    /// Get a header value as a string
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Raw HTTP response, as the transport received it.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,

    /// Response headers
    pub headers: HeaderMap,

    /// Response body
    pub body: Bytes,
}

impl TransportResponse {
    /// Create a new response
    pub fn new(status: u16, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get the response body as text, replacing invalid UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Get a header value by name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// A network backend able to perform one HTTP exchange.
///
/// Implementations must be safe to share across concurrent calls. They must
/// not retry on their own: retry policy belongs to the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request once and return whatever the server answered.
    ///
    /// Non-2xx statuses are returned as `Ok`; only failures below the HTTP
    /// status level (connect, timeout, cancellation) are errors.
    async fn dispatch(&self, request: &TransportRequest) -> Result<TransportResponse>;
}

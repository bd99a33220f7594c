//! Transport error types

use std::fmt;

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors raised below the HTTP status level.
///
/// A response with a 4xx or 5xx status is *not* a transport error; it comes
/// back as a regular [`TransportResponse`](crate::TransportResponse) and is
/// classified by the caller.
#[derive(Debug)]
pub enum TransportError {
    /// HTTP protocol or request construction error
    Http(String),

    /// Connection error (DNS, refused, reset, TLS handshake)
    Connection(String),

    /// I/O error
    Io(std::io::Error),

    /// The request did not complete within its timeout
    Timeout,

    /// The request was cancelled before completing
    Cancelled,

    /// The reachability probe reported no connectivity
    Unreachable,

    /// Generic transport error
    Other(String),
}

impl TransportError {
    /// Whether this error reports a cancellation rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(msg) => write!(f, "HTTP error: {}", msg),
            Self::Connection(msg) => write!(f, "Connection error: {}", msg),
            Self::Io(err) => write!(f, "I/O error: {}", err),
            Self::Timeout => write!(f, "Timeout"),
            Self::Cancelled => write!(f, "Request cancelled"),
            Self::Unreachable => write!(f, "Network unreachable"),
            Self::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}

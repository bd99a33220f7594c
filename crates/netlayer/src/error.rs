//! Error types for the request pipeline
//!
//! Every way a call can fail lands in exactly one [`NetworkError`] variant.
//! Build-time variants (`InvalidUrl`, `ParameterEncodingFailed`, and
//! `AuthenticationFailed` for a missing token) are raised before anything is
//! dispatched; the rest come out of dispatch or decoding and are subject to
//! the retry budget.

use netlayer_core::retry::Retryable;
use netlayer_transport::TransportError;
use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, NetworkError>;

/// Main error type for the request pipeline.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The base URL and path did not compose into a usable absolute URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The response carried no valid HTTP status.
    #[error("The server response was not valid")]
    InvalidResponse,

    /// Non-2xx status other than 401.
    #[error("Server error (status {status_code})")]
    ServerError {
        /// HTTP status code
        status_code: u16,
    },

    /// Status 401, or authentication required but no token supplied.
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// A 2xx body did not decode into the requested type.
    #[error("Failed to decode response: {0}")]
    DecodingError(#[source] serde_json::Error),

    /// Headers or body could not be encoded.
    #[error("Parameter encoding failed: {0}")]
    ParameterEncodingFailed(String),

    /// The transport failed below the HTTP status level.
    #[error("Network failure: {0}")]
    NetworkFailure(#[source] TransportError),

    /// The transport reported the request as cancelled.
    #[error("Request cancelled")]
    RequestCancelled,

    /// A 2xx response arrived with an empty body where a value was expected.
    #[error("No data in response")]
    NoData,

    /// Anything else, with a message.
    #[error("{0}")]
    Custom(String),
}

impl NetworkError {
    /// Create a custom error from any message.
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }

    /// The HTTP status this error was classified from, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ServerError { status_code } => Some(*status_code),
            Self::AuthenticationFailed => Some(401),
            _ => None,
        }
    }

    /// Whether the retry coordinator may try again after this error.
    ///
    /// Every failure is retried uniformly, with the single exception of
    /// cancellation.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::RequestCancelled)
    }
}

impl Retryable for NetworkError {
    fn is_retryable(&self) -> bool {
        NetworkError::is_retryable(self)
    }
}

impl From<TransportError> for NetworkError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Cancelled => Self::RequestCancelled,
            other => Self::NetworkFailure(other),
        }
    }
}

impl From<crate::descriptor::RequestDescriptorBuilderError> for NetworkError {
    fn from(err: crate::descriptor::RequestDescriptorBuilderError) -> Self {
        Self::Custom(format!("Invalid request descriptor: {}", err))
    }
}

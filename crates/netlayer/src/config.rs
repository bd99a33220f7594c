//! Configuration for the request pipeline

use crate::error::NetworkError;
use std::fmt;
use std::str::FromStr;

/// Query parameter name used when the API key travels in the URL.
pub const API_KEY_QUERY_PARAM: &str = "api_key";

/// Header name used when the API key travels as a header.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Where the descriptor's `api_token` is attached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ApiKeyPlacement {
    /// `?api_key=<token>` on the request URL
    #[default]
    QueryParam,

    /// `x-api-key: <token>` header
    Header,
}

impl FromStr for ApiKeyPlacement {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "query" | "query_param" | "queryparam" => Ok(Self::QueryParam),
            "header" => Ok(Self::Header),
            other => Err(NetworkError::Custom(format!(
                "Unknown API key placement '{}', expected 'query' or 'header'",
                other
            ))),
        }
    }
}

impl fmt::Display for ApiKeyPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QueryParam => f.write_str("query"),
            Self::Header => f.write_str("header"),
        }
    }
}

/// Configuration for a [`RequestPipeline`](crate::RequestPipeline).
///
/// Chosen once at construction; every call through the pipeline uses the same
/// policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Where API keys are attached
    pub api_key_placement: ApiKeyPlacement,

    /// Emit tracing events for requests, responses and errors
    pub logging_enabled: bool,

    /// Consult the reachability probe (when one is installed) before dispatching
    pub check_reachability: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            api_key_placement: ApiKeyPlacement::QueryParam,
            logging_enabled: true,
            check_reachability: true,
        }
    }
}

impl PipelineConfig {
    /// Set where API keys are attached.
    pub fn api_key_placement(mut self, placement: ApiKeyPlacement) -> Self {
        self.api_key_placement = placement;
        self
    }

    /// Enable or disable request/response logging.
    pub fn logging_enabled(mut self, enabled: bool) -> Self {
        self.logging_enabled = enabled;
        self
    }

    /// Enable or disable the reachability gate.
    pub fn check_reachability(mut self, enabled: bool) -> Self {
        self.check_reachability = enabled;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first, if present.
    /// This will look for:
    /// - `NETLAYER_API_KEY_PLACEMENT`: `query` or `header`
    /// - `NETLAYER_LOGGING`: `true`/`false`/`1`/`0`/`yes`/`no`
    /// - `NETLAYER_CHECK_REACHABILITY`: same boolean forms
    ///
    /// Unset variables keep their defaults; malformed ones are an error.
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self, NetworkError> {
        use std::env;

        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        if let Ok(placement) = env::var("NETLAYER_API_KEY_PLACEMENT") {
            config.api_key_placement = placement.parse()?;
        }

        if let Ok(logging) = env::var("NETLAYER_LOGGING") {
            config.logging_enabled = parse_flag("NETLAYER_LOGGING", &logging)?;
        }

        if let Ok(check) = env::var("NETLAYER_CHECK_REACHABILITY") {
            config.check_reachability = parse_flag("NETLAYER_CHECK_REACHABILITY", &check)?;
        }

        Ok(config)
    }
}

#[cfg_attr(not(feature = "env"), allow(dead_code))]
fn parse_flag(name: &str, value: &str) -> Result<bool, NetworkError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(NetworkError::Custom(format!(
            "Invalid boolean '{}' for {}",
            other, name
        ))),
    }
}

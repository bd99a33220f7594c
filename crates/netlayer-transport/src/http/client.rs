//! HTTP transport client implementation
//!
//! Implements the Transport trait on top of reqwest.

use crate::error::{Result, TransportError};
use crate::traits::{Transport, TransportRequest, TransportResponse};
use async_trait::async_trait;
use http::header::CACHE_CONTROL;
use reqwest::Client as ReqwestClient;
use std::sync::Arc;
use std::time::Duration;

/// HTTP transport implementation
///
/// Handles:
/// - Per-request timeouts taken from the [`TransportRequest`]
/// - Mapping [`CachePolicy`](crate::CachePolicy) onto `Cache-Control`
/// - Classifying reqwest failures into [`TransportError`] kinds
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Arc<ReqwestClient>,
}

impl HttpTransport {
    /// Create a new HTTP transport with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(Default::default())
    }

    /// Create a new HTTP transport with custom configuration
    pub fn with_config(config: HttpTransportConfig) -> Result<Self> {
        let mut builder = ReqwestClient::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout);

        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Wrap an already configured reqwest client
    pub fn from_client(client: ReqwestClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Get a reference to the underlying reqwest client
    pub fn reqwest_client(&self) -> Arc<ReqwestClient> {
        self.client.clone()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn dispatch(&self, request: &TransportRequest) -> Result<TransportResponse> {
        let mut req = self
            .client
            .request(request.method.clone(), request.url.clone())
            .timeout(request.timeout)
            .headers(request.headers.clone());

        // An explicit Cache-Control header wins over the policy hint
        if let Some(directive) = request.cache_policy.cache_control()
            && !request.headers.contains_key(CACHE_CONTROL)
        {
            req = req.header(CACHE_CONTROL, directive);
        }

        if let Some(body) = &request.body {
            req = req.body(body.clone());
        }

        let response = req.send().await?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        tracing::trace!(
            method = %request.method,
            status,
            body_size = body.len(),
            "HTTP exchange completed"
        );

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

/// HTTP transport configuration
#[derive(Clone, Debug)]
pub struct HttpTransportConfig {
    /// Client-wide ceiling on request time; per-request timeouts apply on top
    pub timeout: Duration,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// `User-Agent` sent with every request
    pub user_agent: Option<String>,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(600),
            connect_timeout: Duration::from_secs(30),
            user_agent: Some(concat!("netlayer/", env!("CARGO_PKG_VERSION")).to_string()),
        }
    }
}

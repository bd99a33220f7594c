//! # netlayer
//!
//! Declarative HTTP request pipeline:
//! - Describe a call once with a [`RequestDescriptor`]
//! - JSON, `multipart/form-data` and urlencoded bodies
//! - API key in the query string or a header, optional bearer auth
//! - Fixed-budget retries with immediate re-dispatch
//! - Status classification and typed JSON decoding
//! - Pluggable transport and reachability probe
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use netlayer::{Method, PipelineConfig, RequestDescriptor, RequestPipeline};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Created {
//!     id: u64,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = RequestPipeline::with_http_transport(PipelineConfig::from_env()?)?;
//!
//!     let mut builder = RequestDescriptor::builder();
//!     builder
//!         .base_url("https://api.example.com/v1")
//!         .path("lists")
//!         .method(Method::POST)
//!         .body_field("name", "Favourites")
//!         .requires_authentication(true)
//!         .auth_token("session-token")
//!         .retry_count(2u32);
//!
//!     let created: Created = pipeline.execute(&builder.build()?).await?;
//!     println!("created list {}", created.id);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// Re-export commonly used types
pub use config::{API_KEY_HEADER, API_KEY_QUERY_PARAM, ApiKeyPlacement, PipelineConfig};
pub use descriptor::{ContentType, Parameters, RequestDescriptor, RequestDescriptorBuilder};
pub use error::{NetworkError, Result};
pub use pipeline::RequestPipeline;
pub use self::http::{
    ClassifiedOutcome, DefaultRequestBuilder, JsonResponseDecoder, Method, RequestBuilder,
    ResponseHandler, classify,
};

pub use netlayer_core::retry::{FixedRetry, RetryHandler, Retryable, execute_with_retry};
pub use netlayer_transport::{
    AlwaysReachable, CachePolicy, HttpTransport, HttpTransportConfig, Reachability, TcpProbe,
    Transport, TransportError, TransportRequest, TransportResponse,
};

// Module declarations
pub mod config;
pub mod descriptor;
pub mod error;
pub mod http;
pub mod observability;
pub mod pipeline;

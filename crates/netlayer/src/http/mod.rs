//! HTTP layer of the pipeline
//!
//! Turns descriptors into wire-level requests and raw responses into typed
//! values or classified errors. Nothing here performs I/O.

pub use encoding::{encode_json, encode_multipart, encode_url_encoded, generate_boundary};
pub use request::{DefaultRequestBuilder, RequestBuilder};
pub use response::{ClassifiedOutcome, JsonResponseDecoder, ResponseHandler, classify};

pub mod encoding;
mod request;
mod response;

// Re-export HTTP types from the http crate for convenience
pub use ::http::{HeaderMap, HeaderName, HeaderValue, Method};

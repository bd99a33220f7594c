//! Transport abstraction layer for netlayer
//!
//! The request pipeline never touches sockets itself. It hands a fully
//! resolved [`TransportRequest`] to a [`Transport`] and gets back the raw
//! [`TransportResponse`]; everything about status codes and payloads is
//! interpreted one layer up.
//!
//! # Architecture
//!
//! - **Transport trait**: one async `dispatch` call per attempt
//! - **HTTP transport**: reqwest-backed implementation
//! - **Reachability**: optional fast-fail probe consulted before dispatching
//! - **Error handling**: [`TransportError`] for failures below HTTP status level

#![deny(unsafe_code)]
#![warn(missing_docs)]
//!
//! # Usage
//!
//! ```ignore
//! use netlayer_transport::{HttpTransport, Transport, TransportRequest};
//!
//! let transport = HttpTransport::new()?;
//! let request = TransportRequest::new(http::Method::GET, "https://example.com/v1/items".parse()?);
//! let response = transport.dispatch(&request).await?;
//! ```

pub mod error;
pub mod http;
pub mod reachability;
pub mod traits;

// Re-export commonly used types
pub use error::{Result, TransportError};
pub use self::http::{HttpTransport, HttpTransportConfig};
pub use reachability::{AlwaysReachable, Reachability, TcpProbe};
pub use traits::{CachePolicy, Transport, TransportRequest, TransportResponse};

//! Network reachability probes
//!
//! A probe answers one question before a request is dispatched: is there any
//! point trying? It is a fast-fail gate only and never replaces the transport's
//! own error reporting.

use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;

/// Connectivity check consulted before dispatching.
#[async_trait]
pub trait Reachability: Send + Sync {
    /// Whether the network currently looks usable.
    async fn is_reachable(&self) -> bool;
}

/// Probe that always reports the network as reachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysReachable;

#[async_trait]
impl Reachability for AlwaysReachable {
    async fn is_reachable(&self) -> bool {
        true
    }
}

/// Probe that opens (and immediately drops) a TCP connection to a known host.
///
/// # Example
///
/// ```rust,no_run
/// use netlayer_transport::{Reachability, TcpProbe};
///
/// # async fn example() {
/// let probe = TcpProbe::new("example.com:443");
/// if !probe.is_reachable().await {
///     eprintln!("offline");
/// }
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TcpProbe {
    address: String,
    timeout: Duration,
}

impl TcpProbe {
    /// Default time allowed for the probe connection
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

    /// Create a probe for a `host:port` address
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Set the probe timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The probed address
    pub fn address(&self) -> &str {
        &self.address
    }
}

#[async_trait]
impl Reachability for TcpProbe {
    async fn is_reachable(&self) -> bool {
        match tokio::time::timeout(self.timeout, TcpStream::connect(self.address.as_str())).await {
            Ok(Ok(_)) => true,
            Ok(Err(err)) => {
                tracing::debug!(address = %self.address, error = %err, "Reachability probe failed");
                false
            }
            Err(_) => {
                tracing::debug!(address = %self.address, "Reachability probe timed out");
                false
            }
        }
    }
}

//! Network fetch primitive.
//!
//! The [`Network`] trait is the seam between the caching strategies and the
//! transport. Strategies never see transport errors escape: they translate
//! a [`TransportError`] into a synthetic 408 response and an offline check
//! into a synthetic 503.
//!
//! Connectivity is a point-in-time flag, not a subscription: a request that
//! passes the online check and then loses connectivity mid-flight surfaces
//! as a transport failure, not as "unavailable".

pub mod http;

use async_trait::async_trait;
use stashway_core::{ResourceRequest, ResponseSnapshot};

pub use http::{HttpNetwork, NetworkConfig};

/// Transport-level fetch failures.
///
/// Any HTTP status, including errors, is a successful fetch; these variants
/// cover only the cases where no response was obtained at all.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection could not be established or was dropped.
    #[error("connect failed: {0}")]
    Connect(String),

    /// The fetch did not complete within the configured timeout.
    #[error("timed out: {0}")]
    Timeout(String),

    /// The response body could not be read.
    #[error("body read failed: {0}")]
    Body(String),

    /// The response body exceeded the configured size limit.
    #[error("{got} bytes exceeds {limit}")]
    TooLarge { got: usize, limit: usize },

    /// The request could not be built (bad method or URL).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Network access as seen by the caching strategies.
#[async_trait]
pub trait Network: Send + Sync {
    /// Fetch a resource. Every HTTP status resolves to a snapshot; `Err` is
    /// reserved for transport failure.
    async fn fetch(&self, request: &ResourceRequest) -> Result<ResponseSnapshot, TransportError>;

    /// Point-in-time connectivity check.
    fn is_online(&self) -> bool;
}

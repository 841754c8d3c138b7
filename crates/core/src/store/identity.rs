//! Request-identity cache key generation.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The addressable key for a cache entry within a partition:
/// method + URL + relevant header values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestIdentity {
    pub method: String,
    pub url: String,
    pub vary: String,
}

impl RequestIdentity {
    /// Stable hex digest used as the store lookup key.
    pub fn key(&self) -> String {
        compute_identity_key(&self.method, &self.url, &self.vary)
    }
}

/// Compute the store key for a request identity.
pub fn compute_identity_key(method: &str, url: &str, vary: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.as_bytes());
    hasher.update(b"\n");
    hasher.update(url.as_bytes());
    hasher.update(b"\n");
    hasher.update(vary.as_bytes());
    hex::encode(hasher.finalize())
}

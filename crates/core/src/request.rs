//! Intercepted request model.
//!
//! A [`ResourceRequest`] is what the interception boundary hands the agent:
//! the request's addressable identity (method, URL, vary string) plus the
//! declared resource kind used for route classification.

use serde::{Deserialize, Serialize};

use crate::store::RequestIdentity;

/// Declared resource class of an intercepted request.
///
/// Only a subset of kinds is routed to a caching strategy; everything else
/// passes through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Document,
    Worker,
    Script,
    Image,
    Style,
    Font,
    Audio,
    Video,
    Other,
}

/// An intercepted outgoing resource request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRequest {
    /// HTTP method, uppercase.
    pub method: String,

    /// Absolute request URL.
    pub url: String,

    /// Relevant request headers folded into the cache key (e.g. Accept).
    pub vary: String,

    /// Declared resource kind, as reported by the requester.
    pub kind: ResourceKind,
}

impl ResourceRequest {
    /// Build a GET request for a resource of the given kind.
    pub fn get(url: impl Into<String>, kind: ResourceKind) -> Self {
        Self { method: "GET".to_string(), url: url.into(), vary: String::new(), kind }
    }

    /// Attach a vary string (relevant header values) to the request.
    pub fn with_vary(mut self, vary: impl Into<String>) -> Self {
        self.vary = vary.into();
        self
    }

    /// The addressable identity used for store lookups.
    pub fn identity(&self) -> RequestIdentity {
        RequestIdentity {
            method: self.method.clone(),
            url: self.url.clone(),
            vary: self.vary.clone(),
        }
    }
}

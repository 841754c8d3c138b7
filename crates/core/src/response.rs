//! Captured responses with single-consumption bodies.
//!
//! A [`ResponseSnapshot`] models the platform rule that a response payload
//! can be read exactly once. Any caller that wants to both store and return
//! a response must [`duplicate`](ResponseSnapshot::duplicate) it first;
//! duplicating after the body has been read is an error, not a silent
//! corrupted second read.

use bytes::Bytes;
use std::sync::Mutex;

use crate::Error;

/// Ordered response header pairs.
pub type Headers = Vec<(String, String)>;

/// An immutable captured response: status, headers, and a body that can be
/// consumed exactly once per instance.
#[derive(Debug)]
pub struct ResponseSnapshot {
    status: u16,
    headers: Headers,
    body: Mutex<Option<Bytes>>,
}

impl ResponseSnapshot {
    pub fn new(status: u16, headers: Headers, body: impl Into<Bytes>) -> Self {
        Self { status, headers, body: Mutex::new(Some(body.into())) }
    }

    /// Synthetic response for "device is offline, fetch not attempted".
    pub fn network_unavailable() -> Self {
        Self::new(503, Vec::new(), "Network unavailable")
    }

    /// Synthetic response for "fetch attempted, transport failed".
    pub fn network_error() -> Self {
        Self::new(
            408,
            vec![("Content-Type".to_string(), "text/plain".to_string())],
            "Network error happened",
        )
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// First header value with the given name, case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether the body has already been consumed.
    pub fn body_consumed(&self) -> bool {
        self.body.lock().map(|b| b.is_none()).unwrap_or(true)
    }

    /// Consume and return the body. A second call fails with
    /// [`Error::BodyConsumed`].
    pub fn read_body(&self) -> Result<Bytes, Error> {
        self.body
            .lock()
            .map_err(|_| Error::BodyConsumed)?
            .take()
            .ok_or(Error::BodyConsumed)
    }

    /// Produce an independent snapshot with its own readable body.
    ///
    /// Fails once this instance's body has been consumed; callers must
    /// duplicate before reading or storing.
    pub fn duplicate(&self) -> Result<Self, Error> {
        let guard = self.body.lock().map_err(|_| Error::BodyConsumed)?;
        let body = guard.as_ref().ok_or(Error::BodyConsumed)?.clone();
        Ok(Self::new(self.status, self.headers.clone(), body))
    }
}

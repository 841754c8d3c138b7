//! reqwest-backed [`Network`] implementation.
//!
//! ### Behavior
//! - Any HTTP status is returned as a snapshot; only transport failures
//!   (connect, timeout, body read, oversize) become errors.
//! - The request's vary string is sent as the `Accept` header.
//! - Connectivity is host-reported: the host flips [`HttpNetwork::set_online`]
//!   when the platform's connectivity signal changes, and strategies read it
//!   as a point-in-time check.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Method, header};
use stashway_core::{AppConfig, ResourceRequest, ResponseSnapshot};

use super::{Network, TransportError};

/// Configuration for the network client.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// User agent string (default: "stashway/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            user_agent: "stashway/0.1".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(20000),
            max_redirects: 5,
        }
    }
}

impl From<&AppConfig> for NetworkConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            max_redirects: config.max_redirects,
        }
    }
}

/// HTTP network client with a host-reported connectivity flag.
pub struct HttpNetwork {
    http: Client,
    config: NetworkConfig,
    online: AtomicBool,
}

impl HttpNetwork {
    /// Create a new network client with the given configuration.
    pub fn new(config: NetworkConfig) -> Result<Self, TransportError> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| TransportError::InvalidRequest(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config, online: AtomicBool::new(true) })
    }

    /// Record the host's connectivity signal.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::Relaxed);
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, request: &ResourceRequest) -> Result<ResponseSnapshot, TransportError> {
        let start = Instant::now();

        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

        let mut builder = self.http.request(method, &request.url);
        if !request.vary.is_empty() {
            builder = builder.header(header::ACCEPT, request.vary.as_str());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(e.to_string())
            } else {
                TransportError::Connect(e.to_string())
            }
        })?;

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(TransportError::TooLarge { got: len as usize, limit: self.config.max_bytes });
        }

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        if bytes.len() > self.config.max_bytes {
            return Err(TransportError::TooLarge { got: bytes.len(), limit: self.config.max_bytes });
        }

        tracing::debug!(
            "fetched {} -> {} in {}ms ({} bytes)",
            request.url,
            status,
            start.elapsed().as_millis(),
            bytes.len()
        );

        Ok(ResponseSnapshot::new(status, headers, bytes))
    }

    fn is_online(&self) -> bool {
        self.online.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_config_default() {
        let config = NetworkConfig::default();
        assert_eq!(config.user_agent, "stashway/0.1");
        assert_eq!(config.max_bytes, 5 * 1024 * 1024);
        assert_eq!(config.timeout, Duration::from_millis(20000));
        assert_eq!(config.max_redirects, 5);
    }

    #[test]
    fn test_network_config_from_app_config() {
        let app = AppConfig { max_bytes: 1024, timeout_ms: 500, ..Default::default() };
        let config = NetworkConfig::from(&app);
        assert_eq!(config.max_bytes, 1024);
        assert_eq!(config.timeout, Duration::from_millis(500));
    }

    #[test]
    fn test_http_network_new() {
        let network = HttpNetwork::new(NetworkConfig::default());
        assert!(network.is_ok());
    }

    #[test]
    fn test_online_flag_defaults_true() {
        let network = HttpNetwork::new(NetworkConfig::default()).unwrap();
        assert!(network.is_online());
        network.set_online(false);
        assert!(!network.is_online());
    }
}

//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (STASHWAY_*)
//! 2. TOML config file (if STASHWAY_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Agent configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (STASHWAY_*)
/// 2. TOML config file (if STASHWAY_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to SQLite response store.
    ///
    /// Set via STASHWAY_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for network fetches.
    ///
    /// Set via STASHWAY_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to fetch per request.
    ///
    /// Set via STASHWAY_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Network fetch timeout in milliseconds.
    ///
    /// Set via STASHWAY_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum number of redirects to follow.
    ///
    /// Set via STASHWAY_MAX_REDIRECTS environment variable.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Base URL that precache route paths are resolved against.
    ///
    /// Set via STASHWAY_ORIGIN environment variable.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Whether install triggers precaching of the app routes.
    ///
    /// Disabled by default; precaching normally waits for the host's idle
    /// signal. Set via STASHWAY_PRECACHE_ON_INSTALL environment variable.
    #[serde(default)]
    pub precache_on_install: bool,

    /// App route paths precached into the documents partition.
    ///
    /// Set via STASHWAY_PRECACHE_ROUTES environment variable.
    #[serde(default = "default_precache_routes")]
    pub precache_routes: Vec<String>,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./stashway-cache.sqlite")
}

fn default_user_agent() -> String {
    "stashway/0.1".into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_redirects() -> usize {
    5
}

fn default_origin() -> String {
    "http://localhost:8080".into()
}

fn default_precache_routes() -> Vec<String> {
    vec!["/".into(), "/about/".into(), "/contacts/".into()]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
            max_redirects: default_max_redirects(),
            origin: default_origin(),
            precache_on_install: false,
            precache_routes: default_precache_routes(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Precache paths resolved to absolute URLs against the origin.
    pub fn precache_urls(&self) -> Vec<String> {
        let origin = self.origin.trim_end_matches('/');
        self.precache_routes
            .iter()
            .map(|path| format!("{origin}{path}"))
            .collect()
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `STASHWAY_`
    /// 2. TOML file from `STASHWAY_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("STASHWAY_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("STASHWAY_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.db_path, PathBuf::from("./stashway-cache.sqlite"));
        assert_eq!(config.user_agent, "stashway/0.1");
        assert_eq!(config.max_bytes, 5_242_880);
        assert_eq!(config.timeout_ms, 20_000);
        assert_eq!(config.max_redirects, 5);
        assert!(!config.precache_on_install);
        assert_eq!(config.precache_routes, vec!["/", "/about/", "/contacts/"]);
    }

    #[test]
    fn test_timeout_duration() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(20_000));
    }

    #[test]
    fn test_precache_urls_resolved_against_origin() {
        let config = AppConfig { origin: "https://app.example/".into(), ..Default::default() };
        let urls = config.precache_urls();
        assert_eq!(urls[0], "https://app.example/");
        assert_eq!(urls[1], "https://app.example/about/");
        assert_eq!(urls[2], "https://app.example/contacts/");
    }
}

//! Client configuration.
//!
//! `ApiConfig` is owned by `HttpClient` and can be changed at runtime with
//! `HttpClient::update_config`; readers always get a cloned snapshot.

use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3333";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const BASE_URL_ENV: &str = "STOCK_API_BASE_URL";
pub const TIMEOUT_ENV: &str = "STOCK_API_TIMEOUT_MS";

pub const PRODUCTS_ENDPOINT: &str = "/products";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a positive whole number of milliseconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },
}

/// Connection settings for `HttpClient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Sent with every request; per-call headers override these.
    pub headers: Vec<(String, String)>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            headers: Vec::new(),
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    /// Read `STOCK_API_BASE_URL` and `STOCK_API_TIMEOUT_MS`, falling back to
    /// the local defaults when unset or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(TIMEOUT_ENV).filter(|v| !v.trim().is_empty()) {
            let ms = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or_else(|| ConfigError::InvalidTimeout {
                    var: TIMEOUT_ENV,
                    value: raw.clone(),
                })?;
            config.timeout = Duration::from_millis(ms);
        }
        Ok(config)
    }

    /// Apply the fields present in `update`, leaving the rest untouched.
    pub fn apply(&mut self, update: ConfigUpdate) {
        if let Some(base_url) = update.base_url {
            self.base_url = base_url;
        }
        if let Some(timeout) = update.timeout {
            self.timeout = timeout;
        }
        if let Some(headers) = update.headers {
            self.headers = headers;
        }
    }
}

/// Partial `ApiConfig`. `None` fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct ConfigUpdate {
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
    pub headers: Option<Vec<(String, String)>>,
}

/// Sizing and expiry for `TtlCache`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub default_ttl: Duration,
    pub max_size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(5 * 60),
            max_size: 100,
        }
    }
}

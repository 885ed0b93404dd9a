//! Client configuration.
//!
//! Built once at startup, from the process environment or from explicit
//! values, and handed to [`KalshiRestClient::from_config`].
//!
//! | Variable | Required | Default |
//! |---|---|---|
//! | `KALSHI_API_KEY_ID` | yes | |
//! | `KALSHI_PRIVATE_KEY_PATH` | yes | |
//! | `KALSHI_BASE_URL` | no | [`DEMO_BASE_URL`] |
//! | `KALSHI_TIMEOUT_SECS` | no | 30 |
//! | `KALSHI_MAX_ATTEMPTS` | no | 5 |
//!
//! [`KalshiRestClient::from_config`]: crate::rest::KalshiRestClient::from_config

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::KalshiError;
use crate::rate_limit::{RateLimitConfig, RetryConfig};
use crate::rest::DEMO_BASE_URL;

/// Environment variable holding the API key id.
pub const ENV_API_KEY_ID: &str = "KALSHI_API_KEY_ID";
/// Environment variable holding the path to the PEM private key.
pub const ENV_PRIVATE_KEY_PATH: &str = "KALSHI_PRIVATE_KEY_PATH";
/// Environment variable overriding the API base URL.
pub const ENV_BASE_URL: &str = "KALSHI_BASE_URL";
/// Environment variable overriding the socket timeout.
pub const ENV_TIMEOUT_SECS: &str = "KALSHI_TIMEOUT_SECS";
/// Environment variable overriding the retry attempt budget.
pub const ENV_MAX_ATTEMPTS: &str = "KALSHI_MAX_ATTEMPTS";

/// Everything needed to build an authenticated client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL, without a trailing slash.
    pub base_url: String,
    /// API key id.
    pub key_id: String,
    /// Path to the PEM encoded RSA private key.
    pub private_key_path: PathBuf,
    /// Socket timeout for each HTTP call.
    pub timeout: Duration,
    /// Retry policy for transient failures.
    pub retry: RetryConfig,
    /// Request pacing budgets.
    pub rate_limit: RateLimitConfig,
}

impl ClientConfig {
    /// Create a configuration with default timeout, retry and pacing settings.
    pub fn new(
        base_url: impl Into<String>,
        key_id: impl Into<String>,
        private_key_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            key_id: key_id.into(),
            private_key_path: private_key_path.into(),
            timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }

    /// Load the configuration from process environment variables.
    pub fn from_env() -> Result<Self, KalshiError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load the configuration through an arbitrary variable lookup.
    ///
    /// Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, KalshiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let required = |name: &str| {
            get(name).ok_or_else(|| {
                KalshiError::Config(format!("missing required environment variable {name}"))
            })
        };

        let key_id = required(ENV_API_KEY_ID)?;
        let private_key_path = required(ENV_PRIVATE_KEY_PATH)?;
        let base_url = get(ENV_BASE_URL).unwrap_or_else(|| DEMO_BASE_URL.to_string());

        let mut config = Self::new(base_url, key_id, private_key_path);

        if let Some(secs) = get(ENV_TIMEOUT_SECS) {
            let secs: u64 = parse_number(ENV_TIMEOUT_SECS, &secs)?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(attempts) = get(ENV_MAX_ATTEMPTS) {
            config.retry.max_attempts = parse_number(ENV_MAX_ATTEMPTS, &attempts)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can produce a working client.
    pub fn validate(&self) -> Result<(), KalshiError> {
        if self.key_id.trim().is_empty() {
            return Err(KalshiError::Config("API key id must not be empty".to_string()));
        }

        let url = Url::parse(&self.base_url)
            .map_err(|e| KalshiError::Config(format!("invalid base URL {:?}: {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(KalshiError::Config(format!(
                "base URL must be http or https, got {}",
                url.scheme()
            )));
        }

        let path = &self.private_key_path;
        if !path.exists() {
            return Err(KalshiError::Config(format!(
                "private key not found at {}",
                path.display()
            )));
        }
        if !path.is_file() {
            return Err(KalshiError::Config(format!(
                "private key path is not a file: {}",
                path.display()
            )));
        }

        if self.timeout.is_zero() {
            return Err(KalshiError::Config("timeout must be greater than zero".to_string()));
        }
        if self.retry.max_attempts == 0 {
            return Err(KalshiError::Config("max attempts must be at least 1".to_string()));
        }

        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, KalshiError> {
    value
        .trim()
        .parse()
        .map_err(|_| KalshiError::Config(format!("{name} must be a positive integer, got {value:?}")))
}

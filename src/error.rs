//! Error types for the Kalshi client library.

use thiserror::Error;

/// The main error type for all Kalshi client operations.
#[derive(Error, Debug)]
pub enum KalshiError {
    /// Required configuration is missing or malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// The RSA private key could not be read or parsed
    #[error("Failed to load private key: {0}")]
    KeyLoad(String),

    /// The signing primitive rejected the canonical message
    #[error("Failed to sign request: {0}")]
    Signing(String),

    /// The API rejected the request with a non-retryable status
    #[error("Kalshi API returned HTTP {status}: {body}")]
    Client {
        /// HTTP status code
        status: u16,
        /// Response body as returned by the server
        body: String,
    },

    /// Transient failures persisted until the attempt budget ran out
    #[error("Request failed after {attempts} attempts (last status: {})", display_status(.last_status))]
    ExhaustedRetries {
        /// Last HTTP status received, `None` if no attempt got a response
        last_status: Option<u16>,
        /// Number of calls issued
        attempts: u32,
    },

    /// A successful response did not match the expected schema
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// A request was rejected locally before being sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP request with middleware failed
    #[error("HTTP request failed: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),
}

impl KalshiError {
    /// HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            KalshiError::Client { status, .. } => Some(*status),
            KalshiError::ExhaustedRetries { last_status, .. } => *last_status,
            _ => None,
        }
    }

    /// Whether the failure happened before any request could be authenticated.
    pub fn is_auth_setup(&self) -> bool {
        matches!(
            self,
            KalshiError::Config(_) | KalshiError::KeyLoad(_) | KalshiError::Signing(_)
        )
    }

    /// Whether the server rejected our credentials or signature.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, KalshiError::Client { status: 401 | 403, .. })
    }

    /// Whether the requested resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, KalshiError::Client { status: 404, .. })
    }
}

fn display_status(status: &Option<u16>) -> String {
    match status {
        Some(status) => status.to_string(),
        None => "none".to_string(),
    }
}

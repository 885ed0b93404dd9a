//! RSA-PSS signature generation for Kalshi API authentication.
//!
//! Kalshi authenticated requests carry a signature computed as:
//! ```text
//! base64(RSA-PSS-SHA256(timestamp_ms + METHOD + path))
//! ```
//!
//! `path` is the full API path (including `/trade-api/v2`) without the query
//! string. PSS uses MGF1 with SHA-256 and a salt as long as the digest, so two
//! signatures over the same message differ while both verify.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use reqwest::Method;
use rsa::signature::{RandomizedSigner, SignatureEncoding};

use crate::auth::Credentials;
use crate::error::KalshiError;

/// Header carrying the API key id.
pub const ACCESS_KEY_HEADER: &str = "KALSHI-ACCESS-KEY";
/// Header carrying the request timestamp in milliseconds.
pub const ACCESS_TIMESTAMP_HEADER: &str = "KALSHI-ACCESS-TIMESTAMP";
/// Header carrying the base64 signature.
pub const ACCESS_SIGNATURE_HEADER: &str = "KALSHI-ACCESS-SIGNATURE";

/// Build the exact string that gets signed for a request.
///
/// Any query string on `path` is dropped; the remaining pieces are
/// concatenated without delimiters.
///
/// ```rust
/// use kalshi_api_client::auth::canonical_message;
/// use reqwest::Method;
///
/// let message = canonical_message(1703123456789, &Method::GET, "/trade-api/v2/markets?limit=5");
/// assert_eq!(message, "1703123456789GET/trade-api/v2/markets");
/// ```
pub fn canonical_message(timestamp_ms: u64, method: &Method, path: &str) -> String {
    let path = path.split_once('?').map_or(path, |(path, _)| path);
    format!("{}{}{}", timestamp_ms, method.as_str(), path)
}

/// Sign a request for Kalshi's trade API.
///
/// # Arguments
///
/// * `credentials` - API credentials holding the RSA key
/// * `timestamp_ms` - Milliseconds since the UNIX epoch, fresh for this request
/// * `method` - The HTTP method
/// * `path` - The full API path (e.g., "/trade-api/v2/portfolio/balance")
///
/// # Returns
///
/// Base64-encoded RSA-PSS signature.
pub fn sign_request(
    credentials: &Credentials,
    timestamp_ms: u64,
    method: &Method,
    path: &str,
) -> Result<String, KalshiError> {
    let message = canonical_message(timestamp_ms, method, path);
    let mut rng = rand::thread_rng();
    let signature = credentials
        .signing_key()
        .try_sign_with_rng(&mut rng, message.as_bytes())
        .map_err(|e| KalshiError::Signing(e.to_string()))?;

    Ok(BASE64.encode(signature.to_bytes()))
}

/// Authentication headers for one request.
///
/// Derived per call and never reused: a new timestamp means a new signature.
#[derive(Clone)]
pub struct AuthHeaders {
    /// API key id.
    pub key_id: String,
    /// Timestamp the signature was computed over.
    pub timestamp_ms: u64,
    /// Base64 signature.
    pub signature: String,
}

impl AuthHeaders {
    /// Sign `method` + `path` at `timestamp_ms`.
    pub fn sign(
        credentials: &Credentials,
        timestamp_ms: u64,
        method: &Method,
        path: &str,
    ) -> Result<Self, KalshiError> {
        Ok(Self {
            key_id: credentials.key_id.clone(),
            timestamp_ms,
            signature: sign_request(credentials, timestamp_ms, method, path)?,
        })
    }
}

impl std::fmt::Debug for AuthHeaders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthHeaders")
            .field("timestamp_ms", &self.timestamp_ms)
            .field("signature", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::pss::Signature;
    use rsa::signature::Verifier;

    const PKCS8_PEM: &str = include_str!("../../tests/fixtures/test_key_pkcs8.pem");

    fn credentials() -> Credentials {
        Credentials::from_pem_str("test_key", PKCS8_PEM).unwrap()
    }

    fn verifies(credentials: &Credentials, message: &str, signature_b64: &str) -> bool {
        let bytes = BASE64.decode(signature_b64).unwrap();
        let signature = Signature::try_from(bytes.as_slice()).unwrap();
        credentials
            .verifying_key()
            .verify(message.as_bytes(), &signature)
            .is_ok()
    }

    #[test]
    fn test_canonical_message_concatenates_without_delimiters() {
        let message = canonical_message(1616492376594, &Method::POST, "/trade-api/v2/portfolio/orders");
        assert_eq!(message, "1616492376594POST/trade-api/v2/portfolio/orders");
    }

    #[test]
    fn test_canonical_message_strips_query() {
        let with_query = canonical_message(1, &Method::GET, "/trade-api/v2/markets?status=open&limit=15");
        let without = canonical_message(1, &Method::GET, "/trade-api/v2/markets");
        assert_eq!(with_query, without);
    }

    #[test]
    fn test_signature_verifies_against_canonical_message() {
        let credentials = credentials();
        let signature =
            sign_request(&credentials, 1703123456789, &Method::GET, "/trade-api/v2/portfolio/balance")
                .unwrap();

        // 2048-bit key -> 256 byte signature -> 344 base64 chars.
        assert_eq!(signature.len(), 344);
        assert!(verifies(
            &credentials,
            "1703123456789GET/trade-api/v2/portfolio/balance",
            &signature
        ));
    }

    #[test]
    fn test_signature_is_randomized_but_always_valid() {
        let credentials = credentials();
        let path = "/trade-api/v2/markets";
        let sig1 = sign_request(&credentials, 12345, &Method::GET, path).unwrap();
        let sig2 = sign_request(&credentials, 12345, &Method::GET, path).unwrap();

        assert_ne!(sig1, sig2);
        let message = canonical_message(12345, &Method::GET, path);
        assert!(verifies(&credentials, &message, &sig1));
        assert!(verifies(&credentials, &message, &sig2));
    }

    #[test]
    fn test_signature_bound_to_timestamp_method_and_path() {
        let credentials = credentials();
        let signature = sign_request(&credentials, 12345, &Method::GET, "/trade-api/v2/markets").unwrap();

        assert!(!verifies(&credentials, "12346GET/trade-api/v2/markets", &signature));
        assert!(!verifies(&credentials, "12345POST/trade-api/v2/markets", &signature));
        assert!(!verifies(&credentials, "12345GET/trade-api/v2/events", &signature));
    }

    #[test]
    fn test_auth_headers_debug_hides_signature() {
        let headers = AuthHeaders::sign(&credentials(), 42, &Method::GET, "/trade-api/v2/markets").unwrap();
        let debug_str = format!("{:?}", headers);
        assert!(debug_str.contains("42"));
        assert!(!debug_str.contains(&headers.signature));
    }
}

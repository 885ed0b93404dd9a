#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use futures_util::future::BoxFuture;
use rsa::pss::Signature;
use rsa::signature::Verifier;
use wiremock::{Match, MockServer, Request};

use kalshi_api_client::auth::{
    ACCESS_KEY_HEADER, ACCESS_SIGNATURE_HEADER, ACCESS_TIMESTAMP_HEADER, Credentials,
    canonical_message,
};
use kalshi_api_client::rate_limit::{RateLimitConfig, RetryConfig, Sleeper};
use kalshi_api_client::rest::KalshiRestClient;

pub const KEY_ID: &str = "test-key-id";
pub const PKCS8_PEM: &str = include_str!("../fixtures/test_key_pkcs8.pem");

pub fn credentials() -> Credentials {
    Credentials::from_pem_str(KEY_ID, PKCS8_PEM).unwrap()
}

/// Records requested delays instead of sleeping.
#[derive(Clone, Default)]
pub struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        self.delays.lock().unwrap().push(duration);
        Box::pin(async {})
    }
}

/// Deterministic retry policy: 100ms, 200ms, 400ms, ... without jitter.
pub fn retry_config(max_attempts: u32) -> RetryConfig {
    RetryConfig {
        max_attempts,
        base_delay: Duration::from_millis(100),
        max_delay: Duration::from_secs(5),
        jitter: 0.0,
    }
}

pub fn no_pacing() -> RateLimitConfig {
    RateLimitConfig {
        enabled: false,
        ..RateLimitConfig::default()
    }
}

pub fn build_client(server: &MockServer) -> KalshiRestClient {
    build_client_with(server, retry_config(5), RecordingSleeper::default())
}

pub fn build_client_with(
    server: &MockServer,
    retry: RetryConfig,
    sleeper: RecordingSleeper,
) -> KalshiRestClient {
    KalshiRestClient::builder(credentials())
        .base_url(server.uri())
        .retry_config(retry)
        .rate_limit(no_pacing())
        .sleeper(Arc::new(sleeper))
        .build()
        .unwrap()
}

/// Matches requests whose signature verifies against the canonical message
/// built from the request as received.
pub struct ValidSignature {
    credentials: Credentials,
}

impl ValidSignature {
    pub fn new() -> Self {
        Self {
            credentials: credentials(),
        }
    }
}

impl Match for ValidSignature {
    fn matches(&self, request: &Request) -> bool {
        let header = |name: &str| {
            request
                .headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };

        let (Some(key), Some(timestamp), Some(signature)) = (
            header(ACCESS_KEY_HEADER),
            header(ACCESS_TIMESTAMP_HEADER),
            header(ACCESS_SIGNATURE_HEADER),
        ) else {
            return false;
        };
        if key != KEY_ID {
            return false;
        }
        let Ok(timestamp_ms) = timestamp.parse::<u64>() else {
            return false;
        };
        let Ok(method) = reqwest::Method::from_bytes(request.method.as_str().as_bytes()) else {
            return false;
        };
        let Ok(bytes) = STANDARD.decode(signature) else {
            return false;
        };
        let Ok(signature) = Signature::try_from(bytes.as_slice()) else {
            return false;
        };

        let message = canonical_message(timestamp_ms, &method, request.url.path());
        self.credentials
            .verifying_key()
            .verify(message.as_bytes(), &signature)
            .is_ok()
    }
}

/// Number of requests the mock server has seen.
pub async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or(0)
}

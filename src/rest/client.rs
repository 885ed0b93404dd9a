//! Kalshi REST API client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, RETRY_AFTER, USER_AGENT};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{Retryable, default_on_request_failure, default_on_request_success};
use reqwest_tracing::TracingMiddleware;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::auth::{
    ACCESS_KEY_HEADER, ACCESS_SIGNATURE_HEADER, ACCESS_TIMESTAMP_HEADER, AuthHeaders, Credentials,
    IncreasingTimestamp, TimestampProvider,
};
use crate::config::ClientConfig;
use crate::error::KalshiError;
use crate::rate_limit::{
    RateLimitConfig, RequestKind, RequestPacer, RetryConfig, Sleeper, TokioSleeper,
    parse_retry_after, retry_delay,
};
use crate::rest::endpoints::{DEMO_BASE_URL, api_path, host_of};

/// The Kalshi REST API client.
///
/// Every request is signed with the account's RSA key, paced to the
/// configured read/write budgets, and retried on transient failures.
///
/// # Example
///
/// ```rust,no_run
/// use kalshi_api_client::config::ClientConfig;
/// use kalshi_api_client::rest::KalshiRestClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ClientConfig::from_env()?;
///     let client = KalshiRestClient::from_config(&config)?;
///
///     let balance = client.get_balance().await?;
///     println!("Balance: {} cents", balance.balance);
///
///     Ok(())
/// }
/// ```
///
/// Or assemble one by hand:
///
/// ```rust,no_run
/// use kalshi_api_client::auth::Credentials;
/// use kalshi_api_client::rest::{KalshiRestClient, PROD_BASE_URL};
///
/// # fn main() -> Result<(), kalshi_api_client::KalshiError> {
/// let credentials = Credentials::from_pem_file("my-key-id", "kalshi.pem")?;
/// let client = KalshiRestClient::builder(credentials)
///     .base_url(PROD_BASE_URL)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct KalshiRestClient {
    http_client: ClientWithMiddleware,
    host: String,
    credentials: Arc<Credentials>,
    timestamp_provider: Arc<dyn TimestampProvider>,
    sleeper: Arc<dyn Sleeper>,
    pacer: Arc<RequestPacer>,
    retry: RetryConfig,
}

impl KalshiRestClient {
    /// Create a new client builder.
    pub fn builder(credentials: Credentials) -> KalshiRestClientBuilder {
        KalshiRestClientBuilder::new(credentials)
    }

    /// Build a client from a validated configuration.
    ///
    /// Loads the private key from `config.private_key_path`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, KalshiError> {
        config.validate()?;
        let credentials = Credentials::from_pem_file(&config.key_id, &config.private_key_path)?;

        Self::builder(credentials)
            .base_url(&config.base_url)
            .timeout(config.timeout)
            .retry_config(config.retry.clone())
            .rate_limit(config.rate_limit.clone())
            .build()
    }

    /// The API key id requests are signed for.
    pub fn key_id(&self) -> &str {
        &self.credentials.key_id
    }

    /// Sign and send a request, retrying transient failures.
    ///
    /// `path` is relative to the API prefix (a path that already carries the
    /// prefix is used as is). The signature always covers the full path
    /// without its query string. `query` is appended after any query string
    /// already present in `path`.
    ///
    /// Outcomes:
    /// - 2xx: the body decoded as `T`, or [`KalshiError::Decode`] without a retry.
    /// - 408, 429, 5xx, connect and timeout failures: retried with backoff,
    ///   then [`KalshiError::ExhaustedRetries`] carrying the last HTTP status
    ///   seen (`None` if every attempt failed at the transport level).
    ///   A `Retry-After` hint is capped at the configured `max_delay`.
    /// - any other status: [`KalshiError::Client`] after a single call.
    pub async fn execute<T>(
        &self,
        method: Method,
        path: &str,
        query: Option<&str>,
        body: Option<&serde_json::Value>,
    ) -> Result<T, KalshiError>
    where
        T: DeserializeOwned,
    {
        let full_path = api_path(path);
        let (signed_path, inline_query) = match full_path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (full_path.as_str(), None),
        };
        let query = [inline_query, query]
            .into_iter()
            .flatten()
            .filter(|q| !q.is_empty())
            .collect::<Vec<_>>()
            .join("&");
        let url = if query.is_empty() {
            format!("{}{}", self.host, signed_path)
        } else {
            format!("{}{}?{}", self.host, signed_path, query)
        };

        let body = body.map(serde_json::to_vec).transpose().map_err(|e| {
            KalshiError::InvalidRequest(format!("request body is not serializable: {e}"))
        })?;

        let kind = RequestKind::of(&method);
        let max_attempts = self.retry.max_attempts.max(1);
        let mut last_status = None;

        for attempt in 0..max_attempts {
            self.pacer.acquire(kind, self.sleeper.as_ref()).await;

            // A fresh timestamp and signature for every attempt.
            let timestamp_ms = self.timestamp_provider.next_timestamp_ms();
            let auth = AuthHeaders::sign(&self.credentials, timestamp_ms, &method, signed_path)?;

            let mut request = self
                .http_client
                .request(method.clone(), &url)
                .header(ACCESS_KEY_HEADER, &auth.key_id)
                .header(ACCESS_TIMESTAMP_HEADER, auth.timestamp_ms.to_string())
                .header(ACCESS_SIGNATURE_HEADER, &auth.signature)
                .header(CONTENT_TYPE, "application/json");
            if let Some(body) = &body {
                request = request.body(body.clone());
            }

            debug!(%method, path = signed_path, attempt = attempt + 1, "sending request");

            let retry_after = match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let bytes = response.bytes().await?;
                        return serde_json::from_slice(&bytes).map_err(|e| {
                            KalshiError::Decode(format!("{method} {signed_path}: {e}"))
                        });
                    }

                    match default_on_request_success(&response) {
                        Some(Retryable::Transient) => {
                            last_status = Some(status.as_u16());
                            let retry_after = response
                                .headers()
                                .get(RETRY_AFTER)
                                .and_then(|value| value.to_str().ok())
                                .and_then(parse_retry_after);
                            warn!(
                                %method,
                                path = signed_path,
                                status = status.as_u16(),
                                attempt = attempt + 1,
                                max_attempts,
                                "transient response"
                            );
                            retry_after
                        }
                        _ => {
                            let body = response.text().await.unwrap_or_default();
                            debug!(%method, path = signed_path, status = status.as_u16(), "request rejected");
                            return Err(KalshiError::Client {
                                status: status.as_u16(),
                                body,
                            });
                        }
                    }
                }
                Err(err) => match default_on_request_failure(&err) {
                    Some(Retryable::Transient) => {
                        warn!(
                            %method,
                            path = signed_path,
                            error = %err,
                            attempt = attempt + 1,
                            max_attempts,
                            "transport failure"
                        );
                        None
                    }
                    _ => return Err(err.into()),
                },
            };

            if attempt + 1 < max_attempts {
                let delay = retry_delay(&self.retry, attempt, retry_after);
                debug!(delay_ms = delay.as_millis() as u64, "backing off");
                self.sleeper.sleep(delay).await;
            }
        }

        Err(KalshiError::ExhaustedRetries {
            last_status,
            attempts: max_attempts,
        })
    }

    /// Make an authenticated GET request.
    pub(crate) async fn get<T>(&self, path: &str) -> Result<T, KalshiError>
    where
        T: DeserializeOwned,
    {
        self.execute(Method::GET, path, None, None).await
    }

    /// Make an authenticated GET request with query parameters.
    pub(crate) async fn get_with_params<T, Q>(&self, path: &str, params: &Q) -> Result<T, KalshiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let query = encode_query(params)?;
        self.execute(Method::GET, path, Some(&query), None).await
    }

    /// Make an authenticated POST request with a JSON body.
    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, KalshiError>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let body = serde_json::to_value(body)
            .map_err(|e| KalshiError::InvalidRequest(format!("request body is not serializable: {e}")))?;
        self.execute(Method::POST, path, None, Some(&body)).await
    }

    /// Make an authenticated DELETE request.
    pub(crate) async fn delete<T>(&self, path: &str) -> Result<T, KalshiError>
    where
        T: DeserializeOwned,
    {
        self.execute(Method::DELETE, path, None, None).await
    }
}

/// Encode query parameters, rejecting values that cannot be form-encoded.
pub(crate) fn encode_query<Q>(params: &Q) -> Result<String, KalshiError>
where
    Q: Serialize + ?Sized,
{
    serde_urlencoded::to_string(params)
        .map_err(|e| KalshiError::InvalidRequest(format!("invalid query parameters: {e}")))
}

impl std::fmt::Debug for KalshiRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KalshiRestClient")
            .field("host", &self.host)
            .field("key_id", &self.credentials.key_id)
            .field("retry", &self.retry)
            .finish()
    }
}

/// Builder for [`KalshiRestClient`].
pub struct KalshiRestClientBuilder {
    credentials: Credentials,
    base_url: String,
    timestamp_provider: Option<Arc<dyn TimestampProvider>>,
    sleeper: Option<Arc<dyn Sleeper>>,
    user_agent: Option<String>,
    timeout: Duration,
    retry: RetryConfig,
    rate_limit: RateLimitConfig,
}

impl KalshiRestClientBuilder {
    /// Create a new builder for the demo environment.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEMO_BASE_URL.to_string(),
            timestamp_provider: None,
            sleeper: None,
            user_agent: None,
            timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }

    /// Set the base URL (useful for testing with a mock server).
    ///
    /// May be given with or without the `/trade-api/v2` suffix.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set a custom timestamp provider.
    pub fn timestamp_provider(mut self, provider: Arc<dyn TimestampProvider>) -> Self {
        self.timestamp_provider = Some(provider);
        self
    }

    /// Set the sleeper used for backoff and pacing waits.
    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the per-call socket timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry policy for transient failures.
    pub fn retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Set the request pacing budgets.
    pub fn rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<KalshiRestClient, KalshiError> {
        let mut headers = HeaderMap::new();
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("kalshi-api-client/{}", env!("CARGO_PKG_VERSION")));
        let header_value = HeaderValue::from_str(&user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("kalshi-api-client"));
        headers.insert(USER_AGENT, header_value);

        let reqwest_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(self.timeout)
            .build()?;

        // Retries are driven by `execute`, which must re-sign every attempt.
        let client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .build();

        let timestamp_provider = self
            .timestamp_provider
            .unwrap_or_else(|| Arc::new(IncreasingTimestamp::new()));
        let sleeper = self.sleeper.unwrap_or_else(|| Arc::new(TokioSleeper));

        Ok(KalshiRestClient {
            http_client: client,
            host: host_of(&self.base_url).to_string(),
            credentials: Arc::new(self.credentials),
            timestamp_provider,
            sleeper,
            pacer: Arc::new(RequestPacer::new(&self.rate_limit)),
            retry: self.retry,
        })
    }
}

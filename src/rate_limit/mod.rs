//! Retry and pacing policy for the Kalshi API.
//!
//! Kalshi enforces per-key budgets (reads and writes are counted separately)
//! and answers with HTTP 429 when a budget is exceeded. The client handles
//! this in two layers:
//!
//! - **Pacing**: a sliding window per request kind keeps us under the
//!   configured reads/writes per second before a request is sent.
//! - **Retry**: 429, 408 and 5xx responses (and transient transport failures)
//!   are retried with exponential backoff, honouring `Retry-After`.
//!
//! All waiting goes through a [`Sleeper`], so tests can observe the delays
//! without actually sleeping.
//!
//! ```rust
//! use std::time::Duration;
//! use kalshi_api_client::rate_limit::{RetryConfig, backoff_delay};
//!
//! let config = RetryConfig {
//!     jitter: 0.0,
//!     ..RetryConfig::default()
//! };
//! assert_eq!(backoff_delay(&config, 0), Duration::from_millis(250));
//! assert_eq!(backoff_delay(&config, 2), Duration::from_millis(1000));
//! ```

mod backoff;
mod pacing;

pub use backoff::{backoff_delay, parse_retry_after, retry_delay};
pub use pacing::{RequestKind, RequestPacer, SlidingWindow};

use std::time::Duration;

use futures_util::future::BoxFuture;

/// Retry policy for transient failures.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total number of calls per request, including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Upper bound for the computed backoff.
    pub max_delay: Duration,
    /// Random spread applied to the backoff, as a fraction (0.2 = ±20%).
    pub jitter: f64,
}

impl RetryConfig {
    /// A policy that issues exactly one call and never retries.
    pub fn no_retries() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(8),
            jitter: 0.2,
        }
    }
}

/// Pacing budgets, in requests per second.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Budget for GET requests.
    pub reads_per_second: u32,
    /// Budget for POST/PUT/DELETE requests.
    pub writes_per_second: u32,
    /// Whether to pace requests at all.
    pub enabled: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            reads_per_second: 20,
            writes_per_second: 10,
            enabled: true,
        }
    }
}

/// Something that can wait for a duration.
///
/// The default is [`TokioSleeper`]; tests plug in a recorder.
pub trait Sleeper: Send + Sync {
    /// Wait for `duration`.
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()>;
}

/// Sleeps on the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}

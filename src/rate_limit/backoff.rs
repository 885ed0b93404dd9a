//! Backoff computation.

use std::time::Duration;

use rand::Rng;

use super::RetryConfig;

/// Delay before retry number `attempt` (0-based).
///
/// `base_delay * 2^attempt`, capped at `max_delay`, then spread by the
/// configured jitter.
pub fn backoff_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt);
    let delay = config.base_delay.saturating_mul(factor).min(config.max_delay);
    apply_jitter(delay, config.jitter)
}

/// Parse a `Retry-After` header given in (possibly fractional) seconds.
///
/// HTTP-date values are not used by Kalshi and yield `None`, as do values
/// too large to represent. Callers cap the result at their `max_delay`.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    let seconds: f64 = value.trim().parse().ok()?;
    Duration::try_from_secs_f64(seconds).ok()
}

/// Delay before retry number `attempt`, honouring a server hint.
///
/// A `Retry-After` value replaces the computed backoff but never exceeds
/// `max_delay`.
pub fn retry_delay(config: &RetryConfig, attempt: u32, retry_after: Option<Duration>) -> Duration {
    match retry_after {
        Some(hint) => hint.min(config.max_delay),
        None => backoff_delay(config, attempt),
    }
}

fn apply_jitter(delay: Duration, jitter: f64) -> Duration {
    let jitter = jitter.clamp(0.0, 1.0);
    if jitter == 0.0 {
        return delay;
    }
    let factor = rand::thread_rng().gen_range((1.0 - jitter)..=(1.0 + jitter));
    delay.mul_f64(factor)
}

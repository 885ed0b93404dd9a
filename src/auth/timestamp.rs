//! Request timestamps for Kalshi API authentication.
//!
//! Kalshi signs `timestamp_ms + METHOD + path`, and the server checks the
//! timestamp against its own clock. Two requests must never be signed over
//! the same millisecond, yet the value must stay close to wall-clock time.
//!
//! [`IncreasingTimestamp`] follows the clock and only steps ahead of it when
//! several requests land in the same millisecond. After a burst of `n`
//! requests inside one millisecond the value leads the clock by at most `n`
//! milliseconds, and the lead shrinks back to zero as soon as the clock
//! catches up.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of request timestamps, in milliseconds since the UNIX epoch.
pub trait TimestampProvider: Send + Sync {
    /// Timestamp for the next signed request.
    fn next_timestamp_ms(&self) -> u64;
}

type Clock = Box<dyn Fn() -> u64 + Send + Sync>;

/// Wall-clock timestamps that never repeat.
pub struct IncreasingTimestamp {
    clock: Clock,
    last_issued: AtomicU64,
}

impl IncreasingTimestamp {
    /// Timestamps driven by the system clock.
    pub fn new() -> Self {
        Self::with_clock(system_millis)
    }

    /// Timestamps driven by an arbitrary millisecond clock.
    pub fn with_clock(clock: impl Fn() -> u64 + Send + Sync + 'static) -> Self {
        Self {
            clock: Box::new(clock),
            last_issued: AtomicU64::new(0),
        }
    }

    /// How far the last issued timestamp runs ahead of the clock.
    pub fn lead_ms(&self) -> u64 {
        self.last_issued
            .load(Ordering::Acquire)
            .saturating_sub((self.clock)())
    }
}

fn system_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}

impl Default for IncreasingTimestamp {
    fn default() -> Self {
        Self::new()
    }
}

impl TimestampProvider for IncreasingTimestamp {
    fn next_timestamp_ms(&self) -> u64 {
        let now = (self.clock)();
        // fetch_update retries the closure until no other thread raced us.
        let previous = self
            .last_issued
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(previous + 1)
    }
}

impl std::fmt::Debug for IncreasingTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IncreasingTimestamp")
            .field("last_issued", &self.last_issued.load(Ordering::Relaxed))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_follows_the_clock() {
        let clock = Arc::new(AtomicU64::new(1_000));
        let source = clock.clone();
        let provider = IncreasingTimestamp::with_clock(move || source.load(Ordering::SeqCst));

        assert_eq!(provider.next_timestamp_ms(), 1_000);
        clock.store(1_250, Ordering::SeqCst);
        assert_eq!(provider.next_timestamp_ms(), 1_250);
        assert_eq!(provider.lead_ms(), 0);
    }

    #[test]
    fn test_burst_leads_clock_then_recovers() {
        let clock = Arc::new(AtomicU64::new(5_000));
        let source = clock.clone();
        let provider = IncreasingTimestamp::with_clock(move || source.load(Ordering::SeqCst));

        let burst: Vec<_> = (0..4).map(|_| provider.next_timestamp_ms()).collect();
        assert_eq!(burst, [5_000, 5_001, 5_002, 5_003]);
        assert_eq!(provider.lead_ms(), 3);

        clock.store(5_010, Ordering::SeqCst);
        assert_eq!(provider.next_timestamp_ms(), 5_010);
        assert_eq!(provider.lead_ms(), 0);
    }

    #[test]
    fn test_clock_going_backwards_never_repeats() {
        let clock = Arc::new(AtomicU64::new(9_000));
        let source = clock.clone();
        let provider = IncreasingTimestamp::with_clock(move || source.load(Ordering::SeqCst));

        assert_eq!(provider.next_timestamp_ms(), 9_000);
        clock.store(8_000, Ordering::SeqCst);
        assert_eq!(provider.next_timestamp_ms(), 9_001);
    }

    #[test]
    fn test_system_clock_is_in_milliseconds() {
        let provider = IncreasingTimestamp::new();
        let before = system_millis();
        let ts = provider.next_timestamp_ms();
        assert!(ts >= before);
        assert!(ts < before + 60_000);
    }

    #[test]
    fn test_unique_across_threads() {
        let provider = Arc::new(IncreasingTimestamp::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let p = provider.clone();
                thread::spawn(move || (0..500).map(|_| p.next_timestamp_ms()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for ts in handle.join().unwrap() {
                assert!(seen.insert(ts), "timestamp reused across threads");
            }
        }
        // 2000 requests can lead the clock by at most 2000ms.
        assert!(provider.lead_ms() <= 2_000);
    }
}

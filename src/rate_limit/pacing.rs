//! Request pacing.
//!
//! Kalshi counts reads and writes against separate per-second budgets. The
//! pacer keeps one sliding window per kind and waits until a slot frees up.

use std::time::{Duration, Instant};

use reqwest::Method;
use tokio::sync::Mutex;
use tracing::debug;

use super::{RateLimitConfig, Sleeper};

/// Which budget a request counts against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// GET/HEAD requests
    Read,
    /// Everything that may change state
    Write,
}

impl RequestKind {
    /// Classify an HTTP method.
    pub fn of(method: &Method) -> Self {
        if *method == Method::GET || *method == Method::HEAD {
            RequestKind::Read
        } else {
            RequestKind::Write
        }
    }
}

/// Paces outgoing requests to the configured per-second budgets.
#[derive(Debug)]
pub struct RequestPacer {
    reads: Mutex<SlidingWindow>,
    writes: Mutex<SlidingWindow>,
    enabled: bool,
}

impl RequestPacer {
    /// Create a pacer from the given budgets.
    pub fn new(config: &RateLimitConfig) -> Self {
        let window = Duration::from_secs(1);
        Self {
            reads: Mutex::new(SlidingWindow::new(window, config.reads_per_second.max(1))),
            writes: Mutex::new(SlidingWindow::new(window, config.writes_per_second.max(1))),
            enabled: config.enabled,
        }
    }

    /// Wait until a request of `kind` fits in its budget, then claim a slot.
    pub async fn acquire(&self, kind: RequestKind, sleeper: &dyn Sleeper) {
        if !self.enabled {
            return;
        }

        let limiter = match kind {
            RequestKind::Read => &self.reads,
            RequestKind::Write => &self.writes,
        };

        loop {
            let wait = match limiter.lock().await.try_acquire() {
                Ok(()) => return,
                Err(wait) => wait,
            };
            debug!(?kind, wait_ms = wait.as_millis() as u64, "pacing request");
            sleeper.sleep(wait).await;
        }
    }
}

/// A sliding window rate limiter.
///
/// Tracks request instants within the window and allows at most
/// `max_requests` of them at any time.
#[derive(Debug)]
pub struct SlidingWindow {
    requests: Vec<Instant>,
    window: Duration,
    max_requests: u32,
}

impl SlidingWindow {
    /// Create a new sliding window.
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            requests: Vec::with_capacity(max_requests as usize),
            window,
            max_requests,
        }
    }

    /// Try to claim a slot.
    ///
    /// Returns `Err(wait)` with the time until the oldest request leaves
    /// the window when the budget is used up.
    pub fn try_acquire(&mut self) -> Result<(), Duration> {
        let window = self.window;
        self.requests.retain(|ts| ts.elapsed() < window);

        if (self.requests.len() as u32) < self.max_requests {
            self.requests.push(Instant::now());
            Ok(())
        } else {
            let wait = self
                .requests
                .first()
                .map(|oldest| window.saturating_sub(oldest.elapsed()))
                .unwrap_or_default();
            Err(wait.max(Duration::from_millis(1)))
        }
    }

    /// Slots left in the current window.
    pub fn remaining(&self) -> u32 {
        let used = self
            .requests
            .iter()
            .filter(|ts| ts.elapsed() < self.window)
            .count() as u32;
        self.max_requests.saturating_sub(used)
    }
}

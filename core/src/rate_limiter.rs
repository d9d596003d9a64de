//! Rate Limiter Module
//!
//! Enforces a fixed pause before every model request. The pause does not
//! shrink when the previous response was slow; free endpoints throttle on
//! request count, not on elapsed time.

use parking_lot::Mutex;
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Default pause before each model call
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Snapshot of limiter activity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub delay: Duration,
    pub requests: u64,
    pub last_request: Option<Instant>,
}

/// Fixed-delay limiter shared by one session
#[derive(Debug)]
pub struct RateLimiter {
    delay: Duration,
    state: Mutex<LimiterState>,
}

#[derive(Debug, Default)]
struct LimiterState {
    requests: u64,
    last_request: Option<Instant>,
}

impl RateLimiter {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: Mutex::new(LimiterState::default()),
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    /// No pause at all; for tests and local endpoints
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Sleep for the configured delay, then record the request
    pub async fn acquire(&self) {
        if !self.delay.is_zero() {
            tracing::trace!(delay_ms = self.delay.as_millis() as u64, "rate limit pause");
            sleep(self.delay).await;
        }
        let mut state = self.state.lock();
        state.requests += 1;
        state.last_request = Some(Instant::now());
    }

    pub fn status(&self) -> RateLimitStatus {
        let state = self.state.lock();
        RateLimitStatus {
            delay: self.delay,
            requests: state.requests,
            last_request: state.last_request,
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

//! Fixed-interval rate limiting
//!
//! The upstream API tolerates roughly one anonymous request per second. The
//! limiter sleeps a fixed interval after every attempt, regardless of how
//! long the attempt itself took. There is no burst allowance and no adaptive
//! backoff; the delay is a flat per-request cost.

use std::time::Duration;

/// Enforces a fixed delay between consecutive fetch attempts
#[derive(Debug, Clone)]
pub struct RateLimiter {
    interval: Duration,
}

impl RateLimiter {
    /// Creates a limiter with the given interval
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Creates a limiter from a delay in seconds
    pub fn from_seconds(seconds: f64) -> Self {
        Self::new(Duration::from_secs_f64(seconds))
    }

    /// Blocks the calling task for the configured interval
    pub async fn wait_turn(&self) {
        tokio::time::sleep(self.interval).await;
    }

    /// The configured interval
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

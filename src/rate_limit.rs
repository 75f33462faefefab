use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

/// Pacing between consecutive requests. Called once after every prompt, whatever its outcome.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn wait(&self);
}

/// Waits a fixed minimum interval after each request.
#[derive(Debug, Clone, Copy)]
pub struct FixedInterval {
    interval: Duration,
}

impl FixedInterval {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

#[async_trait]
impl RateLimiter for FixedInterval {
    async fn wait(&self) {
        if self.interval.is_zero() {
            return;
        }
        debug!("pausing {:?} before the next request", self.interval);
        tokio::time::sleep(self.interval).await;
    }
}

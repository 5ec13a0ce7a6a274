//! Request pacing between sequential queries
//!
//! Each strategy waits a random interval between queries and a fixed cooldown
//! after a 429. Sleeping suspends only the calling task.

use crate::config::PacingEntry;
use rand::Rng;
use std::time::Duration;

/// Delay policy for one search strategy
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    min_delay: Duration,
    max_delay: Duration,
    cooldown: Duration,
}

impl Pacer {
    /// Builds a pacer from a config entry; a max below the min collapses to the min
    pub fn new(entry: &PacingEntry) -> Self {
        let min_delay = Duration::from_millis(entry.min_delay_ms);
        let max_delay = Duration::from_millis(entry.max_delay_ms.max(entry.min_delay_ms));
        Self {
            min_delay,
            max_delay,
            cooldown: Duration::from_millis(entry.rate_limit_cooldown_ms),
        }
    }

    /// Picks a delay uniformly from the configured window
    pub fn next_delay(&self) -> Duration {
        if self.min_delay == self.max_delay {
            return self.min_delay;
        }
        let mut rng = rand::thread_rng();
        rng.gen_range(self.min_delay..=self.max_delay)
    }

    /// Sleeps for a random polite interval
    pub async fn polite_delay(&self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            tracing::debug!("Waiting {:?} before the next query", delay);
            tokio::time::sleep(delay).await;
        }
    }

    /// Sleeps for the rate-limit cooldown
    pub async fn cool_down(&self) {
        if !self.cooldown.is_zero() {
            tracing::warn!("Cooling down for {:?} after rate limiting", self.cooldown);
            tokio::time::sleep(self.cooldown).await;
        }
    }
}

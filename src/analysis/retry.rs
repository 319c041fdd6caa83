use crate::config::RetryConfig;
use std::time::Duration;

/// Bounded exponential backoff.
///
/// `max_retries` counts retries after the initial attempt, so a persistently
/// failing call makes `1 + max_retries` requests with delays base,
/// base×mult, base×mult², ... capped at `max_delay`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    pub fn max_retries(&self) -> u32 {
        self.config.max_retries
    }

    /// Delay before the nth retry (n starting at 0)
    pub fn delay_for(&self, retry: u32) -> Duration {
        let base = self.config.base_delay_ms as f64;
        let raw = base * self.config.multiplier.powi(retry as i32);
        let capped = raw.min(self.config.max_delay_ms as f64);
        Duration::from_millis(capped as u64)
    }
}

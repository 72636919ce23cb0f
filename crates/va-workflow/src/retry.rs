//! Retry with capped exponential backoff for ingestion digests.

use std::time::Duration;

use va_config::IngestionConfig;

/// Retry behaviour for one ingestion job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial one).
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Backoff is capped here.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::from(&IngestionConfig::default())
    }
}

impl From<&IngestionConfig> for RetryConfig {
    fn from(config: &IngestionConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: config.retry_base_delay(),
            max_delay: config.retry_max_delay(),
        }
    }
}

impl RetryConfig {
    /// Delay to wait after failed attempt number `attempt` (1-based).
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let mut delay = self.base_delay;
        for _ in 1..attempt {
            delay = std::cmp::min(delay.saturating_mul(2), self.max_delay);
        }
        std::cmp::min(delay, self.max_delay)
    }

    /// Another attempt is allowed after `attempt` failed.
    #[must_use]
    pub const fn allows_retry_after(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn backoff_doubles_then_caps() {
        let cfg = RetryConfig {
            max_attempts: 6,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(3),
        };
        let delays: Vec<_> = (1..=5).map(|a| cfg.delay_after(a).as_millis()).collect();
        assert_eq!(delays, vec![500, 1000, 2000, 3000, 3000]);
    }

    #[test]
    fn attempts_are_bounded() {
        let cfg = RetryConfig::default();
        assert_eq!(cfg.max_attempts, 3);
        assert!(cfg.allows_retry_after(2));
        assert!(!cfg.allows_retry_after(3));
    }
}

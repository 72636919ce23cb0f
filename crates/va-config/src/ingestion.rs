//! Data source ingestion timing and retry policy.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_processing_delay_ms() -> u64 {
    1000
}

const fn default_completion_delay_ms() -> u64 {
    3000
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_retry_base_delay_ms() -> u64 {
    500
}

const fn default_retry_max_delay_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IngestionConfig {
    /// Wait before a pending source is picked up.
    #[serde(default = "default_processing_delay_ms")]
    pub processing_delay_ms: u64,

    /// Wait between pickup and digestion.
    #[serde(default = "default_completion_delay_ms")]
    pub completion_delay_ms: u64,

    /// Digest attempts per source, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,

    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,

    /// Summarize sources with the text model instead of the built-in digest.
    #[serde(default)]
    pub summarize_with_model: bool,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            processing_delay_ms: default_processing_delay_ms(),
            completion_delay_ms: default_completion_delay_ms(),
            max_attempts: default_max_attempts(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
            summarize_with_model: false,
        }
    }
}

impl IngestionConfig {
    #[must_use]
    pub const fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }

    #[must_use]
    pub const fn completion_delay(&self) -> Duration {
        Duration::from_millis(self.completion_delay_ms)
    }

    #[must_use]
    pub const fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    #[must_use]
    pub const fn retry_max_delay(&self) -> Duration {
        Duration::from_millis(self.retry_max_delay_ms)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "ingestion.max_attempts".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.retry_base_delay_ms > self.retry_max_delay_ms {
            return Err(ConfigError::InvalidValue {
                field: "ingestion.retry_base_delay_ms".into(),
                reason: format!(
                    "{} exceeds retry_max_delay_ms {}",
                    self.retry_base_delay_ms, self.retry_max_delay_ms
                ),
            });
        }
        Ok(())
    }
}

//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default result limit.
const fn default_limit() -> u32 {
    20
}

fn default_export_dir() -> String {
    "exports".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Default result limit for list commands.
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Directory for exported memos and deck outlines, relative to the project.
    #[serde(default = "default_export_dir")]
    pub export_dir: String,

    /// Record every mutation in the JSONL trail.
    #[serde(default = "default_true")]
    pub trail: bool,
}

const fn default_true() -> bool {
    true
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            export_dir: default_export_dir(),
            trail: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = GeneralConfig::default();
        assert_eq!(config.default_limit, 20);
        assert_eq!(config.export_dir, "exports");
        assert!(config.trail);
    }
}

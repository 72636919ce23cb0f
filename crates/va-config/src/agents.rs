//! Founder agent simulation delays.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const fn default_voice_delay_secs() -> u64 {
    8
}

const fn default_behaviour_delay_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AgentsConfig {
    /// Time until a triggered voice call reports back.
    #[serde(default = "default_voice_delay_secs")]
    pub voice_delay_secs: u64,

    /// Time until a triggered behaviour test reports back.
    #[serde(default = "default_behaviour_delay_secs")]
    pub behaviour_delay_secs: u64,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            voice_delay_secs: default_voice_delay_secs(),
            behaviour_delay_secs: default_behaviour_delay_secs(),
        }
    }
}

impl AgentsConfig {
    #[must_use]
    pub const fn voice_delay(&self) -> Duration {
        Duration::from_secs(self.voice_delay_secs)
    }

    #[must_use]
    pub const fn behaviour_delay(&self) -> Duration {
        Duration::from_secs(self.behaviour_delay_secs)
    }
}

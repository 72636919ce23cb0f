//! Generative AI provider configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_timeout_secs() -> u64 {
    60
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_text_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_chat_model() -> String {
    "gemini-2.5-pro".to_string()
}

fn default_tts_model() -> String {
    "gemini-2.5-flash-preview-tts".to_string()
}

fn default_voice() -> String {
    "Zephyr".to_string()
}

/// Gemini API settings. One model per use so each can be swapped independently.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenAiConfig {
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Memo drafting and refinement.
    #[serde(default = "default_text_model")]
    pub text_model: String,

    /// Web-search grounded research.
    #[serde(default = "default_text_model")]
    pub research_model: String,

    /// Structured JSON output (deck outlines).
    #[serde(default = "default_chat_model")]
    pub structured_model: String,

    /// Founder interview conversation.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    #[serde(default = "default_tts_model")]
    pub tts_model: String,

    #[serde(default = "default_voice")]
    pub voice: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            text_model: default_text_model(),
            research_model: default_text_model(),
            structured_model: default_chat_model(),
            chat_model: default_chat_model(),
            tts_model: default_tts_model(),
            voice: default_voice(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GenAiConfig {
    /// Returns `true` if an API key is present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "genai.timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "genai.base_url".into(),
                reason: format!("'{}' is not an http(s) URL", self.base_url),
            });
        }
        Ok(())
    }
}

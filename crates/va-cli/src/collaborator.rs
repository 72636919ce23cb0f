//! The text and speech collaborator behind `vana`.
//!
//! Without an API key the CLI still runs: store-only commands work and every
//! model call fails with `GenAiError::NotConfigured`, which the workflow
//! records like any other collaborator error.

use va_config::GenAiConfig;
use va_genai::{
    GeminiClient, GenAiError, Generation, Prompt, SpeechAudio, SpeechSynthesizer, TextGenerator,
};

pub enum Collaborator {
    Gemini(GeminiClient),
    Offline,
}

impl Collaborator {
    pub fn from_config(config: &GenAiConfig) -> anyhow::Result<Self> {
        if !config.is_configured() {
            return Ok(Self::Offline);
        }
        Ok(Self::Gemini(GeminiClient::new(config.clone())?))
    }

    #[must_use]
    pub const fn is_online(&self) -> bool {
        matches!(self, Self::Gemini(_))
    }
}

impl TextGenerator for Collaborator {
    async fn generate(&self, prompt: Prompt) -> Result<Generation, GenAiError> {
        match self {
            Self::Gemini(client) => client.generate(prompt).await,
            Self::Offline => Err(GenAiError::NotConfigured),
        }
    }
}

impl SpeechSynthesizer for Collaborator {
    async fn synthesize(&self, text: &str) -> Result<SpeechAudio, GenAiError> {
        match self {
            Self::Gemini(client) => client.synthesize(text).await,
            Self::Offline => Err(GenAiError::NotConfigured),
        }
    }
}

#[cfg(test)]
mod tests {
    use va_config::GenAiConfig;
    use va_genai::{GenAiError, ModelRole, Prompt, TextGenerator};

    use super::Collaborator;

    #[tokio::test]
    async fn offline_without_api_key() {
        let collaborator =
            Collaborator::from_config(&GenAiConfig::default()).expect("offline should build");
        assert!(!collaborator.is_online());

        let result = collaborator
            .generate(Prompt::new(ModelRole::Text, "hello"))
            .await;
        assert!(matches!(result, Err(GenAiError::NotConfigured)));
    }

    #[test]
    fn online_with_api_key() {
        let config = GenAiConfig {
            api_key: "test-key".to_string(),
            ..GenAiConfig::default()
        };
        let collaborator = Collaborator::from_config(&config).expect("client should build");
        assert!(collaborator.is_online());
    }
}

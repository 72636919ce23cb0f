//! Multi-turn chat over a stateless generator.

use crate::{
    error::GenAiError,
    text::{ModelRole, Prompt, TextGenerator, Turn},
};

/// Conversation history plus a fixed system instruction.
///
/// A turn is recorded only after the generator answers, so a failed send
/// leaves the history untouched and can be retried.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    system_instruction: String,
    history: Vec<Turn>,
}

impl ChatSession {
    pub fn new(system_instruction: impl Into<String>) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            history: Vec::new(),
        }
    }

    #[must_use]
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// Send one user message and return the model's reply.
    ///
    /// # Errors
    ///
    /// Propagates the generator's error; history is unchanged on failure.
    pub async fn send<G: TextGenerator>(
        &mut self,
        generator: &G,
        message: &str,
    ) -> Result<String, GenAiError> {
        let prompt = Prompt::new(ModelRole::Chat, message)
            .with_system(self.system_instruction.clone())
            .with_history(self.history.clone());
        let reply = generator.generate(prompt).await?.text;
        self.history.push(Turn::user(message));
        self.history.push(Turn::model(reply.clone()));
        Ok(reply)
    }
}

//! Text generation requests, results, and the collaborator trait.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::GenAiError;

/// Which configured model a request should run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelRole {
    /// Memo drafting, refinement, source summaries.
    #[default]
    Text,
    /// Web-search grounded research.
    Research,
    /// JSON output under a response schema.
    Structured,
    /// Multi-turn interview chat.
    Chat,
}

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    User,
    Model,
}

impl TurnRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Model,
            text: text.into(),
        }
    }
}

/// One generation request.
///
/// `history` holds prior turns of a conversation; `text` is the new user turn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Prompt {
    pub role: ModelRole,
    pub system_instruction: Option<String>,
    pub history: Vec<Turn>,
    pub text: String,
    pub web_search: bool,
    pub response_schema: Option<serde_json::Value>,
}

impl Prompt {
    pub fn new(role: ModelRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_system(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    #[must_use]
    pub fn with_history(mut self, history: Vec<Turn>) -> Self {
        self.history = history;
        self
    }

    #[must_use]
    pub const fn with_web_search(mut self) -> Self {
        self.web_search = true;
        self
    }

    #[must_use]
    pub fn with_schema(mut self, schema: serde_json::Value) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

/// A web page the provider grounded its answer on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub title: String,
    pub uri: String,
}

/// Generated text plus any grounding sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generation {
    pub text: String,
    #[serde(default)]
    pub sources: Vec<GroundingSource>,
}

impl Generation {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sources: Vec::new(),
        }
    }
}

/// Anything that can turn a [`Prompt`] into text.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: Prompt) -> impl Future<Output = Result<Generation, GenAiError>> + Send;
}

impl<T: TextGenerator> TextGenerator for std::sync::Arc<T> {
    fn generate(&self, prompt: Prompt) -> impl Future<Output = Result<Generation, GenAiError>> + Send {
        (**self).generate(prompt)
    }
}

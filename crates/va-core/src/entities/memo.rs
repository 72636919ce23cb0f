use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::AgentStatus;
use crate::errors::CoreError;
use crate::preferences::{CuratedPreferences, MemoPreferences};

/// Content written into a memo stage when no source qualifies for generation.
pub const NO_SOURCES_PLACEHOLDER: &str =
    "// No sources selected to generate the memo. Please go back and select sources.";

/// Generation state of one memo stage.
///
/// `content` is non-empty only after a successful generation, or when it
/// holds the explicit no-sources placeholder (`is_placeholder`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MemoState<P> {
    pub status: AgentStatus,
    pub content: String,
    #[serde(default)]
    pub is_placeholder: bool,
    /// Message from the last failed generation, cleared on success or reset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    pub preferences: P,
}

pub type InvestmentMemo = MemoState<MemoPreferences>;
pub type CuratedMemo = MemoState<CuratedPreferences>;

impl<P> MemoState<P> {
    /// Real generated content is present.
    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.is_placeholder && !self.content.trim().is_empty()
    }

    /// Idle with nothing real to show, so visiting the stage should generate.
    #[must_use]
    pub fn needs_generation(&self) -> bool {
        self.status == AgentStatus::Idle && !self.has_content()
    }

    /// Mark a generation as in flight.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` when a generation is already
    /// pending.
    pub fn begin(&mut self, stage: &str) -> Result<(), CoreError> {
        self.transition(stage, AgentStatus::Pending)?;
        self.last_error = None;
        Ok(())
    }

    /// Store successful output. The only path to `completed`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` unless a generation is pending.
    pub fn complete(
        &mut self,
        stage: &str,
        content: String,
        now: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        self.transition(stage, AgentStatus::Completed)?;
        self.content = content;
        self.is_placeholder = false;
        self.last_error = None;
        self.generated_at = Some(now);
        Ok(())
    }

    /// Record a failed generation. Prior content is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` unless a generation is pending.
    pub fn fail(&mut self, stage: &str, message: String) -> Result<(), CoreError> {
        self.transition(stage, AgentStatus::Idle)?;
        self.last_error = Some(message);
        Ok(())
    }

    /// Write the no-sources placeholder without touching the collaborator.
    pub fn set_placeholder(&mut self) {
        self.status = AgentStatus::Idle;
        NO_SOURCES_PLACEHOLDER.clone_into(&mut self.content);
        self.is_placeholder = true;
        self.last_error = None;
    }

    /// Replace preferences, discarding content so the next visit regenerates.
    pub fn reset_with(&mut self, preferences: P) {
        self.preferences = preferences;
        self.clear();
    }

    /// Back to a blank idle stage, keeping preferences.
    pub fn clear(&mut self) {
        self.status = AgentStatus::Idle;
        self.content.clear();
        self.is_placeholder = false;
        self.last_error = None;
        self.generated_at = None;
    }

    /// Manually edit generated content.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` unless the stage has completed a
    /// generation.
    pub fn edit(&mut self, content: String) -> Result<(), CoreError> {
        if self.status != AgentStatus::Completed {
            return Err(CoreError::Validation(
                "memo can only be edited after it has been generated".into(),
            ));
        }
        self.content = content;
        Ok(())
    }

    fn transition(&mut self, stage: &str, next: AgentStatus) -> Result<(), CoreError> {
        if !self.status.can_transition_to(next) {
            return Err(CoreError::InvalidTransition {
                entity_type: "memo".into(),
                id: stage.to_string(),
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        Ok(())
    }
}

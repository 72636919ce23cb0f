//! Cross-cutting error types for Analytica.
//!
//! Crate-specific errors (`StoreError`, `GenAiError`, `WorkflowError`) live in
//! their own crates and wrap `CoreError` where domain rules are violated.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::enums::Stage;

/// Errors raised by domain rules.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A state machine transition was attempted that is not allowed.
    #[error("Invalid state transition: {entity_type} {id} from {from} to {to}")]
    InvalidTransition {
        entity_type: String,
        id: String,
        from: String,
        to: String,
    },

    /// A forward stage move whose precondition is not met.
    #[error("Cannot move from {from} to {to}: {reason}")]
    StageGate {
        from: Stage,
        to: Stage,
        reason: String,
    },

    /// Data failed validation (schema, format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Per-field validation failures from a form-like input.
    #[error("Validation failed: {0}")]
    Fields(FieldErrors),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    pub fn not_found(entity_type: &str, id: &str) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }
}

/// Field name to message, ordered by field for stable output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors(pub BTreeMap<String, String>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &str, message: &str) {
        self.0.insert(field.to_string(), message.to_string());
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `Ok(())` when no field failed, otherwise `CoreError::Fields`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Fields` carrying every recorded failure.
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Fields(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

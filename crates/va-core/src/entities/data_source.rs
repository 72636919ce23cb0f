use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{SourceStatus, SourceType};
use crate::errors::CoreError;

/// Characters of content kept when a summary is derived without ingestion.
pub const DEFAULT_SUMMARY_CHARS: usize = 100;

/// One piece of input evidence attached to a report.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DataSource {
    pub id: String,
    pub source_type: SourceType,
    /// URL string, inline text, or `data:` URI for encoded file bodies.
    pub content: String,
    pub filename: Option<String>,
    pub summary: Option<String>,
    pub status: SourceStatus,
    pub is_selected: bool,
    /// Set only when `status` is `failed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    #[serde(default)]
    pub attempts: u32,
    pub created_at: DateTime<Utc>,
}

impl DataSource {
    /// A freshly added source awaiting ingestion. New sources start selected.
    #[must_use]
    pub fn pending(
        id: String,
        source_type: SourceType,
        content: String,
        filename: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            source_type,
            content,
            filename,
            summary: None,
            status: SourceStatus::Pending,
            is_selected: true,
            failure_reason: None,
            attempts: 0,
            created_at: now,
        }
    }

    /// A source whose content is already usable (founder uploads, research
    /// results, agent outputs). The summary is derived from the content.
    #[must_use]
    pub fn completed(
        id: String,
        source_type: SourceType,
        content: String,
        filename: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let summary = Some(default_summary(&content));
        Self {
            summary,
            status: SourceStatus::Completed,
            ..Self::pending(id, source_type, content, filename, now)
        }
    }

    /// Display label: the filename, falling back to the source type.
    #[must_use]
    pub fn label(&self) -> &str {
        self.filename
            .as_deref()
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| self.source_type.as_str())
    }

    /// Selected and fully ingested, so it can feed a prompt.
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.is_selected && self.status == SourceStatus::Completed
    }

    /// Move to `next`, enforcing the forward-only lifecycle.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` if `next` is not reachable
    /// from the current status.
    pub fn transition(&mut self, next: SourceStatus) -> Result<(), CoreError> {
        if !self.status.can_transition_to(next) {
            return Err(CoreError::InvalidTransition {
                entity_type: "data_source".into(),
                id: self.id.clone(),
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        Ok(())
    }

    /// pending → processing.
    ///
    /// # Errors
    ///
    /// See [`DataSource::transition`].
    pub fn mark_processing(&mut self) -> Result<(), CoreError> {
        self.transition(SourceStatus::Processing)
    }

    /// processing → completed, storing the summary.
    ///
    /// # Errors
    ///
    /// See [`DataSource::transition`].
    pub fn complete(&mut self, summary: String) -> Result<(), CoreError> {
        self.transition(SourceStatus::Completed)?;
        self.summary = Some(summary);
        self.failure_reason = None;
        Ok(())
    }

    /// pending/processing → failed, storing the reason.
    ///
    /// # Errors
    ///
    /// See [`DataSource::transition`].
    pub fn fail(&mut self, reason: String) -> Result<(), CoreError> {
        self.transition(SourceStatus::Failed)?;
        self.failure_reason = Some(reason);
        Ok(())
    }
}

/// First `DEFAULT_SUMMARY_CHARS` characters of `content`, followed by `...`.
#[must_use]
pub fn default_summary(content: &str) -> String {
    format!("{}...", truncate_chars(content, DEFAULT_SUMMARY_CHARS))
}

/// Prefix of `s` holding at most `max` characters, split on a char boundary.
#[must_use]
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn source(status: SourceStatus) -> DataSource {
        let mut s = DataSource::pending(
            "src-00000001".into(),
            SourceType::Text,
            "Acme builds rockets".into(),
            None,
            Utc::now(),
        );
        s.status = status;
        s
    }

    #[test]
    fn pending_sources_start_selected() {
        let s = source(SourceStatus::Pending);
        assert!(s.is_selected);
        assert_eq!(s.summary, None);
        assert!(!s.is_eligible());
    }

    #[test]
    fn completed_constructor_derives_summary() {
        let content = "x".repeat(150);
        let s = DataSource::completed(
            "src-00000002".into(),
            SourceType::Research,
            content,
            Some("Research".into()),
            Utc::now(),
        );
        assert_eq!(s.status, SourceStatus::Completed);
        assert_eq!(s.summary.as_deref(), Some(format!("{}...", "x".repeat(100)).as_str()));
        assert!(s.is_eligible());
    }

    #[test]
    fn lifecycle_moves_forward() {
        let mut s = source(SourceStatus::Pending);
        s.mark_processing().unwrap();
        s.complete("done".into()).unwrap();
        assert_eq!(s.status, SourceStatus::Completed);
        assert_eq!(s.summary.as_deref(), Some("done"));
    }

    #[test]
    fn completed_source_cannot_regress() {
        let mut s = source(SourceStatus::Completed);
        let err = s.mark_processing().unwrap_err();
        assert!(matches!(err, CoreError::InvalidTransition { .. }));
        assert_eq!(s.status, SourceStatus::Completed);
    }

    #[test]
    fn fail_records_reason() {
        let mut s = source(SourceStatus::Processing);
        s.fail("unreadable".into()).unwrap();
        assert_eq!(s.status, SourceStatus::Failed);
        assert_eq!(s.failure_reason.as_deref(), Some("unreadable"));
        assert!(s.fail("again".into()).is_err());
    }

    #[test]
    fn pending_cannot_skip_processing() {
        let mut s = source(SourceStatus::Pending);
        assert!(s.complete("early".into()).is_err());
        assert_eq!(s.summary, None);
    }

    #[test]
    fn label_falls_back_to_type() {
        let mut s = source(SourceStatus::Pending);
        assert_eq!(s.label(), "text");
        s.filename = Some("deck.pdf".into());
        assert_eq!(s.label(), "deck.pdf");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 10), "hi");
    }
}

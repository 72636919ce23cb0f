use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::data_source::DataSource;
use crate::entities::memo::{CuratedMemo, InvestmentMemo};
use crate::enums::{AgentStatus, ReportOrigin, SourceStatus, SourceType, Stage};
use crate::errors::CoreError;

/// Contact details for the founder behind a report.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FounderContact {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl FounderContact {
    #[must_use]
    pub fn has_email(&self) -> bool {
        !self.email.trim().is_empty()
    }
}

/// State of an out-of-band founder agent (voice call, behaviour test).
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AgentRun {
    pub status: AgentStatus,
    pub last_triggered: Option<DateTime<Utc>>,
}

impl AgentRun {
    #[must_use]
    pub const fn completed() -> Self {
        Self {
            status: AgentStatus::Completed,
            last_triggered: None,
        }
    }
}

/// The aggregate an analyst works on: company identity, evidence, and the
/// two generated memo stages.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Report {
    pub id: String,
    pub title: String,
    pub company_name: String,
    pub description: Option<String>,
    pub founder: FounderContact,
    pub origin: ReportOrigin,
    pub current_stage: Stage,
    /// Insertion order is display order.
    pub data_sources: Vec<DataSource>,
    pub founder_voice: AgentRun,
    pub founder_behaviour_test: AgentRun,
    pub investment_memo: InvestmentMemo,
    pub curated_memo: CuratedMemo,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Report {
    /// An empty analyst report at stage 0 with default memo preferences.
    #[must_use]
    pub fn new(id: String, company_name: String, title: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title,
            company_name,
            description: None,
            founder: FounderContact::default(),
            origin: ReportOrigin::Analyst,
            current_stage: Stage::DataCollection,
            data_sources: Vec::new(),
            founder_voice: AgentRun::default(),
            founder_behaviour_test: AgentRun::default(),
            investment_memo: InvestmentMemo::default(),
            curated_memo: CuratedMemo::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// `{company} - Initial Analysis`
    #[must_use]
    pub fn initial_analysis_title(company: &str) -> String {
        format!("{company} - Initial Analysis")
    }

    /// `{company} - Founder Submission`
    #[must_use]
    pub fn founder_submission_title(company: &str) -> String {
        format!("{company} - Founder Submission")
    }

    /// `{company} - Analyst Report`
    #[must_use]
    pub fn analyst_report_title(company: &str) -> String {
        format!("{company} - Analyst Report")
    }

    #[must_use]
    pub fn is_founder_submission(&self) -> bool {
        self.origin == ReportOrigin::FounderSubmission
    }

    /// Case-insensitive match on title or company name. An empty query matches.
    #[must_use]
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.title.to_lowercase().contains(&query)
            || self.company_name.to_lowercase().contains(&query)
    }

    // -----------------------------------------------------------------------
    // Source lookups
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn source(&self, source_id: &str) -> Option<&DataSource> {
        self.data_sources.iter().find(|s| s.id == source_id)
    }

    /// Mutable lookup by id.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if the report has no such source.
    pub fn source_mut(&mut self, source_id: &str) -> Result<&mut DataSource, CoreError> {
        self.data_sources
            .iter_mut()
            .find(|s| s.id == source_id)
            .ok_or_else(|| CoreError::not_found("data_source", source_id))
    }

    /// Selected, completed sources in display order.
    pub fn eligible_sources(&self) -> impl Iterator<Item = &DataSource> {
        self.data_sources.iter().filter(|s| s.is_eligible())
    }

    /// Ids of sources still waiting for ingestion.
    #[must_use]
    pub fn pending_source_ids(&self) -> Vec<String> {
        self.data_sources
            .iter()
            .filter(|s| s.status == SourceStatus::Pending)
            .map(|s| s.id.clone())
            .collect()
    }

    /// At least one source is selected and completed.
    #[must_use]
    pub fn can_proceed(&self) -> bool {
        self.eligible_sources().next().is_some()
    }

    /// Non-empty and every source selected.
    #[must_use]
    pub fn all_selected(&self) -> bool {
        !self.data_sources.is_empty() && self.data_sources.iter().all(|s| s.is_selected)
    }

    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.data_sources.iter().filter(|s| s.is_selected).count()
    }

    #[must_use]
    pub fn has_source_type(&self, source_type: SourceType) -> bool {
        self.data_sources.iter().any(|s| s.source_type == source_type)
    }

    #[must_use]
    pub fn has_transcript(&self) -> bool {
        self.has_source_type(SourceType::Transcript)
    }

    #[must_use]
    pub fn has_assessment(&self) -> bool {
        self.has_source_type(SourceType::Assessment)
    }

    // -----------------------------------------------------------------------
    // Source mutations
    // -----------------------------------------------------------------------

    pub fn add_source(&mut self, source: DataSource) {
        self.data_sources.push(source);
    }

    /// Remove exactly one source, preserving the order of the rest.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if the report has no such source.
    pub fn delete_source(&mut self, source_id: &str) -> Result<DataSource, CoreError> {
        let idx = self
            .data_sources
            .iter()
            .position(|s| s.id == source_id)
            .ok_or_else(|| CoreError::not_found("data_source", source_id))?;
        Ok(self.data_sources.remove(idx))
    }

    /// Flip one source's selection. Returns the new value.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if the report has no such source.
    pub fn toggle_select(&mut self, source_id: &str) -> Result<bool, CoreError> {
        let source = self.source_mut(source_id)?;
        source.is_selected = !source.is_selected;
        Ok(source.is_selected)
    }

    pub fn select_all(&mut self, selected: bool) {
        for source in &mut self.data_sources {
            source.is_selected = selected;
        }
    }

    /// Change a source's display label.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for a blank name and
    /// `CoreError::NotFound` for an unknown source.
    pub fn rename_source(&mut self, source_id: &str, name: &str) -> Result<(), CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("source name must not be empty".into()));
        }
        self.source_mut(source_id)?.filename = Some(name.to_string());
        Ok(())
    }

    /// Drop both memo stages back to blank, keeping their preferences.
    pub fn reset_memos(&mut self) {
        self.investment_memo.clear();
        self.curated_memo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn report_with_sources(specs: &[(&str, SourceStatus, bool)]) -> Report {
        let now = Utc::now();
        let mut report = Report::new(
            "rep-00000001".into(),
            "Acme".into(),
            Report::initial_analysis_title("Acme"),
            now,
        );
        for &(id, status, selected) in specs {
            let mut s = DataSource::pending(
                id.into(),
                SourceType::Text,
                format!("content of {id}"),
                None,
                now,
            );
            s.status = status;
            s.is_selected = selected;
            report.add_source(s);
        }
        report
    }

    fn ids(report: &Report) -> Vec<&str> {
        report.data_sources.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn titles() {
        assert_eq!(Report::initial_analysis_title("Acme"), "Acme - Initial Analysis");
        assert_eq!(Report::founder_submission_title("Acme"), "Acme - Founder Submission");
        assert_eq!(Report::analyst_report_title("Acme"), "Acme - Analyst Report");
    }

    #[test]
    fn can_proceed_needs_selected_completed_source() {
        let report = report_with_sources(&[
            ("a", SourceStatus::Completed, false),
            ("b", SourceStatus::Pending, true),
        ]);
        assert!(!report.can_proceed());

        let report = report_with_sources(&[
            ("a", SourceStatus::Pending, true),
            ("b", SourceStatus::Completed, true),
        ]);
        assert!(report.can_proceed());
    }

    #[test]
    fn delete_preserves_order() {
        let mut report = report_with_sources(&[
            ("a", SourceStatus::Pending, true),
            ("b", SourceStatus::Pending, true),
            ("c", SourceStatus::Pending, true),
        ]);
        let removed = report.delete_source("b").unwrap();
        assert_eq!(removed.id, "b");
        assert_eq!(ids(&report), vec!["a", "c"]);
        assert!(report.delete_source("b").is_err());
    }

    #[test]
    fn select_all_sets_every_flag() {
        let mut report = report_with_sources(&[
            ("a", SourceStatus::Pending, false),
            ("b", SourceStatus::Completed, true),
        ]);
        report.select_all(true);
        assert!(report.all_selected());
        report.select_all(false);
        assert_eq!(report.selected_count(), 0);
    }

    #[test]
    fn all_selected_is_false_when_empty() {
        let report = report_with_sources(&[]);
        assert!(!report.all_selected());
    }

    #[test]
    fn toggle_returns_new_value() {
        let mut report = report_with_sources(&[("a", SourceStatus::Pending, true)]);
        assert!(!report.toggle_select("a").unwrap());
        assert!(report.toggle_select("a").unwrap());
        assert!(report.toggle_select("zzz").is_err());
    }

    #[test]
    fn rename_sets_label_only() {
        let mut report = report_with_sources(&[("a", SourceStatus::Pending, true)]);
        report.rename_source("a", "  Pitch deck ").unwrap();
        let source = report.source("a").unwrap();
        assert_eq!(source.label(), "Pitch deck");
        assert_eq!(source.content, "content of a");
        assert!(report.rename_source("a", "   ").is_err());
    }

    #[test]
    fn search_matches_title_or_company() {
        let report = report_with_sources(&[]);
        assert!(report.matches_search("acme"));
        assert!(report.matches_search("initial"));
        assert!(report.matches_search(""));
        assert!(!report.matches_search("globex"));
    }

    #[test]
    fn pending_ids_in_order() {
        let report = report_with_sources(&[
            ("a", SourceStatus::Pending, true),
            ("b", SourceStatus::Completed, true),
            ("c", SourceStatus::Pending, false),
        ]);
        assert_eq!(report.pending_source_ids(), vec!["a".to_string(), "c".to_string()]);
    }
}

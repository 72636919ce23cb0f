//! Report lifecycle: creation, listing, founder-submission copies.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use va_core::entities::{CuratedMemo, InvestmentMemo, Report};
use va_core::enums::{ReportOrigin, Stage};
use va_core::errors::{CoreError, FieldErrors};
use va_core::ids::{self, PREFIX_REPORT, PREFIX_SOURCE};
use va_core::registration::{description_source, is_valid_email};
use va_core::trail::TrailOperation;
use va_genai::TextGenerator;
use va_store::ReportRepository;

use crate::{Workflow, WorkflowError};

/// Shown in place of a founder name the analyst left blank.
pub const FOUNDER_NAME_PLACEHOLDER: &str = "Founder Name";

/// Analyst input for a new report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReport {
    pub company_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub founder_name: String,
    #[serde(default)]
    pub founder_email: String,
    #[serde(default)]
    pub founder_phone: String,
}

impl NewReport {
    fn validate(&self) -> Result<(), CoreError> {
        let mut errors = FieldErrors::new();
        if self.company_name.trim().is_empty() {
            errors.insert("company_name", "Company name is required.");
        }
        let email = self.founder_email.trim();
        if !email.is_empty() && !is_valid_email(email) {
            errors.insert("founder_email", "Email address is invalid.");
        }
        errors.into_result()
    }
}

impl<R, G> Workflow<R, G>
where
    R: ReportRepository,
    G: TextGenerator + 'static,
{
    /// Create an analyst report at stage 0. A description becomes a
    /// completed text source so it can feed the memo right away.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Fields` for a blank company name or a malformed
    /// e-mail, or a store error.
    pub async fn create_report(&self, input: NewReport) -> Result<Report, WorkflowError> {
        input.validate()?;
        let now = Utc::now();
        let company = input.company_name.trim().to_string();
        let mut report = Report::new(
            ids::generate(PREFIX_REPORT)?,
            company.clone(),
            Report::initial_analysis_title(&company),
            now,
        );

        let name = input.founder_name.trim();
        report.founder.name = if name.is_empty() {
            FOUNDER_NAME_PLACEHOLDER.to_string()
        } else {
            name.to_string()
        };
        report.founder.email = input.founder_email.trim().to_string();
        report.founder.phone = input.founder_phone.trim().to_string();

        let description = input.description.trim();
        if !description.is_empty() {
            report.add_source(description_source(
                ids::generate(PREFIX_SOURCE)?,
                description,
                now,
            ));
            report.description = Some(description.to_string());
        }

        Ok(self.store.create(report).await?)
    }

    /// Analyst reports, newest first, filtered on title or company.
    /// Founder submissions are listed separately.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn list_reports(&self, search: &str) -> Result<Vec<Report>, WorkflowError> {
        Ok(self
            .store
            .list()
            .await?
            .into_iter()
            .filter(|r| !r.is_founder_submission() && r.matches_search(search))
            .collect())
    }

    /// Founder submissions, newest first, filtered on company name.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn list_submissions(&self, search: &str) -> Result<Vec<Report>, WorkflowError> {
        let query = search.trim().to_lowercase();
        Ok(self
            .store
            .list()
            .await?
            .into_iter()
            .filter(|r| {
                r.is_founder_submission() && r.company_name.to_lowercase().contains(&query)
            })
            .collect())
    }

    /// # Errors
    ///
    /// Returns a not-found store error for an unknown id.
    pub async fn get_report(&self, report_id: &str) -> Result<Report, WorkflowError> {
        Ok(self.store.get(report_id).await?)
    }

    /// # Errors
    ///
    /// Returns a not-found store error for an unknown id.
    pub async fn delete_report(&self, report_id: &str) -> Result<Report, WorkflowError> {
        Ok(self.store.delete(report_id).await?)
    }

    /// Copy a founder submission into a fresh analyst report: new id, stage
    /// 0, memos back to their defaults. The submission itself is untouched.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if `submission_id` is not a founder
    /// submission, or a store error.
    pub async fn create_from_submission(
        &self,
        submission_id: &str,
    ) -> Result<Report, WorkflowError> {
        let submission = self.store.get(submission_id).await?;
        if !submission.is_founder_submission() {
            return Err(CoreError::Validation(format!(
                "{submission_id} is not a founder submission"
            ))
            .into());
        }

        let now = Utc::now();
        let mut report = submission;
        report.id = ids::generate(PREFIX_REPORT)?;
        report.title = Report::analyst_report_title(&report.company_name);
        report.origin = ReportOrigin::FromSubmission;
        report.current_stage = Stage::DataCollection;
        report.investment_memo = InvestmentMemo::default();
        report.curated_memo = CuratedMemo::default();
        report.created_at = now;
        report.updated_at = now;

        tracing::info!(from = %submission_id, report_id = %report.id, "analyst report created from submission");
        Ok(self.store.create(report).await?)
    }

    /// Trail history for a report, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a store error if the trail file is unreadable.
    pub fn history(&self, report_id: &str) -> Result<Vec<TrailOperation>, WorkflowError> {
        Ok(self.store.history(report_id)?)
    }
}

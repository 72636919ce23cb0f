//! Founder registration: turning a finished wizard into a stored report.

use std::path::Path;

use chrono::Utc;
use va_core::assessment::AssessmentAnswers;
use va_core::entities::{DataSource, Report};
use va_core::ids::{self, PREFIX_REPORT, PREFIX_SOURCE};
use va_core::registration::{RegistrationState, file_source};
use va_genai::TextGenerator;
use va_store::ReportRepository;

use crate::sources::{data_uri, read_document};
use crate::{Workflow, WorkflowError};

/// A document the founder uploads in step 1, read into a completed file source.
///
/// # Errors
///
/// Returns the I/O error if the file cannot be read.
pub fn uploaded_file(path: &Path) -> Result<DataSource, WorkflowError> {
    let (name, mime, bytes) = read_document(path)?;
    Ok(file_source(
        ids::generate(PREFIX_SOURCE)?,
        &name,
        Some(data_uri(&mime, &bytes)),
        Utc::now(),
    ))
}

/// The behavioural questionnaire as a completed assessment source.
///
/// # Errors
///
/// Returns `CoreError::Validation` while any question is unanswered.
pub fn assessment_source(answers: &AssessmentAnswers) -> Result<DataSource, WorkflowError> {
    Ok(answers.to_source(ids::generate(PREFIX_SOURCE)?, Utc::now())?)
}

impl<R, G> Workflow<R, G>
where
    R: ReportRepository,
    G: TextGenerator + 'static,
{
    /// Store a finished wizard as a founder-submission report.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` naming the first unfinished step, or
    /// a store error.
    pub async fn submit_registration(&self, state: RegistrationState) -> Result<Report, WorkflowError> {
        let submission = state.into_submission()?;
        let report = submission.into_report(
            ids::generate(PREFIX_REPORT)?,
            ids::generate(PREFIX_SOURCE)?,
            Utc::now(),
        );
        tracing::info!(
            report_id = %report.id,
            sources = report.data_sources.len(),
            "founder submission received"
        );
        Ok(self.store.create(report).await?)
    }
}

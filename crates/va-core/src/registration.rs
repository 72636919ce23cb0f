//! Founder registration wizard.
//!
//! Three linear steps, each producing a typed output:
//!
//! ```text
//! company_info ──▶ voice_interview ──▶ behavioural_test ──▶ submission
//!      ▲                 │  (skip allowed)    │
//!      └─────────────────┴────── back ────────┘
//! ```
//!
//! The wizard is a pure reducer over [`RegistrationAction`]s. Earlier
//! outputs survive a step back so the founder can revise them.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{AgentRun, DataSource, FounderContact, Report};
use crate::enums::{ReportOrigin, SourceType};
use crate::errors::{CoreError, FieldErrors};

pub const DEFAULT_COUNTRY_CODE: &str = "+1";
pub const DESCRIPTION_FILENAME: &str = "Company Description";

static EMAIL_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").ok());

/// Loose shape check used on founder e-mail addresses.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.as_ref().is_some_and(|re| re.is_match(email))
}

/// Completed text source holding a company description.
#[must_use]
pub fn description_source(id: String, description: &str, now: DateTime<Utc>) -> DataSource {
    DataSource::completed(
        id,
        SourceType::Text,
        description.to_string(),
        Some(DESCRIPTION_FILENAME.to_string()),
        now,
    )
}

/// Completed file source for an uploaded document. Without readable content
/// the body is a stand-in naming the file.
#[must_use]
pub fn file_source(
    id: String,
    name: &str,
    content: Option<String>,
    now: DateTime<Utc>,
) -> DataSource {
    let content = content.unwrap_or_else(|| format!("(Simulated content for {name})"));
    DataSource::completed(id, SourceType::File, content, Some(name.to_string()), now)
}

// ---------------------------------------------------------------------------
// Step 1: company info
// ---------------------------------------------------------------------------

/// Raw step-1 input as the founder typed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CompanyInfoForm {
    pub company_name: String,
    pub description: String,
    pub founder_name: String,
    pub country_code: String,
    pub phone: String,
    pub founder_email: String,
    pub files: Vec<DataSource>,
}

impl Default for CompanyInfoForm {
    fn default() -> Self {
        Self {
            company_name: String::new(),
            description: String::new(),
            founder_name: String::new(),
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            phone: String::new(),
            founder_email: String::new(),
            files: Vec::new(),
        }
    }
}

/// Validated step-1 output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CompanyInfo {
    pub company_name: String,
    pub description: String,
    pub founder_name: String,
    pub country_code: String,
    pub phone: String,
    pub founder_email: String,
    pub files: Vec<DataSource>,
}

impl CompanyInfo {
    /// Dial code and number concatenated, e.g. `+15551234`.
    #[must_use]
    pub fn founder_phone(&self) -> String {
        format!("{}{}", self.country_code, self.phone)
    }
}

impl CompanyInfoForm {
    /// Check required fields and the e-mail shape, reporting every failing
    /// field at once.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Fields` keyed by `company_name`, `founder_phone`,
    /// and `founder_email`.
    pub fn validate(&self) -> Result<CompanyInfo, CoreError> {
        let mut errors = FieldErrors::new();
        let company_name = self.company_name.trim();
        let phone = self.phone.trim();
        let email = self.founder_email.trim();

        if company_name.is_empty() {
            errors.insert("company_name", "Company Name is required.");
        }
        if phone.is_empty() {
            errors.insert("founder_phone", "Founder Phone is required.");
        }
        if email.is_empty() {
            errors.insert("founder_email", "Founder Email is required.");
        } else if !is_valid_email(email) {
            errors.insert("founder_email", "Email is invalid.");
        }
        errors.into_result()?;

        let code = self.country_code.trim();
        let code = if code.is_empty() { DEFAULT_COUNTRY_CODE } else { code };
        Ok(CompanyInfo {
            company_name: company_name.to_string(),
            description: self.description.trim().to_string(),
            founder_name: self.founder_name.trim().to_string(),
            country_code: code.to_string(),
            phone: phone.to_string(),
            founder_email: email.to_string(),
            files: self.files.clone(),
        })
    }
}

impl From<&CompanyInfo> for CompanyInfoForm {
    /// Pre-fill the form when the founder steps back.
    fn from(info: &CompanyInfo) -> Self {
        Self {
            company_name: info.company_name.clone(),
            description: info.description.clone(),
            founder_name: info.founder_name.clone(),
            country_code: info.country_code.clone(),
            phone: info.phone.clone(),
            founder_email: info.founder_email.clone(),
            files: info.files.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Wizard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStep {
    #[default]
    CompanyInfo,
    VoiceInterview,
    BehaviouralTest,
}

impl RegistrationStep {
    /// One-based step number shown to the founder.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::CompanyInfo => 1,
            Self::VoiceInterview => 2,
            Self::BehaviouralTest => 3,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CompanyInfo => "company_info",
            Self::VoiceInterview => "voice_interview",
            Self::BehaviouralTest => "behavioural_test",
        }
    }
}

/// Input to the wizard reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationAction {
    SubmitCompanyInfo(CompanyInfoForm),
    /// Interview transcript, or `None` when the founder skipped the call.
    FinishInterview(Option<DataSource>),
    SubmitAssessment(DataSource),
    Back(RegistrationStep),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RegistrationState {
    pub step: RegistrationStep,
    pub company: Option<CompanyInfo>,
    /// `Some(None)` records a skipped interview.
    pub interview: Option<Option<DataSource>>,
    pub assessment: Option<DataSource>,
}

impl RegistrationState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one action.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Fields` for invalid company info,
    /// `CoreError::InvalidTransition` for an action that does not belong to
    /// the current step, and `CoreError::Validation` for a wrong source kind.
    pub fn reduce(mut self, action: RegistrationAction) -> Result<Self, CoreError> {
        match (self.step, action) {
            (RegistrationStep::CompanyInfo, RegistrationAction::SubmitCompanyInfo(form)) => {
                self.company = Some(form.validate()?);
                self.step = RegistrationStep::VoiceInterview;
            }
            (RegistrationStep::VoiceInterview, RegistrationAction::FinishInterview(transcript)) => {
                if let Some(t) = &transcript {
                    expect_type(t, SourceType::Transcript)?;
                }
                self.interview = Some(transcript);
                self.step = RegistrationStep::BehaviouralTest;
            }
            (RegistrationStep::BehaviouralTest, RegistrationAction::SubmitAssessment(source)) => {
                expect_type(&source, SourceType::Assessment)?;
                self.assessment = Some(source);
            }
            (current, RegistrationAction::Back(target)) if target < current => {
                self.step = target;
            }
            (current, action) => {
                return Err(CoreError::InvalidTransition {
                    entity_type: "registration".into(),
                    id: current.as_str().into(),
                    from: current.as_str().into(),
                    to: action_label(&action).into(),
                });
            }
        }
        Ok(self)
    }

    /// All three steps are done.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.company.is_some() && self.interview.is_some() && self.assessment.is_some()
    }

    /// Collapse the finished wizard into a submission.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` naming the first unfinished step.
    pub fn into_submission(self) -> Result<FounderSubmission, CoreError> {
        let company = self
            .company
            .ok_or_else(|| CoreError::Validation("company info has not been submitted".into()))?;
        let transcript = self
            .interview
            .ok_or_else(|| CoreError::Validation("voice interview has not been finished".into()))?;
        let assessment = self
            .assessment
            .ok_or_else(|| CoreError::Validation("behavioural test has not been submitted".into()))?;
        Ok(FounderSubmission {
            company,
            transcript,
            assessment,
        })
    }
}

fn expect_type(source: &DataSource, expected: SourceType) -> Result<(), CoreError> {
    if source.source_type == expected {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "expected a {expected} source, got {}",
            source.source_type
        )))
    }
}

const fn action_label(action: &RegistrationAction) -> &'static str {
    match action {
        RegistrationAction::SubmitCompanyInfo(_) => "submit_company_info",
        RegistrationAction::FinishInterview(_) => "finish_interview",
        RegistrationAction::SubmitAssessment(_) => "submit_assessment",
        RegistrationAction::Back(_) => "back",
    }
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// Everything a founder handed over, ready to become a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FounderSubmission {
    pub company: CompanyInfo,
    pub transcript: Option<DataSource>,
    pub assessment: DataSource,
}

impl FounderSubmission {
    /// Build the founder-submission report. Source order is description,
    /// uploaded files, transcript, then assessment.
    #[must_use]
    pub fn into_report(
        self,
        report_id: String,
        description_source_id: String,
        now: DateTime<Utc>,
    ) -> Report {
        let company = self.company;
        let mut report = Report::new(
            report_id,
            company.company_name.clone(),
            Report::founder_submission_title(&company.company_name),
            now,
        );
        report.origin = ReportOrigin::FounderSubmission;
        report.founder = FounderContact {
            phone: company.founder_phone(),
            name: company.founder_name,
            email: company.founder_email,
        };
        if !company.description.is_empty() {
            report.add_source(description_source(
                description_source_id,
                &company.description,
                now,
            ));
            report.description = Some(company.description);
        }
        for file in company.files {
            report.add_source(file);
        }
        if let Some(transcript) = self.transcript {
            report.add_source(transcript);
            report.founder_voice = AgentRun::completed();
        }
        report.add_source(self.assessment);
        report.founder_behaviour_test = AgentRun::completed();
        report
    }
}

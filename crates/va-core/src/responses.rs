//! Response types returned as JSON by `vana` commands.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{DataSource, Report};
use crate::enums::{AgentStatus, ReportOrigin, SourceStatus, Stage};
use crate::stage::{MemoKind, Transition};

/// One row of `vana report list`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReportSummary {
    pub id: String,
    pub title: String,
    pub company_name: String,
    pub origin: ReportOrigin,
    pub current_stage: Stage,
    pub sources: usize,
    pub selected: usize,
    pub created_at: DateTime<Utc>,
}

impl From<&Report> for ReportSummary {
    fn from(report: &Report) -> Self {
        Self {
            id: report.id.clone(),
            title: report.title.clone(),
            company_name: report.company_name.clone(),
            origin: report.origin,
            current_stage: report.current_stage,
            sources: report.data_sources.len(),
            selected: report.selected_count(),
            created_at: report.created_at,
        }
    }
}

/// Response from `vana report list`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReportListResponse {
    pub reports: Vec<ReportSummary>,
    pub total: usize,
}

/// Snapshot of one memo stage after a generation attempt.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GenerationSummary {
    pub memo: MemoKind,
    pub status: AgentStatus,
    pub placeholder: bool,
    pub error: Option<String>,
    pub chars: usize,
}

impl GenerationSummary {
    #[must_use]
    pub fn of(report: &Report, memo: MemoKind) -> Self {
        let (status, placeholder, error, content) = match memo {
            MemoKind::Investment => {
                let m = &report.investment_memo;
                (m.status, m.is_placeholder, m.last_error.clone(), &m.content)
            }
            MemoKind::Curated => {
                let m = &report.curated_memo;
                (m.status, m.is_placeholder, m.last_error.clone(), &m.content)
            }
        };
        Self {
            memo,
            status,
            placeholder,
            error,
            chars: content.chars().count(),
        }
    }
}

/// Response from `vana stage goto|next|back`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StageResponse {
    pub report_id: String,
    pub transition: Transition,
    pub generation: Option<GenerationSummary>,
}

/// Per-source result of an ingestion run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct IngestionResult {
    pub source_id: String,
    pub status: SourceStatus,
    pub summary: Option<String>,
    pub failure_reason: Option<String>,
    pub attempts: u32,
}

impl From<&DataSource> for IngestionResult {
    fn from(source: &DataSource) -> Self {
        Self {
            source_id: source.id.clone(),
            status: source.status,
            summary: source.summary.clone(),
            failure_reason: source.failure_reason.clone(),
            attempts: source.attempts,
        }
    }
}

/// Response from `vana source ingest`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct IngestionResponse {
    pub report_id: String,
    pub results: Vec<IngestionResult>,
    pub can_proceed: bool,
}

/// Response from `vana agent voice|behaviour`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AgentTriggerResponse {
    pub report_id: String,
    pub agent: String,
    pub status: AgentStatus,
    pub notice: String,
}

/// A web page that grounded a research answer.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ResearchLink {
    pub title: String,
    pub uri: String,
}

/// Response from `vana research run`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ResearchResponse {
    pub query: String,
    pub text: String,
    pub sources: Vec<ResearchLink>,
    /// Id of the research source when the result was attached to the report.
    pub added_source_id: Option<String>,
}

/// Response from `vana export`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ExportResponse {
    pub report_id: String,
    pub path: String,
    pub bytes: usize,
}

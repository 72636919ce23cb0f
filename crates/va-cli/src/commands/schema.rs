use schemars::{Schema, schema_for};
use va_core::entities::{DataSource, Report};
use va_core::preferences::{CuratedPreferences, MemoPreferences};
use va_core::registration::{FounderSubmission, RegistrationState};
use va_core::responses::{
    AgentTriggerResponse, ExportResponse, IngestionResponse, ReportListResponse, ResearchResponse,
    StageResponse,
};
use va_core::trail::TrailOperation;
use va_workflow::export::DeckOutline;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

/// Names accepted by `vana schema`, in display order.
const TYPE_NAMES: [&str; 14] = [
    "report",
    "data-source",
    "memo-preferences",
    "curated-preferences",
    "registration-state",
    "founder-submission",
    "report-list",
    "stage-response",
    "ingestion-response",
    "agent-trigger-response",
    "research-response",
    "export-response",
    "deck-outline",
    "trail-operation",
];

/// Handle `vana schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = schema_by_name(&args.type_name)?;
    output(&schema, flags.format)
}

fn schema_by_name(name: &str) -> anyhow::Result<Schema> {
    let normalized = name.trim().to_ascii_lowercase().replace('_', "-");
    let schema = match normalized.as_str() {
        "report" => schema_for!(Report),
        "data-source" => schema_for!(DataSource),
        "memo-preferences" => schema_for!(MemoPreferences),
        "curated-preferences" => schema_for!(CuratedPreferences),
        "registration-state" => schema_for!(RegistrationState),
        "founder-submission" => schema_for!(FounderSubmission),
        "report-list" => schema_for!(ReportListResponse),
        "stage-response" => schema_for!(StageResponse),
        "ingestion-response" => schema_for!(IngestionResponse),
        "agent-trigger-response" => schema_for!(AgentTriggerResponse),
        "research-response" => schema_for!(ResearchResponse),
        "export-response" => schema_for!(ExportResponse),
        "deck-outline" => schema_for!(DeckOutline),
        "trail-operation" => schema_for!(TrailOperation),
        _ => anyhow::bail!(
            "unknown schema type '{name}'; expected one of: {}",
            TYPE_NAMES.join(", ")
        ),
    };
    Ok(schema)
}

use serde::Serialize;
use va_core::trail::TrailOperation;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct DeleteResponse {
    id: String,
    deleted: bool,
}

#[derive(Debug, Serialize)]
struct HistoryResponse {
    report_id: String,
    operations: Vec<TrailOperation>,
}

pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = ctx.workflow.get_report(id).await?;
    output(&report, flags.format)
}

pub async fn delete(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = ctx.workflow.delete_report(id).await?;
    output(
        &DeleteResponse {
            id: report.id,
            deleted: true,
        },
        flags.format,
    )
}

pub fn history(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let operations = ctx.workflow.history(id)?;
    output(
        &HistoryResponse {
            report_id: id.to_string(),
            operations,
        },
        flags.format,
    )
}

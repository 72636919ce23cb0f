use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ResearchCommands;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

#[derive(Debug, Serialize)]
struct SuggestResponse {
    report_id: String,
    queries: Vec<String>,
}

/// Handle `vana research`.
pub async fn handle(action: &ResearchCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        ResearchCommands::Run {
            query,
            report,
            attach,
        } => {
            let progress = Progress::spinner("researching");
            let response = match report {
                Some(report) => ctx.workflow.research_for_report(report, query, *attach).await,
                None => ctx.workflow.research(query).await,
            };
            match response {
                Ok(response) => {
                    progress.finish_clear();
                    output(&response, flags.format)
                }
                Err(error) => {
                    progress.finish_err("research failed");
                    Err(error.into())
                }
            }
        }
        ResearchCommands::Suggest { report } => {
            let queries = ctx.workflow.suggested_queries(report).await?;
            output(
                &SuggestResponse {
                    report_id: report.clone(),
                    queries,
                },
                flags.format,
            )
        }
    }
}

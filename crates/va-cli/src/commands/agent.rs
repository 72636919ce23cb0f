use anyhow::Context;
use serde::Serialize;
use va_core::entities::DataSource;
use va_core::responses::AgentTriggerResponse;
use va_workflow::agents::AgentKind;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AgentCommands;
use crate::commands::shared::parse::parse_agent;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

#[derive(Debug, Serialize)]
struct SimulatedRunResponse {
    trigger: AgentTriggerResponse,
    /// The source the founder's simulated completion attached.
    result: Option<DataSource>,
}

#[derive(Debug, Serialize)]
struct AgentListResponse {
    report_id: String,
    available: Vec<AgentKind>,
}

/// Handle `vana agent`.
pub async fn handle(action: &AgentCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        AgentCommands::Trigger {
            report,
            agent,
            simulate,
        } => {
            let agent = parse_agent(agent)?;
            let trigger = ctx.workflow.trigger_agent(report, agent).await?;
            if !flags.quiet {
                eprintln!("{}", trigger.notice);
            }
            if !*simulate {
                return output(&trigger, flags.format);
            }

            let progress = Progress::spinner(&format!("waiting for the founder to finish the {}", agent.task()));
            let joined = ctx.workflow.simulate_agent(report, agent).await;
            progress.finish_clear();
            let completed = joined.context("simulated founder run did not finish")??;

            let result = completed
                .data_sources
                .iter()
                .rev()
                .find(|s| s.source_type == agent.result_type())
                .cloned();
            output(&SimulatedRunResponse { trigger, result }, flags.format)
        }
        AgentCommands::Complete { report, agent } => {
            let agent = parse_agent(agent)?;
            let report = ctx.workflow.complete_agent(report, agent).await?;
            output(&report, flags.format)
        }
        AgentCommands::List { report } => {
            let available = ctx.workflow.available_agents(report).await?;
            output(
                &AgentListResponse {
                    report_id: report.clone(),
                    available,
                },
                flags.format,
            )
        }
    }
}

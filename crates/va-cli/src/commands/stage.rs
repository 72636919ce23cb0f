use serde::Serialize;
use va_core::enums::Stage;
use va_core::responses::StageResponse;
use va_core::stage::{self, MemoKind, Transition};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::StageCommands;
use crate::commands::shared::parse::parse_stage;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

#[derive(Debug, Serialize)]
struct StageShowResponse {
    report_id: String,
    current_stage: Stage,
    label: &'static str,
    can_proceed: bool,
    /// Why `stage next` would be refused, if it would.
    blocked: Option<String>,
}

/// Handle `vana stage`.
pub async fn handle(action: &StageCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        StageCommands::Show { report } => {
            let report = ctx.workflow.get_report(report).await?;
            let blocked = stage::check_advance(&report).err().map(|e| e.to_string());
            output(
                &StageShowResponse {
                    report_id: report.id.clone(),
                    current_stage: report.current_stage,
                    label: report.current_stage.label(),
                    can_proceed: report.can_proceed(),
                    blocked,
                },
                flags.format,
            )
        }
        StageCommands::Goto { report, stage } => {
            let target = parse_stage(stage)?;
            let progress = Progress::spinner(&format!("opening {}", target.label()));
            let response = ctx.workflow.enter_stage(report, target).await;
            progress.finish_clear();
            output(&response?, flags.format)
        }
        StageCommands::Next { report } => {
            let transition = ctx.workflow.advance(report).await?;
            respond(report, transition, ctx, flags).await
        }
        StageCommands::Back { report, to } => {
            let target = to.as_deref().map(parse_stage).transpose()?;
            let transition = ctx.workflow.retreat(report, target).await?;
            respond(report, transition, ctx, flags).await
        }
    }
}

async fn respond(
    report_id: &str,
    transition: Transition,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let progress = transition
        .effect
        .map(|memo| Progress::spinner(&format!("generating {}", memo_label(memo))));
    let generation = ctx
        .workflow
        .request_generation(report_id, transition.effect)
        .await;
    if let Some(progress) = &progress {
        progress.finish_clear();
    }

    let response = StageResponse {
        report_id: report_id.to_string(),
        transition,
        generation: generation?,
    };
    if let Some(generation) = &response.generation
        && let Some(error) = &generation.error
        && !flags.quiet
    {
        let curated = if generation.memo == MemoKind::Curated { " --curated" } else { "" };
        eprintln!("generation failed: {error}. Run 'vana memo generate {report_id}{curated}' to retry.");
    }
    output(&response, flags.format)
}

const fn memo_label(memo: MemoKind) -> &'static str {
    match memo {
        MemoKind::Investment => "investment memo",
        MemoKind::Curated => "curated memo",
    }
}

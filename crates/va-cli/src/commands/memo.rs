use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use va_core::entities::Report;
use va_core::enums::{AgentStatus, Audience, ExportFormat, MemoLength, Tone};
use va_core::preferences::{CuratedPreferences, MemoPreferences};
use va_core::responses::GenerationSummary;
use va_core::stage::MemoKind;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::MemoCommands;
use crate::commands::shared::parse::{parse_enum, parse_weight};
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

#[derive(Debug, Serialize)]
struct MemoView {
    report_id: String,
    memo: MemoKind,
    status: AgentStatus,
    placeholder: bool,
    error: Option<String>,
    content: String,
}

impl MemoView {
    fn of(report: &Report, memo: MemoKind) -> Self {
        let summary = GenerationSummary::of(report, memo);
        let content = match memo {
            MemoKind::Investment => report.investment_memo.content.clone(),
            MemoKind::Curated => report.curated_memo.content.clone(),
        };
        Self {
            report_id: report.id.clone(),
            memo,
            status: summary.status,
            placeholder: summary.placeholder,
            error: summary.error,
            content,
        }
    }
}

/// Requested changes to investment memo preferences.
#[derive(Debug, Default)]
struct PrefsEdit<'a> {
    tone: Option<&'a str>,
    length: Option<&'a str>,
    instructions: Option<&'a str>,
    weights: &'a [String],
    enable: &'a [String],
    disable: &'a [String],
}

/// Handle `vana memo`.
pub async fn handle(action: &MemoCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        MemoCommands::Generate { report, curated } => {
            let memo = memo_kind(*curated);
            let progress = Progress::spinner("generating memo");
            let result = ctx.workflow.generate_memo(report, memo).await;
            match result {
                Ok(summary) => {
                    progress.finish_clear();
                    output(&summary, flags.format)
                }
                Err(error) => {
                    progress.finish_err("generation failed");
                    Err(error.into())
                }
            }
        }
        MemoCommands::Show { report, curated } => {
            let report = ctx.workflow.get_report(report).await?;
            output(&MemoView::of(&report, memo_kind(*curated)), flags.format)
        }
        MemoCommands::Prefs {
            report,
            tone,
            length,
            instructions,
            weight,
            enable,
            disable,
        } => {
            let current = ctx.workflow.get_report(report).await?;
            let edit = PrefsEdit {
                tone: tone.as_deref(),
                length: length.as_deref(),
                instructions: instructions.as_deref(),
                weights: weight,
                enable,
                disable,
            };
            let preferences = apply_prefs(current.investment_memo.preferences, &edit)?;
            let updated = ctx
                .workflow
                .update_investment_preferences(report, preferences)
                .await?;
            output(&updated.investment_memo.preferences, flags.format)
        }
        MemoCommands::CuratePrefs {
            report,
            audience,
            format,
            instructions,
        } => {
            let current = ctx.workflow.get_report(report).await?;
            let preferences = apply_curated(
                current.curated_memo.preferences,
                audience.as_deref(),
                format.as_deref(),
                instructions.as_deref(),
            )?;
            let updated = ctx
                .workflow
                .update_curated_preferences(report, preferences)
                .await?;
            output(&updated.curated_memo.preferences, flags.format)
        }
        MemoCommands::Edit { report, file } => {
            let content = read_memo(file)?;
            let updated = ctx.workflow.edit_curated_content(report, content).await?;
            output(&MemoView::of(&updated, MemoKind::Curated), flags.format)
        }
    }
}

const fn memo_kind(curated: bool) -> MemoKind {
    if curated {
        MemoKind::Curated
    } else {
        MemoKind::Investment
    }
}

fn read_memo(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn apply_prefs(mut preferences: MemoPreferences, edit: &PrefsEdit<'_>) -> anyhow::Result<MemoPreferences> {
    if let Some(tone) = edit.tone {
        preferences.tone = parse_enum::<Tone>(tone, "tone")?;
    }
    if let Some(length) = edit.length {
        preferences.length = parse_enum::<MemoLength>(length, "length")?;
    }
    if let Some(instructions) = edit.instructions {
        preferences.custom_instructions = instructions.to_string();
    }
    for raw in edit.weights {
        let (name, weight) = parse_weight(raw)?;
        preferences.set_weight(&name, weight)?;
    }
    for name in edit.enable {
        preferences.set_enabled(name, true)?;
    }
    for name in edit.disable {
        preferences.set_enabled(name, false)?;
    }
    Ok(preferences)
}

fn apply_curated(
    mut preferences: CuratedPreferences,
    audience: Option<&str>,
    format: Option<&str>,
    instructions: Option<&str>,
) -> anyhow::Result<CuratedPreferences> {
    if let Some(audience) = audience {
        preferences.audience = parse_enum::<Audience>(audience, "audience")?;
    }
    if let Some(format) = format {
        preferences.format = parse_enum::<ExportFormat>(format, "format")?;
    }
    if let Some(instructions) = instructions {
        preferences.custom_instructions = instructions.to_string();
    }
    Ok(preferences)
}

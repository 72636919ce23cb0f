use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use va_core::entities::DataSource;
use va_core::enums::SourceType;
use va_core::ids::{self, PREFIX_SOURCE};
use va_core::interview::TRANSCRIPT_FILENAME;
use va_core::registration::{CompanyInfoForm, RegistrationAction, RegistrationState};
use va_workflow::registration::{assessment_source, uploaded_file};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RegisterArgs;
use crate::commands::shared::parse::parse_answers;
use crate::context::AppContext;
use crate::output::output;

/// Handle `vana register`: run the three wizard steps from flags and store
/// the result as a founder submission.
pub async fn handle(args: &RegisterArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let state = build_state(args)?;
    let report = ctx.workflow.submit_registration(state).await?;
    if !flags.quiet {
        eprintln!(
            "Submission {} received. An analyst can start from it with 'vana report import {}'.",
            report.id, report.id
        );
    }
    output(&report, flags.format)
}

fn build_state(args: &RegisterArgs) -> anyhow::Result<RegistrationState> {
    let files = args
        .file
        .iter()
        .map(|path| uploaded_file(path).with_context(|| format!("failed to read {}", path.display())))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let form = CompanyInfoForm {
        company_name: args.company.clone(),
        description: args.description.clone(),
        founder_name: args.founder_name.clone(),
        country_code: args.country_code.clone(),
        phone: args.phone.clone(),
        founder_email: args.email.clone(),
        files,
    };
    let transcript = args.transcript.as_deref().map(transcript_source).transpose()?;
    let answers = parse_answers(&args.answers)?;

    let state = RegistrationState::new()
        .reduce(RegistrationAction::SubmitCompanyInfo(form))?
        .reduce(RegistrationAction::FinishInterview(transcript))?
        .reduce(RegistrationAction::SubmitAssessment(assessment_source(&answers)?))?;
    Ok(state)
}

fn transcript_source(path: &Path) -> anyhow::Result<DataSource> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read transcript {}", path.display()))?;
    if content.trim().is_empty() {
        anyhow::bail!("transcript {} is empty", path.display());
    }
    Ok(DataSource::completed(
        ids::generate(PREFIX_SOURCE)?,
        SourceType::Transcript,
        content,
        Some(TRANSCRIPT_FILENAME.to_string()),
        Utc::now(),
    ))
}

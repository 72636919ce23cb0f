use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Serialize;
use va_core::entities::DataSource;
use va_workflow::ingestion::{IngestionOutcome, JobHandle};
use va_workflow::sources::SourceInput;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SourceCommands;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Serialize)]
struct SourceAddResponse {
    source: DataSource,
    outcome: Option<IngestionOutcome>,
}

#[derive(Debug, Serialize)]
struct SourceListResponse {
    report_id: String,
    sources: Vec<DataSource>,
    selected: usize,
    can_proceed: bool,
}

#[derive(Debug, Serialize)]
struct ToggleResponse {
    source_id: String,
    is_selected: bool,
}

#[derive(Debug, Serialize)]
struct DeleteResponse {
    source_id: String,
    deleted: bool,
}

/// Handle `vana source`.
pub async fn handle(action: &SourceCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        SourceCommands::Add {
            report,
            url,
            youtube,
            text,
            file,
            no_ingest,
        } => {
            let input = source_input(url.as_deref(), youtube.as_deref(), text.as_deref(), file.as_deref())?;
            add(report, input, !*no_ingest, ctx, flags).await
        }
        SourceCommands::Ingest { report } => {
            let progress = Progress::spinner("ingesting sources");
            let response = ctx.workflow.ingest_report(report).await;
            progress.finish_clear();
            output(&response?, flags.format)
        }
        SourceCommands::List { report } => {
            let report = ctx.workflow.get_report(report).await?;
            output(
                &SourceListResponse {
                    selected: report.selected_count(),
                    can_proceed: report.can_proceed(),
                    report_id: report.id,
                    sources: report.data_sources,
                },
                flags.format,
            )
        }
        SourceCommands::Toggle { report, source } => {
            let is_selected = ctx.workflow.toggle_source(report, source).await?;
            output(
                &ToggleResponse {
                    source_id: source.clone(),
                    is_selected,
                },
                flags.format,
            )
        }
        SourceCommands::SelectAll { report, none } => {
            let report = ctx.workflow.select_all(report, !*none).await?;
            output(
                &SourceListResponse {
                    selected: report.selected_count(),
                    can_proceed: report.can_proceed(),
                    report_id: report.id,
                    sources: report.data_sources,
                },
                flags.format,
            )
        }
        SourceCommands::Rename {
            report,
            source,
            name,
        } => {
            let source = ctx.workflow.rename_source(report, source, name).await?;
            output(&source, flags.format)
        }
        SourceCommands::Delete { report, source } => {
            let source = ctx.workflow.delete_source(report, source).await?;
            output(
                &DeleteResponse {
                    source_id: source.id,
                    deleted: true,
                },
                flags.format,
            )
        }
    }
}

fn source_input(
    url: Option<&str>,
    youtube: Option<&str>,
    text: Option<&str>,
    file: Option<&Path>,
) -> anyhow::Result<SourceInput> {
    match (url, youtube, text, file) {
        (Some(url), None, None, None) => Ok(SourceInput::Url(url.to_string())),
        (None, Some(url), None, None) => Ok(SourceInput::Youtube(url.to_string())),
        (None, None, Some(text), None) => Ok(SourceInput::Text(text.to_string())),
        (None, None, None, Some(path)) => SourceInput::from_path(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => anyhow::bail!("give exactly one of --url, --youtube, --text, --file"),
    }
}

async fn add(
    report_id: &str,
    input: SourceInput,
    ingest: bool,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let source = ctx.workflow.add_source(report_id, input).await?;
    if !ingest {
        return output(
            &SourceAddResponse {
                source,
                outcome: None,
            },
            flags.format,
        );
    }

    let handle = ctx.workflow.submit_ingestion(report_id, &source.id).await?;
    let outcome = follow(handle, source.label()).await?;

    let report = ctx.workflow.get_report(report_id).await?;
    let source = report.source(&source.id).cloned().unwrap_or(source);
    output(
        &SourceAddResponse {
            source,
            outcome: Some(outcome),
        },
        flags.format,
    )
}

/// Wait for a job while mirroring its state on the spinner.
async fn follow(handle: JobHandle, label: &str) -> anyhow::Result<IngestionOutcome> {
    let progress = Progress::spinner(&format!("{label}: queued"));
    while !handle.is_finished() {
        progress.show_job(label, &handle.state());
        tokio::time::sleep(POLL_INTERVAL).await;
    }

    match handle.wait().await {
        Ok(outcome) => {
            progress.finish_job(label, &outcome);
            Ok(outcome)
        }
        Err(error) => {
            progress.finish_err(&format!("{label}: ingestion stopped"));
            Err(error.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;
    use va_workflow::sources::SourceInput;

    use super::source_input;

    #[test]
    fn picks_the_single_given_input() {
        assert_eq!(
            source_input(Some("https://acme.io"), None, None, None).expect("url"),
            SourceInput::Url("https://acme.io".to_string())
        );
        assert_eq!(
            source_input(None, None, Some("notes"), None).expect("text"),
            SourceInput::Text("notes".to_string())
        );
    }

    #[test]
    fn reads_files_from_disk() {
        let temp = tempfile::tempdir().expect("tempdir should create");
        let path = temp.path().join("notes.txt");
        std::fs::write(&path, "ARR grew 3x").expect("file should write");

        match source_input(None, None, None, Some(&path)).expect("file") {
            SourceInput::File { name, mime, bytes } => {
                assert_eq!(name, "notes.txt");
                assert_eq!(mime, "text/plain");
                assert_eq!(bytes, b"ARR grew 3x".to_vec());
            }
            other => panic!("unexpected input: {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_reported_with_its_path() {
        let err = source_input(None, None, None, Some(Path::new("/nonexistent/deck.pdf")))
            .expect_err("should fail");
        assert!(err.to_string().contains("/nonexistent/deck.pdf"));
    }

    #[test]
    fn ambiguous_input_is_rejected() {
        assert!(source_input(Some("a"), Some("b"), None, None).is_err());
        assert!(source_input(None, None, None, None).is_err());
    }
}

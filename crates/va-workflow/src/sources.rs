//! Data source operations on a report.

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::json;
use va_core::entities::{DataSource, Report, truncate_chars};
use va_core::enums::{EntityType, SourceType, TrailOp};
use va_core::errors::CoreError;
use va_core::ids::{self, PREFIX_SOURCE};
use va_genai::TextGenerator;
use va_store::ReportRepository;

use crate::{Workflow, WorkflowError};

/// Characters of pasted text used in its label.
const PASTED_LABEL_CHARS: usize = 20;

/// What an analyst hands over when adding a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceInput {
    Url(String),
    Youtube(String),
    Text(String),
    File { name: String, mime: String, bytes: Vec<u8> },
    Image { name: String, mime: String, bytes: Vec<u8> },
}

impl SourceInput {
    /// Read a document from disk. Image extensions become image sources.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be read.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let (name, mime, bytes) = read_document(path)?;
        Ok(if mime.starts_with("image/") {
            Self::Image { name, mime, bytes }
        } else {
            Self::File { name, mime, bytes }
        })
    }

    #[must_use]
    pub const fn source_type(&self) -> SourceType {
        match self {
            Self::Url(_) => SourceType::Url,
            Self::Youtube(_) => SourceType::Youtube,
            Self::Text(_) => SourceType::Text,
            Self::File { .. } => SourceType::File,
            Self::Image { .. } => SourceType::Image,
        }
    }

    /// Content and label as stored on the source.
    fn into_parts(self) -> Result<(String, String), CoreError> {
        match self {
            Self::Url(url) | Self::Youtube(url) => {
                let url = url.trim().to_string();
                if url.is_empty() {
                    return Err(CoreError::Validation("URL must not be empty".into()));
                }
                Ok((url.clone(), url))
            }
            Self::Text(text) => {
                if text.trim().is_empty() {
                    return Err(CoreError::Validation("text must not be empty".into()));
                }
                let label = format!("Pasted Text: {}...", truncate_chars(&text, PASTED_LABEL_CHARS));
                Ok((text, label))
            }
            Self::File { name, mime, bytes } | Self::Image { name, mime, bytes } => {
                Ok((data_uri(&mime, &bytes), name))
            }
        }
    }
}

/// File name, guessed MIME type, and body of a document on disk.
///
/// # Errors
///
/// Returns the I/O error if the file cannot be read.
pub fn read_document(path: &Path) -> std::io::Result<(String, String, Vec<u8>)> {
    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    Ok((name, mime_for(path).to_string(), bytes))
}

/// `data:<mime>;base64,<body>`
#[must_use]
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Split a `data:` URI into its MIME type and decoded body.
#[must_use]
pub fn parse_data_uri(content: &str) -> Option<(&str, Vec<u8>)> {
    let rest = content.strip_prefix("data:")?;
    let (meta, body) = rest.split_once(',')?;
    let mime = meta.strip_suffix(";base64")?;
    let bytes = STANDARD.decode(body.trim()).ok()?;
    Some((mime, bytes))
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "json" => "application/json",
        "html" | "htm" => "text/html",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

impl<R, G> Workflow<R, G>
where
    R: ReportRepository,
    G: TextGenerator + 'static,
{
    /// Append a pending, selected source. Ingestion is submitted separately.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for an empty URL or text, or a store
    /// error for an unknown report.
    pub async fn add_source(
        &self,
        report_id: &str,
        input: SourceInput,
    ) -> Result<DataSource, WorkflowError> {
        let source_type = input.source_type();
        let (content, label) = input.into_parts()?;
        let source_id = ids::generate(PREFIX_SOURCE)?;

        let (_, source) = self
            .store
            .update(report_id, |report, changes| {
                let source =
                    DataSource::pending(source_id, source_type, content, Some(label), changes.now());
                changes.record(TrailOp::Create, EntityType::DataSource, &source.id, &source);
                report.add_source(source.clone());
                Ok(source)
            })
            .await?;
        tracing::info!(report_id, source_id = %source.id, source_type = %source_type, "source added");
        Ok(source)
    }

    /// Attach a source that needs no ingestion (research, agent output).
    pub(crate) async fn attach_completed_source(
        &self,
        report_id: &str,
        source_type: SourceType,
        content: String,
        label: String,
    ) -> Result<DataSource, WorkflowError> {
        let source_id = ids::generate(PREFIX_SOURCE)?;
        let (_, source) = self
            .store
            .update(report_id, |report, changes| {
                let source = DataSource::completed(
                    source_id,
                    source_type,
                    content,
                    Some(label),
                    changes.now(),
                );
                changes.record(TrailOp::Create, EntityType::DataSource, &source.id, &source);
                report.add_source(source.clone());
                Ok(source)
            })
            .await?;
        Ok(source)
    }

    /// Remove one source. Any in-flight ingestion job for it is dropped on commit.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` for an unknown source.
    pub async fn delete_source(
        &self,
        report_id: &str,
        source_id: &str,
    ) -> Result<DataSource, WorkflowError> {
        let (_, removed) = self
            .store
            .update(report_id, |report, changes| {
                let removed = report.delete_source(source_id)?;
                changes.record(TrailOp::Delete, EntityType::DataSource, source_id, ());
                Ok(removed)
            })
            .await?;
        Ok(removed)
    }

    /// Flip a source's selection and return the new value.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` for an unknown source.
    pub async fn toggle_source(&self, report_id: &str, source_id: &str) -> Result<bool, WorkflowError> {
        let (_, selected) = self
            .store
            .update(report_id, |report, changes| {
                let selected = report.toggle_select(source_id)?;
                changes.record(
                    TrailOp::Update,
                    EntityType::DataSource,
                    source_id,
                    json!({ "is_selected": selected }),
                );
                Ok(selected)
            })
            .await?;
        Ok(selected)
    }

    /// Select or deselect every source.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn select_all(&self, report_id: &str, selected: bool) -> Result<Report, WorkflowError> {
        let (report, ()) = self
            .store
            .update(report_id, |report, changes| {
                report.select_all(selected);
                for source in &report.data_sources {
                    changes.record(
                        TrailOp::Update,
                        EntityType::DataSource,
                        &source.id,
                        json!({ "is_selected": selected }),
                    );
                }
                Ok(())
            })
            .await?;
        Ok(report)
    }

    /// Change a source's label.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for a blank name and
    /// `CoreError::NotFound` for an unknown source.
    pub async fn rename_source(
        &self,
        report_id: &str,
        source_id: &str,
        name: &str,
    ) -> Result<DataSource, WorkflowError> {
        let (report, ()) = self
            .store
            .update(report_id, |report, changes| {
                report.rename_source(source_id, name)?;
                changes.record(
                    TrailOp::Update,
                    EntityType::DataSource,
                    source_id,
                    json!({ "filename": name.trim() }),
                );
                Ok(())
            })
            .await?;
        report
            .source(source_id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("data_source", source_id).into())
    }
}

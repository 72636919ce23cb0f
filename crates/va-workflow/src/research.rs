//! Web-grounded deep research.

use va_core::entities::{DataSource, truncate_chars};
use va_core::enums::SourceType;
use va_core::errors::CoreError;
use va_core::responses::{ResearchLink, ResearchResponse};
use va_genai::{ModelRole, Prompt, TextGenerator};
use va_store::ReportRepository;

use crate::{Workflow, WorkflowError, prompts};

const LABEL_QUERY_CHARS: usize = 40;

/// Source content for a research result.
#[must_use]
pub fn research_content(query: &str, result: &str) -> String {
    format!("Query: {query}\n\nResult:\n{result}")
}

/// `Research: <first 40 chars of the query>...`
#[must_use]
pub fn research_label(query: &str) -> String {
    format!("Research: {}...", truncate_chars(query, LABEL_QUERY_CHARS))
}

impl<R, G> Workflow<R, G>
where
    R: ReportRepository,
    G: TextGenerator + 'static,
{
    /// Starting queries built from the report's company and description.
    ///
    /// # Errors
    ///
    /// Returns a not-found store error for an unknown report.
    pub async fn suggested_queries(&self, report_id: &str) -> Result<Vec<String>, WorkflowError> {
        let report = self.store.get(report_id).await?;
        Ok(prompts::suggested_research_queries(
            &report.company_name,
            report.description.as_deref().unwrap_or_default(),
        ))
    }

    /// Run one research query with web search.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for a blank query and the
    /// collaborator's error otherwise.
    pub async fn research(&self, query: &str) -> Result<ResearchResponse, WorkflowError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CoreError::Validation("research query must not be empty".into()).into());
        }
        let generation = self
            .generator
            .generate(Prompt::new(ModelRole::Research, query).with_web_search())
            .await?;
        tracing::info!(query, sources = generation.sources.len(), "research finished");
        Ok(ResearchResponse {
            query: query.to_string(),
            text: generation.text,
            sources: generation
                .sources
                .into_iter()
                .map(|s| ResearchLink {
                    title: s.title,
                    uri: s.uri,
                })
                .collect(),
            added_source_id: None,
        })
    }

    /// Store a research result on the report as a completed, selected source.
    ///
    /// # Errors
    ///
    /// Returns a not-found store error for an unknown report.
    pub async fn add_research_source(
        &self,
        report_id: &str,
        query: &str,
        result: &str,
    ) -> Result<DataSource, WorkflowError> {
        self.attach_completed_source(
            report_id,
            SourceType::Research,
            research_content(query, result),
            research_label(query),
        )
        .await
    }

    /// Research on behalf of a report, optionally keeping the result as a source.
    ///
    /// # Errors
    ///
    /// See [`Workflow::research`] and [`Workflow::add_research_source`].
    pub async fn research_for_report(
        &self,
        report_id: &str,
        query: &str,
        attach: bool,
    ) -> Result<ResearchResponse, WorkflowError> {
        self.store.get(report_id).await?;
        let mut response = self.research(query).await?;
        if attach {
            let source = self
                .add_research_source(report_id, &response.query, &response.text)
                .await?;
            response.added_source_id = Some(source.id);
        }
        Ok(response)
    }
}

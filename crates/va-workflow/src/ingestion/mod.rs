//! Background ingestion of pending sources.
//!
//! ```text
//! submit ──[processing_delay]──▶ processing ──[completion_delay]──▶ digest
//!                                                  ▲                  │
//!                                                  └──[backoff]── retryable
//!                                                                     │
//!                                          completed / failed ◀───────┘
//! ```
//!
//! Each job is a tokio task. Every step commits through the report service
//! before the next one is scheduled, so one source's transitions are
//! strictly sequential. A source deleted mid-flight is skipped on commit.

pub mod digest;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use va_core::entities::DataSource;
use va_core::enums::{EntityType, SourceStatus, TrailOp};
use va_core::errors::CoreError;
use va_core::ids::{self, PREFIX_JOB};
use va_core::responses::{IngestionResponse, IngestionResult};
use va_genai::TextGenerator;
use va_store::{ReportRepository, StoreError};

pub use digest::{Digester, DigestError, ModelDigester, SimulatedDigester, SourceDigester};

use crate::retry::RetryConfig;
use crate::{Workflow, WorkflowError};

/// How an ingestion job ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum IngestionOutcome {
    Completed { summary: String },
    Failed { reason: String },
    /// The source or its report was deleted while the job ran.
    Skipped,
}

/// Observable progress of a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Queued,
    Processing { attempt: u32 },
    Finished(IngestionOutcome),
}

/// Handle to a running ingestion job.
pub struct JobHandle {
    pub job_id: String,
    pub report_id: String,
    pub source_id: String,
    state: watch::Receiver<JobState>,
    task: JoinHandle<Result<IngestionOutcome, WorkflowError>>,
}

impl JobHandle {
    /// Latest state without waiting.
    #[must_use]
    pub fn state(&self) -> JobState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the job to end.
    ///
    /// # Errors
    ///
    /// Returns the store error that stopped the job, or `WorkflowError::Other`
    /// if the task panicked or was aborted.
    pub async fn wait(self) -> Result<IngestionOutcome, WorkflowError> {
        let job_id = self.job_id;
        self.task
            .await
            .map_err(|e| anyhow::anyhow!("ingestion job {job_id} did not finish: {e}"))?
    }

    pub fn abort(&self) {
        self.task.abort();
    }
}

impl<R, G> Workflow<R, G>
where
    R: ReportRepository,
    G: TextGenerator + 'static,
{
    /// The digester selected by `ingestion.summarize_with_model`.
    #[must_use]
    pub fn digester(&self) -> Digester<G> {
        if self.config.ingestion.summarize_with_model {
            Digester::Model(ModelDigester::new(Arc::clone(&self.generator)))
        } else {
            Digester::Simulated(SimulatedDigester)
        }
    }

    /// Start ingesting one source with the configured digester.
    ///
    /// # Errors
    ///
    /// See [`Workflow::submit_ingestion_with`].
    pub async fn submit_ingestion(
        &self,
        report_id: &str,
        source_id: &str,
    ) -> Result<JobHandle, WorkflowError> {
        self.submit_ingestion_with(report_id, source_id, self.digester())
            .await
    }

    /// Start ingesting one source. Pending sources go through the full
    /// lifecycle; a source left in processing by an interrupted run resumes
    /// at the digest step.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` for an unknown source and
    /// `CoreError::InvalidTransition` for a source that already finished.
    pub async fn submit_ingestion_with<D>(
        &self,
        report_id: &str,
        source_id: &str,
        digester: D,
    ) -> Result<JobHandle, WorkflowError>
    where
        D: SourceDigester + 'static,
    {
        let report = self.store.get(report_id).await?;
        let source = report
            .source(source_id)
            .ok_or_else(|| CoreError::not_found("data_source", source_id))?;
        if source.status.is_terminal() {
            return Err(CoreError::InvalidTransition {
                entity_type: "data_source".into(),
                id: source_id.to_string(),
                from: source.status.to_string(),
                to: SourceStatus::Processing.to_string(),
            }
            .into());
        }

        let job_id = ids::generate(PREFIX_JOB)?;
        let (tx, rx) = watch::channel(JobState::Queued);
        let workflow = self.clone();
        let (rid, sid) = (report_id.to_string(), source_id.to_string());
        let task = tokio::spawn(async move { workflow.run_job(&rid, &sid, digester, tx).await });

        tracing::debug!(%job_id, report_id, source_id, "ingestion submitted");
        Ok(JobHandle {
            job_id,
            report_id: report_id.to_string(),
            source_id: source_id.to_string(),
            state: rx,
            task,
        })
    }

    /// Submit every source that has not finished ingestion.
    ///
    /// # Errors
    ///
    /// Propagates submission failures.
    pub async fn ingest_unfinished(&self, report_id: &str) -> Result<Vec<JobHandle>, WorkflowError> {
        let report = self.store.get(report_id).await?;
        let mut handles = Vec::new();
        for source in report.data_sources.iter().filter(|s| !s.status.is_terminal()) {
            handles.push(self.submit_ingestion(report_id, &source.id).await?);
        }
        Ok(handles)
    }

    /// Ingest every unfinished source and wait for all of them.
    ///
    /// # Errors
    ///
    /// Returns the first job error; outcomes of other jobs are still committed.
    pub async fn ingest_report(&self, report_id: &str) -> Result<IngestionResponse, WorkflowError> {
        let handles = self.ingest_unfinished(report_id).await?;
        let mut ingested = Vec::with_capacity(handles.len());
        let mut first_error = None;
        for handle in handles {
            let source_id = handle.source_id.clone();
            match handle.wait().await {
                Ok(IngestionOutcome::Skipped) => {}
                Ok(_) => ingested.push(source_id),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        if let Some(e) = first_error {
            return Err(e);
        }

        let report = self.store.get(report_id).await?;
        let results = ingested
            .iter()
            .filter_map(|id| report.source(id))
            .map(IngestionResult::from)
            .collect();
        Ok(IngestionResponse {
            report_id: report.id.clone(),
            results,
            can_proceed: report.can_proceed(),
        })
    }

    async fn run_job<D: SourceDigester>(
        &self,
        report_id: &str,
        source_id: &str,
        digester: D,
        state: watch::Sender<JobState>,
    ) -> Result<IngestionOutcome, WorkflowError> {
        let outcome = self.drive_job(report_id, source_id, &digester, &state).await;
        if let Ok(outcome) = &outcome {
            state.send_replace(JobState::Finished(outcome.clone()));
            match outcome {
                IngestionOutcome::Completed { .. } => {
                    tracing::info!(report_id, source_id, "source ingested");
                }
                IngestionOutcome::Failed { reason } => {
                    tracing::warn!(report_id, source_id, %reason, "source ingestion failed");
                }
                IngestionOutcome::Skipped => {
                    tracing::debug!(report_id, source_id, "source gone, ingestion skipped");
                }
            }
        }
        outcome
    }

    async fn drive_job<D: SourceDigester>(
        &self,
        report_id: &str,
        source_id: &str,
        digester: &D,
        state: &watch::Sender<JobState>,
    ) -> Result<IngestionOutcome, WorkflowError> {
        let ingestion = &self.config.ingestion;
        let retry = RetryConfig::from(ingestion);

        let pending = self
            .read_source(report_id, source_id)
            .await?
            .is_some_and(|s| s.status == SourceStatus::Pending);
        if pending {
            tokio::time::sleep(ingestion.processing_delay()).await;
            let started = self
                .commit_source(report_id, source_id, TrailOp::Transition, |s| s.mark_processing())
                .await?;
            if started.is_none() {
                return Ok(IngestionOutcome::Skipped);
            }
        }

        let mut attempt = 0;
        loop {
            attempt += 1;
            let delay = if attempt == 1 {
                ingestion.completion_delay()
            } else {
                retry.delay_after(attempt - 1)
            };
            tokio::time::sleep(delay).await;

            let Some(snapshot) = self
                .commit_source(report_id, source_id, TrailOp::Update, |s| {
                    s.attempts += 1;
                    Ok(s.clone())
                })
                .await?
            else {
                return Ok(IngestionOutcome::Skipped);
            };
            state.send_replace(JobState::Processing { attempt });

            let (outcome, op) = match digester.digest(&snapshot).await {
                Ok(summary) => (IngestionOutcome::Completed { summary }, TrailOp::Transition),
                Err(e) if e.is_retryable() && retry.allows_retry_after(attempt) => {
                    tracing::warn!(
                        report_id,
                        source_id,
                        attempt,
                        max_attempts = retry.max_attempts,
                        error = %e,
                        "digest failed, retrying"
                    );
                    continue;
                }
                Err(e) => (
                    IngestionOutcome::Failed {
                        reason: e.to_string(),
                    },
                    TrailOp::Transition,
                ),
            };

            let committed = self
                .commit_source(report_id, source_id, op, |s| match &outcome {
                    IngestionOutcome::Completed { summary } => s.complete(summary.clone()),
                    IngestionOutcome::Failed { reason } => s.fail(reason.clone()),
                    IngestionOutcome::Skipped => Ok(()),
                })
                .await?;
            return Ok(committed.map_or(IngestionOutcome::Skipped, |()| outcome));
        }
    }

    async fn read_source(
        &self,
        report_id: &str,
        source_id: &str,
    ) -> Result<Option<DataSource>, WorkflowError> {
        match self.store.get(report_id).await {
            Ok(report) => Ok(report.source(source_id).cloned()),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Apply `step` to one source and persist it. `None` means the source
    /// (or its report) no longer exists.
    async fn commit_source<T, F>(
        &self,
        report_id: &str,
        source_id: &str,
        op: TrailOp,
        step: F,
    ) -> Result<Option<T>, WorkflowError>
    where
        F: FnOnce(&mut DataSource) -> Result<T, CoreError> + Send,
        T: Send,
    {
        let result = self
            .store
            .update(report_id, |report, changes| {
                let source = report.source_mut(source_id)?;
                let value = step(source)?;
                changes.record(
                    op,
                    EntityType::DataSource,
                    source_id,
                    json!({
                        "status": source.status,
                        "attempts": source.attempts,
                        "failure_reason": source.failure_reason,
                    }),
                );
                Ok(value)
            })
            .await;
        match result {
            Ok((_, value)) => Ok(Some(value)),
            Err(StoreError::NotFound(_) | StoreError::Core(CoreError::NotFound { .. })) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

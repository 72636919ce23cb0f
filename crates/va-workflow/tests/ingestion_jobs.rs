//! Background ingestion jobs on paused tokio time.
//!
//! Jobs sleep through the configured processing and completion delays, so
//! every test here runs with `start_paused` and the in-memory store.

mod common;

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use pretty_assertions::assert_eq;

use common::{FakeGenerator, TestWorkflow, empty_report, ready_report, workflow};
use va_core::entities::DataSource;
use va_core::enums::{AgentStatus, SourceStatus, SourceType};
use va_core::errors::CoreError;
use va_workflow::WorkflowError;
use va_workflow::agents::AgentKind;
use va_workflow::ingestion::{DigestError, IngestionOutcome, JobState, SourceDigester};
use va_workflow::sources::SourceInput;

/// Fails a fixed number of times, then succeeds.
struct Flaky {
    failures: AtomicU32,
    error: DigestError,
}

impl Flaky {
    fn new(failures: u32, error: DigestError) -> Self {
        Self {
            failures: AtomicU32::new(failures),
            error,
        }
    }
}

impl SourceDigester for Flaky {
    async fn digest(&self, source: &DataSource) -> Result<String, DigestError> {
        if self.failures.load(Ordering::SeqCst) > 0 {
            self.failures.fetch_sub(1, Ordering::SeqCst);
            return Err(self.error.clone());
        }
        Ok(format!("digested {}", source.id))
    }
}

async fn status_of(wf: &TestWorkflow, report_id: &str, source_id: &str) -> SourceStatus {
    wf.get_report(report_id)
        .await
        .unwrap()
        .source(source_id)
        .unwrap()
        .status
}

#[tokio::test(start_paused = true)]
async fn source_moves_through_lifecycle_on_schedule() {
    let wf = workflow(FakeGenerator::new());
    let report = empty_report(&wf).await;
    let source = wf
        .add_source(&report.id, SourceInput::Text("Our ARR grew 3x year over year".into()))
        .await
        .unwrap();

    let job = wf.submit_ingestion(&report.id, &source.id).await.unwrap();
    assert_eq!(job.state(), JobState::Queued);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(status_of(&wf, &report.id, &source.id).await, SourceStatus::Pending);

    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert_eq!(status_of(&wf, &report.id, &source.id).await, SourceStatus::Processing);

    let outcome = job.wait().await.unwrap();
    assert_eq!(
        outcome,
        IngestionOutcome::Completed {
            summary: "Summary for Pasted Text: Our ARR grew 3x year......".into()
        }
    );

    let stored = wf.get_report(&report.id).await.unwrap();
    let ingested = stored.source(&source.id).unwrap();
    assert_eq!(ingested.status, SourceStatus::Completed);
    assert_eq!(ingested.attempts, 1);
    assert!(stored.can_proceed());
    assert_eq!(wf.generator().calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn transient_failures_are_retried() {
    let wf = workflow(FakeGenerator::new());
    let report = empty_report(&wf).await;
    let source = wf
        .add_source(&report.id, SourceInput::Url("https://acme.io".into()))
        .await
        .unwrap();

    let job = wf
        .submit_ingestion_with(
            &report.id,
            &source.id,
            Flaky::new(2, DigestError::Unavailable("503".into())),
        )
        .await
        .unwrap();
    let outcome = job.wait().await.unwrap();

    assert!(matches!(outcome, IngestionOutcome::Completed { .. }));
    let stored = wf.get_report(&report.id).await.unwrap();
    let ingested = stored.source(&source.id).unwrap();
    assert_eq!(ingested.attempts, 3);
    assert_eq!(ingested.summary.as_deref(), Some(format!("digested {}", source.id).as_str()));
}

#[tokio::test(start_paused = true)]
async fn retries_stop_at_max_attempts() {
    let wf = workflow(FakeGenerator::new());
    let report = empty_report(&wf).await;
    let source = wf
        .add_source(&report.id, SourceInput::Url("https://acme.io".into()))
        .await
        .unwrap();

    let job = wf
        .submit_ingestion_with(
            &report.id,
            &source.id,
            Flaky::new(10, DigestError::Unavailable("503".into())),
        )
        .await
        .unwrap();
    let outcome = job.wait().await.unwrap();

    assert!(matches!(outcome, IngestionOutcome::Failed { .. }));
    let stored = wf.get_report(&report.id).await.unwrap();
    let failed = stored.source(&source.id).unwrap();
    assert_eq!(failed.status, SourceStatus::Failed);
    assert_eq!(failed.attempts, wf.config().ingestion.max_attempts);
    assert!(failed.failure_reason.as_deref().unwrap().contains("unavailable"));
    assert!(!stored.can_proceed());
}

#[tokio::test(start_paused = true)]
async fn unreadable_sources_fail_without_retry() {
    let wf = workflow(FakeGenerator::new());
    let report = empty_report(&wf).await;
    let source = wf
        .add_source(&report.id, SourceInput::Text("scanned pages".into()))
        .await
        .unwrap();

    let job = wf
        .submit_ingestion_with(
            &report.id,
            &source.id,
            Flaky::new(1, DigestError::Unreadable("no text layer".into())),
        )
        .await
        .unwrap();

    assert_eq!(
        job.wait().await.unwrap(),
        IngestionOutcome::Failed {
            reason: "unreadable source: no text layer".into()
        }
    );
    let stored = wf.get_report(&report.id).await.unwrap();
    assert_eq!(stored.source(&source.id).unwrap().attempts, 1);
}

#[tokio::test(start_paused = true)]
async fn deleting_a_source_mid_flight_skips_the_job() {
    let wf = workflow(FakeGenerator::new());
    let report = empty_report(&wf).await;
    let source = wf
        .add_source(&report.id, SourceInput::Text("short-lived notes".into()))
        .await
        .unwrap();
    let job = wf.submit_ingestion(&report.id, &source.id).await.unwrap();

    tokio::time::sleep(Duration::from_millis(1500)).await;
    wf.delete_source(&report.id, &source.id).await.unwrap();

    assert_eq!(job.wait().await.unwrap(), IngestionOutcome::Skipped);
    let stored = wf.get_report(&report.id).await.unwrap();
    assert!(stored.data_sources.is_empty());
}

#[tokio::test(start_paused = true)]
async fn deleting_the_report_skips_the_job() {
    let wf = workflow(FakeGenerator::new());
    let report = empty_report(&wf).await;
    let source = wf
        .add_source(&report.id, SourceInput::Text("notes".into()))
        .await
        .unwrap();
    let job = wf.submit_ingestion(&report.id, &source.id).await.unwrap();

    wf.delete_report(&report.id).await.unwrap();

    assert_eq!(job.wait().await.unwrap(), IngestionOutcome::Skipped);
}

#[tokio::test]
async fn finished_sources_are_not_resubmitted() {
    let wf = workflow(FakeGenerator::new());
    let report = ready_report(&wf).await;
    let description = &report.data_sources[0];

    let err = wf
        .submit_ingestion(&report.id, &description.id)
        .await
        .err()
        .unwrap();

    assert!(matches!(
        err,
        WorkflowError::Core(CoreError::InvalidTransition { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn ingest_report_waits_for_every_unfinished_source() {
    let wf = workflow(FakeGenerator::new());
    let report = ready_report(&wf).await;
    for input in [
        SourceInput::Url("https://acme.io/about".into()),
        SourceInput::Text("Pilot with two 3PLs".into()),
    ] {
        wf.add_source(&report.id, input).await.unwrap();
    }

    let response = wf.ingest_report(&report.id).await.unwrap();

    assert_eq!(response.results.len(), 2);
    assert!(response.results.iter().all(|r| r.status == SourceStatus::Completed));
    assert!(response.can_proceed);
    let stored = wf.get_report(&report.id).await.unwrap();
    assert_eq!(stored.eligible_sources().count(), 3);
}

#[tokio::test(start_paused = true)]
async fn simulated_agent_completes_after_its_delay() {
    let wf = workflow(FakeGenerator::new());
    let report = empty_report(&wf).await;

    let trigger = wf
        .trigger_agent(&report.id, AgentKind::FounderVoice)
        .await
        .unwrap();
    assert_eq!(trigger.status, AgentStatus::Pending);
    assert_eq!(
        trigger.notice,
        "Email sent to ada@acme.io prompting them to complete the Founder Voice interview."
    );
    assert_eq!(
        wf.available_agents(&report.id).await.unwrap(),
        vec![AgentKind::BehaviourTest]
    );

    let done = wf
        .simulate_agent(&report.id, AgentKind::FounderVoice)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(done.founder_voice.status, AgentStatus::Completed);
    let transcript = &done.data_sources[0];
    assert_eq!(transcript.source_type, SourceType::Transcript);
    assert_eq!(transcript.status, SourceStatus::Completed);
    assert_eq!(transcript.filename.as_deref(), Some("Founder Voice Call Transcript"));
    assert!(done.can_proceed());

    let err = wf
        .trigger_agent(&report.id, AgentKind::FounderVoice)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Core(CoreError::Validation(_))));
}

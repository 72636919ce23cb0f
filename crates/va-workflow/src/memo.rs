//! Memo generation and memo preference edits.
//!
//! A generation runs in three steps: mark the stage pending and build the
//! prompt, call the collaborator, commit the result. Zero eligible sources
//! short-circuits to the placeholder without calling anything. A failure
//! leaves prior content in place and records the message on the stage.

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::Utc;
use serde_json::json;
use va_core::entities::{MemoState, Report};
use va_core::enums::{AgentStatus, EntityType, TrailOp};
use va_core::errors::CoreError;
use va_core::preferences::{CuratedPreferences, MemoPreferences};
use va_core::responses::GenerationSummary;
use va_core::stage::MemoKind;
use va_genai::{ModelRole, Prompt, TextGenerator};
use va_store::ReportRepository;

use crate::{Workflow, WorkflowError, prompts};

const INTERRUPTED: &str = "previous generation was interrupted";

enum Plan {
    Placeholder,
    Call(String),
}

type Registry = Mutex<HashSet<(String, MemoKind)>>;

/// Frees a claimed `(report, memo)` slot on every exit from a generation.
struct Claim<'a> {
    registry: &'a Registry,
    key: (String, MemoKind),
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        if let Ok(mut running) = self.registry.lock() {
            running.remove(&self.key);
        }
    }
}

fn poisoned() -> CoreError {
    CoreError::Other(anyhow::anyhow!("generation registry poisoned"))
}

fn memo_state<P>(state: &MemoState<P>) -> serde_json::Value {
    json!({
        "status": state.status,
        "is_placeholder": state.is_placeholder,
        "last_error": state.last_error,
    })
}

/// Mark `memo` pending. A pending status this process does not own was left
/// by an interrupted run and is failed first.
fn begin<P>(state: &mut MemoState<P>, memo: MemoKind, owned: bool) -> Result<(), CoreError> {
    if state.status == AgentStatus::Pending && !owned {
        state.fail(memo.as_str(), INTERRUPTED.to_string())?;
    }
    state.begin(memo.as_str())
}

fn plan(report: &mut Report, memo: MemoKind, owned: bool) -> Result<Plan, CoreError> {
    match memo {
        MemoKind::Investment => match prompts::investment_memo(report) {
            None => {
                report.investment_memo.set_placeholder();
                Ok(Plan::Placeholder)
            }
            Some(prompt) => {
                begin(&mut report.investment_memo, memo, owned)?;
                Ok(Plan::Call(prompt))
            }
        },
        MemoKind::Curated => {
            if !report.investment_memo.has_content() {
                return Err(CoreError::Validation(
                    "generate the investment memo first".into(),
                ));
            }
            let prompt = prompts::curated_memo(report);
            begin(&mut report.curated_memo, memo, owned)?;
            Ok(Plan::Call(prompt))
        }
    }
}

fn commit(report: &mut Report, memo: MemoKind, result: Result<String, String>) -> Result<(), CoreError> {
    let now = Utc::now();
    let stage = memo.as_str();
    match (memo, result) {
        (MemoKind::Investment, Ok(text)) => report.investment_memo.complete(stage, text, now),
        (MemoKind::Investment, Err(message)) => report.investment_memo.fail(stage, message),
        (MemoKind::Curated, Ok(text)) => report.curated_memo.complete(stage, text, now),
        (MemoKind::Curated, Err(message)) => report.curated_memo.fail(stage, message),
    }
}

fn snapshot(report: &Report, memo: MemoKind) -> serde_json::Value {
    match memo {
        MemoKind::Investment => memo_state(&report.investment_memo),
        MemoKind::Curated => memo_state(&report.curated_memo),
    }
}

impl<R, G> Workflow<R, G>
where
    R: ReportRepository,
    G: TextGenerator + 'static,
{
    /// Generate (or regenerate) one memo stage.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Generation` when the collaborator fails; the
    /// failure is already recorded on the stage. Returns
    /// `CoreError::InvalidTransition` if a generation for the stage is
    /// already running, and `CoreError::Validation` for a curated memo
    /// without investment content.
    pub async fn generate_memo(
        &self,
        report_id: &str,
        memo: MemoKind,
    ) -> Result<GenerationSummary, WorkflowError> {
        let key = (report_id.to_string(), memo);
        let generating: &Registry = &self.generating;
        let mut claimed = false;

        let started = self
            .store
            .update(report_id, |report, changes| {
                let mut running = generating.lock().map_err(|_| poisoned())?;
                let plan = plan(report, memo, running.contains(&key))?;
                if matches!(plan, Plan::Call(_)) {
                    running.insert(key.clone());
                    claimed = true;
                }
                changes.record(
                    TrailOp::Transition,
                    EntityType::Memo,
                    memo.as_str(),
                    snapshot(report, memo),
                );
                Ok(plan)
            })
            .await;
        let _claim = claimed.then(|| Claim {
            registry: generating,
            key: key.clone(),
        });
        let (report, plan) = started?;

        let prompt = match plan {
            Plan::Placeholder => {
                tracing::info!(report_id, memo = %memo, "no eligible sources, placeholder written");
                return Ok(GenerationSummary::of(&report, memo));
            }
            Plan::Call(prompt) => prompt,
        };

        tracing::debug!(report_id, memo = %memo, prompt_chars = prompt.len(), "generating memo");
        let result = self
            .generator
            .generate(Prompt::new(ModelRole::Text, prompt))
            .await
            .map_err(|e| e.to_string())
            .and_then(|g| {
                let text = g.text.trim().to_string();
                if text.is_empty() {
                    Err("the model returned an empty memo".to_string())
                } else {
                    Ok(text)
                }
            });

        let failure = result.as_ref().err().cloned();
        let committed = self
            .store
            .update(report_id, |report, changes| {
                commit(report, memo, result)?;
                changes.record(
                    TrailOp::Transition,
                    EntityType::Memo,
                    memo.as_str(),
                    snapshot(report, memo),
                );
                Ok(())
            })
            .await;
        let (report, ()) = committed?;

        match failure {
            None => {
                tracing::info!(report_id, memo = %memo, "memo generated");
                Ok(GenerationSummary::of(&report, memo))
            }
            Some(message) => {
                tracing::warn!(report_id, memo = %memo, %message, "memo generation failed");
                Err(WorkflowError::Generation { memo, message })
            }
        }
    }

    /// Replace investment memo preferences. The memo is cleared so the next
    /// visit to the stage regenerates it.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for invalid preferences.
    pub async fn update_investment_preferences(
        &self,
        report_id: &str,
        preferences: MemoPreferences,
    ) -> Result<Report, WorkflowError> {
        preferences.validate()?;
        let (report, ()) = self
            .store
            .update(report_id, |report, changes| {
                changes.record(TrailOp::Update, EntityType::Memo, MemoKind::Investment.as_str(), &preferences);
                report.investment_memo.reset_with(preferences);
                Ok(())
            })
            .await?;
        Ok(report)
    }

    /// Replace curated memo preferences and clear the curated memo.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn update_curated_preferences(
        &self,
        report_id: &str,
        preferences: CuratedPreferences,
    ) -> Result<Report, WorkflowError> {
        let (report, ()) = self
            .store
            .update(report_id, |report, changes| {
                changes.record(TrailOp::Update, EntityType::Memo, MemoKind::Curated.as_str(), &preferences);
                report.curated_memo.reset_with(preferences);
                Ok(())
            })
            .await?;
        Ok(report)
    }

    /// Overwrite the generated curated memo with analyst edits.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` before the curated memo has been generated.
    pub async fn edit_curated_content(
        &self,
        report_id: &str,
        content: String,
    ) -> Result<Report, WorkflowError> {
        let (report, ()) = self
            .store
            .update(report_id, |report, changes| {
                let chars = content.chars().count();
                report.curated_memo.edit(content)?;
                changes.record(
                    TrailOp::Update,
                    EntityType::Memo,
                    MemoKind::Curated.as_str(),
                    json!({ "edited_chars": chars }),
                );
                Ok(())
            })
            .await?;
        Ok(report)
    }
}

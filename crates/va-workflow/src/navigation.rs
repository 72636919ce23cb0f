//! Stage moves and the generation effects they request.
//!
//! Moving never generates by itself: the move is persisted first, then the
//! caller runs the returned effect through [`Workflow::request_generation`].

use serde_json::json;
use va_core::entities::Report;
use va_core::enums::{EntityType, Stage, TrailOp};
use va_core::errors::CoreError;
use va_core::responses::{GenerationSummary, StageResponse};
use va_core::stage::{self, MemoKind, Transition};
use va_genai::TextGenerator;
use va_store::ReportRepository;

use crate::{Workflow, WorkflowError};

impl<R, G> Workflow<R, G>
where
    R: ReportRepository,
    G: TextGenerator + 'static,
{
    /// Move to `target` (back any distance, forward one gated step).
    ///
    /// # Errors
    ///
    /// Returns `CoreError::StageGate` when the forward precondition is unmet
    /// and `CoreError::InvalidTransition` for skipping a stage.
    pub async fn navigate_to(&self, report_id: &str, target: Stage) -> Result<Transition, WorkflowError> {
        self.apply_move(report_id, |report| stage::navigate_to(report, target))
            .await
    }

    /// Move one stage forward.
    ///
    /// # Errors
    ///
    /// See [`Workflow::navigate_to`].
    pub async fn advance(&self, report_id: &str) -> Result<Transition, WorkflowError> {
        self.apply_move(report_id, stage::advance).await
    }

    /// Move back to `target` (the previous stage when `None`).
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` from stage 0 without a target
    /// or for a target ahead of the current stage.
    pub async fn retreat(
        &self,
        report_id: &str,
        target: Option<Stage>,
    ) -> Result<Transition, WorkflowError> {
        self.apply_move(report_id, |report| {
            let target = match target {
                Some(t) => t,
                None => report.current_stage.previous().ok_or_else(|| {
                    CoreError::InvalidTransition {
                        entity_type: "report".into(),
                        id: report.id.clone(),
                        from: report.current_stage.to_string(),
                        to: "previous stage".into(),
                    }
                })?,
            };
            stage::retreat(report, target)
        })
        .await
    }

    /// Run the generation a move asked for. A collaborator failure is
    /// reported in the returned summary; it is already recorded on the stage.
    ///
    /// # Errors
    ///
    /// Returns store and validation errors; generation failures are not errors here.
    pub async fn request_generation(
        &self,
        report_id: &str,
        effect: Option<MemoKind>,
    ) -> Result<Option<GenerationSummary>, WorkflowError> {
        let Some(memo) = effect else {
            return Ok(None);
        };
        match self.generate_memo(report_id, memo).await {
            Ok(summary) => Ok(Some(summary)),
            Err(WorkflowError::Generation { .. }) => {
                let report = self.store.get(report_id).await?;
                Ok(Some(GenerationSummary::of(&report, memo)))
            }
            Err(e) => Err(e),
        }
    }

    /// Navigate, then run the resulting effect.
    ///
    /// # Errors
    ///
    /// See [`Workflow::navigate_to`] and [`Workflow::request_generation`].
    pub async fn enter_stage(&self, report_id: &str, target: Stage) -> Result<StageResponse, WorkflowError> {
        let transition = self.navigate_to(report_id, target).await?;
        let generation = self.request_generation(report_id, transition.effect).await?;
        Ok(StageResponse {
            report_id: report_id.to_string(),
            transition,
            generation,
        })
    }

    async fn apply_move<F>(&self, report_id: &str, step: F) -> Result<Transition, WorkflowError>
    where
        F: FnOnce(&mut Report) -> Result<Transition, CoreError> + Send,
    {
        let (_, transition) = self
            .store
            .update(report_id, |report, changes| {
                let transition = step(report)?;
                changes.record(
                    TrailOp::Transition,
                    EntityType::Report,
                    report_id,
                    json!({ "from": transition.from, "to": transition.to }),
                );
                Ok(transition)
            })
            .await?;
        tracing::info!(
            report_id,
            from = %transition.from,
            to = %transition.to,
            effect = ?transition.effect,
            "stage changed"
        );
        Ok(transition)
    }
}

//! Stage navigation for a report.
//!
//! Navigation is pure: it validates and applies the stage move, then reports
//! which memo (if any) should be generated as a separate effect. Executing
//! that effect is the caller's job, so a move never triggers I/O by itself.
//!
//! ```text
//! data_collection ──[selected+completed source]──▶ investment_memo
//! investment_memo ──[memo content present]───────▶ curated_memo
//! any stage ──────────────────────────────────────▶ any earlier stage
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::Report;
use crate::enums::Stage;
use crate::errors::CoreError;

/// Which memo a generation effect targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MemoKind {
    Investment,
    Curated,
}

impl MemoKind {
    /// The stage that displays this memo.
    #[must_use]
    pub const fn stage(self) -> Stage {
        match self {
            Self::Investment => Stage::InvestmentMemo,
            Self::Curated => Stage::CuratedMemo,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Investment => "investment_memo",
            Self::Curated => "curated_memo",
        }
    }
}

impl fmt::Display for MemoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a stage move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Transition {
    pub from: Stage,
    pub to: Stage,
    /// Memo generation the caller should run after persisting the move.
    pub effect: Option<MemoKind>,
}

/// Check the gate for moving one stage forward and return the target.
///
/// # Errors
///
/// Returns `CoreError::InvalidTransition` from the last stage and
/// `CoreError::StageGate` when the target's precondition is unmet.
pub fn check_advance(report: &Report) -> Result<Stage, CoreError> {
    let from = report.current_stage;
    let Some(to) = from.next() else {
        return Err(invalid(report, from, from));
    };
    let reason = match to {
        Stage::InvestmentMemo if !report.can_proceed() => {
            Some("select at least one source that has finished processing")
        }
        Stage::CuratedMemo if !report.investment_memo.has_content() => {
            Some("generate the investment memo first")
        }
        _ => None,
    };
    match reason {
        Some(reason) => Err(CoreError::StageGate {
            from,
            to,
            reason: reason.to_string(),
        }),
        None => Ok(to),
    }
}

/// Move one stage forward if the gate allows it.
///
/// # Errors
///
/// See [`check_advance`].
pub fn advance(report: &mut Report) -> Result<Transition, CoreError> {
    let from = report.current_stage;
    let to = check_advance(report)?;
    report.current_stage = to;
    Ok(Transition {
        from,
        to,
        effect: pending_generation(report),
    })
}

/// Move back to `target`. Always allowed for any stage up to the current one.
///
/// # Errors
///
/// Returns `CoreError::InvalidTransition` if `target` is ahead of the
/// current stage.
pub fn retreat(report: &mut Report, target: Stage) -> Result<Transition, CoreError> {
    let from = report.current_stage;
    if target > from {
        return Err(invalid(report, from, target));
    }
    report.current_stage = target;
    Ok(Transition {
        from,
        to: target,
        effect: pending_generation(report),
    })
}

/// Go to `target`: backward or same-stage moves retreat, a single step
/// forward advances, anything else is rejected.
///
/// # Errors
///
/// Returns `CoreError::InvalidTransition` for jumps of more than one stage
/// and the gate errors of [`advance`].
pub fn navigate_to(report: &mut Report, target: Stage) -> Result<Transition, CoreError> {
    let from = report.current_stage;
    if target <= from {
        retreat(report, target)
    } else if from.next() == Some(target) {
        advance(report)
    } else {
        Err(invalid(report, from, target))
    }
}

/// The memo that should be generated for the report's current stage.
///
/// Stage 1 asks for the investment memo while it is idle without real
/// content; stage 2 asks for the curated memo while it is empty and the
/// investment memo has content to refine.
#[must_use]
pub fn pending_generation(report: &Report) -> Option<MemoKind> {
    match report.current_stage {
        Stage::DataCollection => None,
        Stage::InvestmentMemo => report
            .investment_memo
            .needs_generation()
            .then_some(MemoKind::Investment),
        Stage::CuratedMemo => (report.curated_memo.needs_generation()
            && report.investment_memo.has_content())
        .then_some(MemoKind::Curated),
    }
}

fn invalid(report: &Report, from: Stage, to: Stage) -> CoreError {
    CoreError::InvalidTransition {
        entity_type: "report".into(),
        id: report.id.clone(),
        from: from.to_string(),
        to: to.to_string(),
    }
}

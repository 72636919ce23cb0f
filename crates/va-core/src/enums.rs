//! Status enums, source kinds, memo preferences, and trail vocabulary for Analytica.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Status enums with state machines provide `allowed_next_states()` so the
//! workflow layer can reject invalid transitions before anything is persisted.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// SourceType
// ---------------------------------------------------------------------------

/// Kind of payload a data source carries. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Url,
    File,
    Text,
    Youtube,
    Image,
    Transcript,
    Assessment,
    Research,
}

impl SourceType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::File => "file",
            Self::Text => "text",
            Self::Youtube => "youtube",
            Self::Image => "image",
            Self::Transcript => "transcript",
            Self::Assessment => "assessment",
            Self::Research => "research",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SourceStatus
// ---------------------------------------------------------------------------

/// Ingestion status of a data source.
///
/// ```text
/// pending → processing → completed
///         ↘            ↘
///           failed       failed
/// ```
///
/// The lifecycle is forward-only: a source never returns to an earlier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl SourceStatus {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Processing, Self::Failed],
            Self::Processing => &[Self::Completed, Self::Failed],
            Self::Completed | Self::Failed => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Terminal states have no outgoing transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AgentStatus
// ---------------------------------------------------------------------------

/// Status shared by founder agents and memo generation.
///
/// ```text
/// idle → pending → completed
///          ↓           ↓
///        idle (failure / preference reset)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    #[default]
    Idle,
    Pending,
    Completed,
}

impl AgentStatus {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Idle => &[Self::Pending],
            Self::Pending => &[Self::Completed, Self::Idle],
            Self::Completed => &[Self::Idle, Self::Pending],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// Workflow stage of a report.
///
/// ```text
/// data_collection (0) → investment_memo (1) → curated_memo (2)
/// ```
///
/// Forward moves are one step at a time and gated; backward moves to any
/// earlier stage are always allowed. See [`crate::stage`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    DataCollection,
    InvestmentMemo,
    CuratedMemo,
}

impl Stage {
    pub const ALL: [Self; 3] = [Self::DataCollection, Self::InvestmentMemo, Self::CuratedMemo];

    /// Zero-based position in the workflow.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::DataCollection => 0,
            Self::InvestmentMemo => 1,
            Self::CuratedMemo => 2,
        }
    }

    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::DataCollection),
            1 => Some(Self::InvestmentMemo),
            2 => Some(Self::CuratedMemo),
            _ => None,
        }
    }

    #[must_use]
    pub const fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::DataCollection => None,
            Self::InvestmentMemo => Some(Self::DataCollection),
            Self::CuratedMemo => Some(Self::InvestmentMemo),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DataCollection => "data_collection",
            Self::InvestmentMemo => "investment_memo",
            Self::CuratedMemo => "curated_memo",
        }
    }

    /// Human-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DataCollection => "Data Collection",
            Self::InvestmentMemo => "Investment Memo",
            Self::CuratedMemo => "Curated Memo",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Memo preference vocabularies
// ---------------------------------------------------------------------------

/// Voice of a generated memo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Formal,
    #[default]
    Balanced,
    Bullish,
}

impl Tone {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Formal => "Formal",
            Self::Balanced => "Balanced",
            Self::Bullish => "Bullish",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target length of a generated memo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MemoLength {
    Concise,
    #[default]
    Standard,
    Detailed,
}

impl MemoLength {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Concise => "Concise",
            Self::Standard => "Standard",
            Self::Detailed => "Detailed",
        }
    }
}

impl fmt::Display for MemoLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who the curated memo is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    #[default]
    Internal,
    Lp,
    External,
}

impl Audience {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Internal => "Internal",
            Self::Lp => "LP Facing",
            Self::External => "External",
        }
    }

    /// Rewriting guidance handed to the model for this audience.
    #[must_use]
    pub const fn guidance(self) -> &'static str {
        match self {
            Self::Internal => "Keep technical details.",
            Self::Lp => "Be more formal and high-level.",
            Self::External => "Make it professional but accessible.",
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output format requested for the curated memo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Markdown,
    Pdf,
    Docx,
}

impl ExportFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Markdown => "Markdown",
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ReportOrigin
// ---------------------------------------------------------------------------

/// How a report came into existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportOrigin {
    /// Created by an analyst from scratch.
    #[default]
    Analyst,
    /// Submitted by a founder through the registration wizard.
    FounderSubmission,
    /// Analyst copy of a founder submission.
    FromSubmission,
}

impl ReportOrigin {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Analyst => "analyst",
            Self::FounderSubmission => "founder_submission",
            Self::FromSubmission => "from_submission",
        }
    }
}

impl fmt::Display for ReportOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Voice interview
// ---------------------------------------------------------------------------

/// Conversational state of the voice interview loop.
///
/// ```text
/// initializing → processing → speaking → listening → processing → ...
///                                 ↓           ↓
///                                idle  ←──────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    #[default]
    Initializing,
    Idle,
    Listening,
    Processing,
    Speaking,
}

impl InterviewStatus {
    /// Busy states block user input and completion.
    #[must_use]
    pub const fn is_busy(self) -> bool {
        matches!(self, Self::Initializing | Self::Processing | Self::Speaking)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::Idle => "idle",
            Self::Listening => "listening",
            Self::Processing => "processing",
            Self::Speaking => "speaking",
        }
    }
}

impl fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Author of a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Ai,
    User,
    System,
}

impl Speaker {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ai => "ai",
            Self::User => "user",
            Self::System => "system",
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Trail vocabulary
// ---------------------------------------------------------------------------

/// Entity kinds recorded in the trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Report,
    DataSource,
    Memo,
    Agent,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Report => "report",
            Self::DataSource => "data_source",
            Self::Memo => "memo",
            Self::Agent => "agent",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of mutation recorded in the trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TrailOp {
    Create,
    Update,
    Delete,
    Transition,
}

impl TrailOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Transition => "transition",
        }
    }
}

impl fmt::Display for TrailOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(SourceStatus::Pending, SourceStatus::Processing, true)]
    #[case(SourceStatus::Pending, SourceStatus::Failed, true)]
    #[case(SourceStatus::Processing, SourceStatus::Completed, true)]
    #[case(SourceStatus::Processing, SourceStatus::Failed, true)]
    #[case(SourceStatus::Pending, SourceStatus::Completed, false)]
    #[case(SourceStatus::Processing, SourceStatus::Pending, false)]
    #[case(SourceStatus::Completed, SourceStatus::Processing, false)]
    #[case(SourceStatus::Completed, SourceStatus::Failed, false)]
    #[case(SourceStatus::Failed, SourceStatus::Pending, false)]
    fn source_status_transitions(
        #[case] from: SourceStatus,
        #[case] to: SourceStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_transition_to(to), allowed);
    }

    #[test]
    fn terminal_source_states_have_no_exits() {
        assert!(SourceStatus::Completed.allowed_next_states().is_empty());
        assert!(SourceStatus::Failed.allowed_next_states().is_empty());
        assert!(!SourceStatus::Processing.is_terminal());
    }

    #[rstest]
    #[case(AgentStatus::Idle, AgentStatus::Pending, true)]
    #[case(AgentStatus::Idle, AgentStatus::Completed, false)]
    #[case(AgentStatus::Pending, AgentStatus::Completed, true)]
    #[case(AgentStatus::Pending, AgentStatus::Idle, true)]
    #[case(AgentStatus::Completed, AgentStatus::Idle, true)]
    fn agent_status_transitions(
        #[case] from: AgentStatus,
        #[case] to: AgentStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_transition_to(to), allowed);
    }

    #[test]
    fn stage_ordering_follows_index() {
        assert!(Stage::DataCollection < Stage::InvestmentMemo);
        assert!(Stage::InvestmentMemo < Stage::CuratedMemo);
        for stage in Stage::ALL {
            assert_eq!(Stage::from_index(stage.index()), Some(stage));
        }
        assert_eq!(Stage::from_index(3), None);
    }

    #[test]
    fn stage_neighbours() {
        assert_eq!(Stage::DataCollection.next(), Some(Stage::InvestmentMemo));
        assert_eq!(Stage::CuratedMemo.next(), None);
        assert_eq!(Stage::DataCollection.previous(), None);
        assert_eq!(Stage::CuratedMemo.previous(), Some(Stage::InvestmentMemo));
    }

    #[test]
    fn serde_uses_snake_case() {
        assert_eq!(
            serde_json::to_string(&Stage::InvestmentMemo).unwrap(),
            "\"investment_memo\""
        );
        assert_eq!(
            serde_json::to_string(&ReportOrigin::FounderSubmission).unwrap(),
            "\"founder_submission\""
        );
        let audience: Audience = serde_json::from_str("\"lp\"").unwrap();
        assert_eq!(audience, Audience::Lp);
    }

    #[test]
    fn display_matches_prompt_labels() {
        assert_eq!(Tone::Bullish.to_string(), "Bullish");
        assert_eq!(MemoLength::Concise.to_string(), "Concise");
        assert_eq!(Audience::Lp.to_string(), "LP Facing");
        assert_eq!(ExportFormat::Docx.to_string(), "DOCX");
    }

    #[test]
    fn interview_busy_states() {
        assert!(InterviewStatus::Speaking.is_busy());
        assert!(InterviewStatus::Initializing.is_busy());
        assert!(!InterviewStatus::Idle.is_busy());
        assert!(!InterviewStatus::Listening.is_busy());
    }
}

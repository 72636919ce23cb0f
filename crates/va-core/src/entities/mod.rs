//! Entity structs for the Analytica domain.
//!
//! All entities derive `Serialize`, `Deserialize`, `JsonSchema`, and `PartialEq`
//! so they round-trip through the JSON store and validate against generated
//! schemas in tests.

mod data_source;
mod memo;
mod report;

pub use data_source::{DEFAULT_SUMMARY_CHARS, DataSource, default_summary, truncate_chars};
pub use memo::{CuratedMemo, InvestmentMemo, MemoState, NO_SOURCES_PLACEHOLDER};
pub use report::{AgentRun, FounderContact, Report};

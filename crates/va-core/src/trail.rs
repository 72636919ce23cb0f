//! JSONL trail operation envelope.
//!
//! Every persisted mutation is appended as a `TrailOperation` to
//! `.analytica/trail/{report_id}.jsonl`, giving an audit log of how a report
//! moved through its stages.
//!
//! The `v` field supports schema versioning: lines without a `v` field
//! deserialize with `v == 1` via `#[serde(default)]`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{EntityType, TrailOp};

/// Current trail schema version.
pub const TRAIL_VERSION: u32 = 1;

const fn default_trail_version() -> u32 {
    1
}

/// A single operation recorded in the JSONL trail.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TrailOperation {
    /// Schema version. Defaults to 1 for lines without this field.
    #[serde(default = "default_trail_version")]
    pub v: u32,

    /// ISO 8601 timestamp of the operation.
    pub ts: String,

    /// Report the operation belongs to.
    pub report: String,

    /// What kind of mutation this represents.
    pub op: TrailOp,

    /// Which entity type was affected.
    pub entity: EntityType,

    /// ID of the affected entity.
    pub id: String,

    /// Operation payload. Schema depends on `op` and `entity`.
    pub data: serde_json::Value,
}

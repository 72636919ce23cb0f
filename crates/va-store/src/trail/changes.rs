//! Trail records collected while a mutation runs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use va_core::enums::{EntityType, TrailOp};
use va_core::trail::{TRAIL_VERSION, TrailOperation};

/// Operations recorded by one mutation closure.
///
/// Handed to the closure by `ReportService::update`; written to the trail
/// only if the mutation succeeds and the report is persisted.
#[derive(Debug)]
pub struct ChangeSet {
    report_id: String,
    now: DateTime<Utc>,
    ops: Vec<TrailOperation>,
}

impl ChangeSet {
    #[must_use]
    pub const fn new(report_id: String, now: DateTime<Utc>) -> Self {
        Self {
            report_id,
            now,
            ops: Vec::new(),
        }
    }

    /// Timestamp shared by every operation in this set.
    #[must_use]
    pub const fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Record one operation. Payloads that fail to serialize are stored as `null`.
    pub fn record(&mut self, op: TrailOp, entity: EntityType, id: &str, data: impl Serialize) {
        let data = serde_json::to_value(data).unwrap_or_else(|e| {
            tracing::warn!(%e, entity = %entity, id, "trail payload not serializable");
            serde_json::Value::Null
        });
        self.ops.push(TrailOperation {
            v: TRAIL_VERSION,
            ts: self.now.to_rfc3339(),
            report: self.report_id.clone(),
            op,
            entity,
            id: id.to_string(),
            data,
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    #[must_use]
    pub fn into_ops(self) -> Vec<TrailOperation> {
        self.ops
    }
}

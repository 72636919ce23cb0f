//! JSONL trail writer.
//!
//! Appends `TrailOperation` records to per-report
//! `.analytica/trail/{report_id}.jsonl` files. Uses
//! `serde_jsonlines::append_json_lines` for per-line appends.

use std::path::{Path, PathBuf};

use va_core::trail::TrailOperation;

use crate::error::StoreError;

/// Appends trail operations to per-report JSONL files.
///
/// `ReportService` calls `append()` after a mutation has been persisted.
pub struct TrailWriter {
    trail_dir: PathBuf,
    enabled: bool,
}

impl TrailWriter {
    /// Create a new `TrailWriter` pointing at the given directory.
    ///
    /// Creates the directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory cannot be created.
    pub fn new(trail_dir: PathBuf) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&trail_dir)?;
        Ok(Self {
            trail_dir,
            enabled: true,
        })
    }

    /// Create a disabled writer (for testing or when trail is not needed).
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            trail_dir: PathBuf::new(),
            enabled: false,
        }
    }

    /// Whether trail writing is currently enabled.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn path_for(&self, report_id: &str) -> PathBuf {
        self.trail_dir.join(format!("{report_id}.jsonl"))
    }

    /// Append operations to the report's JSONL file, in order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file write fails.
    pub fn append(&self, ops: &[TrailOperation]) -> Result<(), StoreError> {
        if !self.enabled {
            return Ok(());
        }
        let Some(first) = ops.first() else {
            return Ok(());
        };
        serde_jsonlines::append_json_lines(self.path_for(&first.report), ops)?;
        Ok(())
    }

    /// Read back every operation recorded for a report, oldest first.
    ///
    /// A report with no trail file has an empty history.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file exists but cannot be parsed.
    pub fn read(&self, report_id: &str) -> Result<Vec<TrailOperation>, StoreError> {
        let path = self.path_for(report_id);
        if !self.enabled || !path.exists() {
            return Ok(Vec::new());
        }
        let ops = serde_jsonlines::json_lines(&path)?.collect::<Result<Vec<TrailOperation>, _>>()?;
        Ok(ops)
    }

    /// The directory where trail files are stored.
    #[must_use]
    pub fn trail_dir(&self) -> &Path {
        &self.trail_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use va_core::enums::{EntityType, TrailOp};
    use va_core::trail::TRAIL_VERSION;

    fn op(report: &str, id: &str, trail_op: TrailOp) -> TrailOperation {
        TrailOperation {
            v: TRAIL_VERSION,
            ts: "2026-03-01T10:00:00Z".into(),
            report: report.into(),
            op: trail_op,
            entity: EntityType::DataSource,
            id: id.into(),
            data: serde_json::json!({}),
        }
    }

    #[test]
    fn appends_per_report_files() {
        let tmp = TempDir::new().unwrap();
        let writer = TrailWriter::new(tmp.path().join("trail")).unwrap();

        writer.append(&[op("rep-00000001", "src-1", TrailOp::Create)]).unwrap();
        writer
            .append(&[
                op("rep-00000001", "src-1", TrailOp::Update),
                op("rep-00000001", "src-1", TrailOp::Delete),
            ])
            .unwrap();
        writer.append(&[op("rep-00000002", "src-2", TrailOp::Create)]).unwrap();

        let first = writer.read("rep-00000001").unwrap();
        let kinds: Vec<_> = first.iter().map(|o| o.op).collect();
        assert_eq!(kinds, vec![TrailOp::Create, TrailOp::Update, TrailOp::Delete]);
        assert_eq!(writer.read("rep-00000002").unwrap().len(), 1);
    }

    #[test]
    fn disabled_writer_is_noop() {
        let writer = TrailWriter::disabled();
        assert!(!writer.is_enabled());
        writer.append(&[op("rep-00000001", "src-1", TrailOp::Create)]).unwrap();
        assert!(writer.read("rep-00000001").unwrap().is_empty());
    }

    #[test]
    fn unknown_report_has_empty_history() {
        let tmp = TempDir::new().unwrap();
        let writer = TrailWriter::new(tmp.path().to_path_buf()).unwrap();
        assert!(writer.read("rep-ffffffff").unwrap().is_empty());
    }
}

//! Service layer orchestrating report mutations with the JSONL trail.
//!
//! `ReportService` wraps a [`ReportRepository`] (document storage) and a
//! [`TrailWriter`] (JSONL history). Every mutation follows this protocol:
//! 1. Take the service write lock
//! 2. Load the report
//! 3. Run the mutation closure (domain rules may reject it)
//! 4. Bump `updated_at` and persist the whole document
//! 5. Append the recorded trail operations
//!
//! The document is the source of truth. Once step 4 succeeds the mutation
//! stands; a failed trail append is logged and does not fail the call.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use va_core::entities::Report;
use va_core::enums::{EntityType, TrailOp};
use va_core::errors::CoreError;
use va_core::trail::TrailOperation;

use crate::error::StoreError;
use crate::repos::{JsonStore, MemoryStore, ReportRepository};
use crate::trail::changes::ChangeSet;
use crate::trail::writer::TrailWriter;

/// Subdirectory of the project dir holding report documents.
pub const REPORTS_DIR: &str = "reports";
/// Subdirectory of the project dir holding trail files.
pub const TRAIL_DIR: &str = "trail";

/// Serialized, trailed access to reports. Cheap to clone.
pub struct ReportService<R> {
    repo: Arc<R>,
    trail: Arc<TrailWriter>,
    write_lock: Arc<Mutex<()>>,
}

impl<R> Clone for ReportService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            trail: Arc::clone(&self.trail),
            write_lock: Arc::clone(&self.write_lock),
        }
    }
}

impl ReportService<MemoryStore> {
    /// Memory-backed service with the trail disabled.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new(), TrailWriter::disabled())
    }
}

impl ReportService<JsonStore> {
    /// Open the JSON store under a project directory (usually `.analytica/`).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the report or trail directory cannot be created.
    pub fn open(project_dir: &Path, trail_enabled: bool) -> Result<Self, StoreError> {
        let repo = JsonStore::open(project_dir.join(REPORTS_DIR))?;
        let trail = if trail_enabled {
            TrailWriter::new(project_dir.join(TRAIL_DIR))?
        } else {
            TrailWriter::disabled()
        };
        Ok(Self::new(repo, trail))
    }
}

impl<R: ReportRepository> ReportService<R> {
    #[must_use]
    pub fn new(repo: R, trail: TrailWriter) -> Self {
        Self {
            repo: Arc::new(repo),
            trail: Arc::new(trail),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    #[must_use]
    pub fn repo(&self) -> &R {
        &self.repo
    }

    #[must_use]
    pub fn trail(&self) -> &TrailWriter {
        &self.trail
    }

    /// Store a new report.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidState` if the id is already taken.
    pub async fn create(&self, report: Report) -> Result<Report, StoreError> {
        let _guard = self.write_lock.lock().await;
        if self.repo.get(&report.id).await?.is_some() {
            return Err(StoreError::InvalidState(format!(
                "report {} already exists",
                report.id
            )));
        }
        self.repo.upsert(&report).await?;

        let mut changes = ChangeSet::new(report.id.clone(), report.created_at);
        changes.record(TrailOp::Create, EntityType::Report, &report.id, &report);
        self.record_trail(&report.id, &changes.into_ops());

        tracing::info!(report_id = %report.id, origin = %report.origin, "report created");
        Ok(report)
    }

    /// Fetch a report.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no report has this id.
    pub async fn get(&self, id: &str) -> Result<Report, StoreError> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// All reports, newest first.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub async fn list(&self) -> Result<Vec<Report>, StoreError> {
        let mut reports = self.repo.list().await?;
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(reports)
    }

    /// Delete a report and return its last state.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no report has this id.
    pub async fn delete(&self, id: &str) -> Result<Report, StoreError> {
        let _guard = self.write_lock.lock().await;
        let report = self.get(id).await?;
        self.repo.delete(id).await?;

        let mut changes = ChangeSet::new(id.to_string(), Utc::now());
        changes.record(TrailOp::Delete, EntityType::Report, id, ());
        self.record_trail(id, &changes.into_ops());

        tracing::info!(report_id = %id, "report deleted");
        Ok(report)
    }

    /// Load, mutate, persist, and trail a report.
    ///
    /// The closure sees the current document and a [`ChangeSet`] to record
    /// trail operations into. If it returns an error nothing is written.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown id, `StoreError::Core`
    /// if the closure rejects the mutation, or a persistence error.
    pub async fn update<T, F>(&self, id: &str, mutate: F) -> Result<(Report, T), StoreError>
    where
        F: FnOnce(&mut Report, &mut ChangeSet) -> Result<T, CoreError> + Send,
        T: Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut report = self.get(id).await?;
        let mut changes = ChangeSet::new(id.to_string(), Utc::now());

        let value = mutate(&mut report, &mut changes)?;

        report.updated_at = changes.now();
        self.repo.upsert(&report).await?;
        let ops = changes.into_ops();
        self.record_trail(id, &ops);

        tracing::debug!(report_id = %id, ops = ops.len(), "report updated");
        Ok((report, value))
    }

    fn record_trail(&self, report_id: &str, ops: &[TrailOperation]) {
        if let Err(error) = self.trail.append(ops) {
            tracing::warn!(report_id, ops = ops.len(), %error, "trail append failed; report already saved");
        }
    }

    /// Trail history for one report, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the trail file is unreadable.
    pub fn history(&self, id: &str) -> Result<Vec<TrailOperation>, StoreError> {
        self.trail.read(id)
    }
}

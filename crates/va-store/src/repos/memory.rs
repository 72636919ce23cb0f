//! In-memory repository, used by tests and throwaway sessions.

use std::collections::BTreeMap;

use tokio::sync::RwLock;
use va_core::entities::Report;

use crate::error::StoreError;
use crate::repos::ReportRepository;

#[derive(Debug, Default)]
pub struct MemoryStore {
    reports: RwLock<BTreeMap<String, Report>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportRepository for MemoryStore {
    async fn get(&self, id: &str) -> Result<Option<Report>, StoreError> {
        Ok(self.reports.read().await.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Report>, StoreError> {
        Ok(self.reports.read().await.values().cloned().collect())
    }

    async fn upsert(&self, report: &Report) -> Result<(), StoreError> {
        self.reports
            .write()
            .await
            .insert(report.id.clone(), report.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.reports.write().await.remove(id).is_some())
    }
}

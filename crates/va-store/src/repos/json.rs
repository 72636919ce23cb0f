//! JSON-file repository: one pretty-printed document per report.
//!
//! Files live at `{dir}/{report_id}.json`. Writes go to a sibling `.tmp`
//! file first and are renamed into place, so a crash never leaves a
//! half-written report.

use std::path::{Path, PathBuf};

use va_core::entities::Report;

use crate::error::StoreError;
use crate::repos::ReportRepository;

#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Open (and create if needed) a report directory.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, StoreError> {
        if id.is_empty() || id.contains(['/', '\\', '.']) {
            return Err(StoreError::InvalidState(format!("unsafe report id: {id:?}")));
        }
        Ok(self.dir.join(format!("{id}.json")))
    }

    async fn read(path: &Path) -> Result<Option<Report>, StoreError> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl ReportRepository for JsonStore {
    async fn get(&self, id: &str) -> Result<Option<Report>, StoreError> {
        let path = self.path_for(id)?;
        let report = Self::read(&path).await?;
        if let Some(ref r) = report {
            if r.id != id {
                return Err(StoreError::InvalidState(format!(
                    "{} holds report {}",
                    path.display(),
                    r.id
                )));
            }
        }
        Ok(report)
    }

    async fn list(&self) -> Result<Vec<Report>, StoreError> {
        let mut reports = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::read(&path).await {
                Ok(Some(report)) => reports.push(report),
                Ok(None) => {}
                Err(e) => tracing::warn!(path = %path.display(), %e, "skipping unreadable report"),
            }
        }
        Ok(reports)
    }

    async fn upsert(&self, report: &Report) -> Result<(), StoreError> {
        let path = self.path_for(&report.id)?;
        let tmp = path.with_extension("json.tmp");
        let body = serde_json::to_vec_pretty(report)?;
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        match tokio::fs::remove_file(self.path_for(id)?).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn report(id: &str) -> Report {
        Report::new(id.into(), "Acme".into(), "Acme - Initial Analysis".into(), Utc::now())
    }

    #[tokio::test]
    async fn roundtrips_through_disk() {
        let tmp = TempDir::new().unwrap();
        let store = JsonStore::open(tmp.path().join("reports")).unwrap();
        let original = report("rep-0000000a");

        store.upsert(&original).await.unwrap();
        assert!(tmp.path().join("reports/rep-0000000a.json").exists());
        assert!(!tmp.path().join("reports/rep-0000000a.json.tmp").exists());

        let loaded = store.get("rep-0000000a").await.unwrap().unwrap();
        assert_eq!(loaded, original);
    }

    #[tokio::test]
    async fn list_skips_foreign_and_corrupt_files() {
        let tmp = TempDir::new().unwrap();
        let store = JsonStore::open(tmp.path()).unwrap();
        store.upsert(&report("rep-00000001")).await.unwrap();
        store.upsert(&report("rep-00000002")).await.unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "hi").unwrap();
        std::fs::write(tmp.path().join("rep-broken.json"), "{not json").unwrap();

        let mut ids: Vec<_> = store.list().await.unwrap().into_iter().map(|r| r.id).collect();
        ids.sort();
        assert_eq!(ids, vec!["rep-00000001", "rep-00000002"]);
    }

    #[tokio::test]
    async fn missing_report_is_none() {
        let tmp = TempDir::new().unwrap();
        let store = JsonStore::open(tmp.path()).unwrap();
        assert!(store.get("rep-ffffffff").await.unwrap().is_none());
        assert!(!store.delete("rep-ffffffff").await.unwrap());
    }

    #[tokio::test]
    async fn path_traversal_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let store = JsonStore::open(tmp.path()).unwrap();
        assert!(matches!(
            store.get("../etc/passwd").await,
            Err(StoreError::InvalidState(_))
        ));
    }
}

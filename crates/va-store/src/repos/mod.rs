//! Report repositories.
//!
//! A repository stores whole `Report` documents by id. Mutation ordering and
//! trail writing live in [`crate::service::ReportService`], so backends only
//! need the four primitives below.

pub mod json;
pub mod memory;

use std::future::Future;

use va_core::entities::Report;

use crate::error::StoreError;

pub use json::JsonStore;
pub use memory::MemoryStore;

/// Persistence interface for reports.
pub trait ReportRepository: Send + Sync + 'static {
    /// Fetch one report, `None` if absent.
    fn get(&self, id: &str) -> impl Future<Output = Result<Option<Report>, StoreError>> + Send;

    /// Every stored report, in no particular order.
    fn list(&self) -> impl Future<Output = Result<Vec<Report>, StoreError>> + Send;

    /// Insert or replace by `report.id`.
    fn upsert(&self, report: &Report) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Remove a report. Returns whether it existed.
    fn delete(&self, id: &str) -> impl Future<Output = Result<bool, StoreError>> + Send;
}

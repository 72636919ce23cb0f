//! # va-store
//!
//! Report persistence for Analytica.
//!
//! Reports are stored as whole documents behind the [`ReportRepository`]
//! interface, either in memory or as one JSON file per report under
//! `.analytica/reports/`. Every mutation also lands in a per-report JSONL
//! trail under `.analytica/trail/`.

pub mod error;
pub mod repos;
pub mod service;
pub mod trail;

pub use error::StoreError;
pub use repos::{JsonStore, MemoryStore, ReportRepository};
pub use service::ReportService;
pub use trail::changes::ChangeSet;
pub use trail::writer::TrailWriter;

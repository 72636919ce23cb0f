//! # va-workflow
//!
//! The analyst and founder workflows for Analytica.
//!
//! [`Workflow`] ties a [`ReportService`] to a text collaborator and the loaded
//! configuration. Operations are grouped by concern:
//!
//! - `reports`: create, list, search, copy founder submissions
//! - `sources`: add, delete, select, rename data sources
//! - `ingestion`: background jobs that digest pending sources
//! - `navigation`: stage moves plus execution of their generation effect
//! - `memo`: investment and curated memo generation
//! - `agents`: founder voice call and behaviour test
//! - `research`: web-grounded deep research
//! - `registration`: founder wizard submission
//! - `interview`: async driver for the voice interview reducer
//! - `export`: Markdown and slide-deck outlines

pub mod agents;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod interview;
pub mod memo;
pub mod navigation;
pub mod prompts;
pub mod registration;
pub mod reports;
pub mod research;
pub mod retry;
pub mod sources;

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use va_config::AnalyticaConfig;
use va_core::stage::MemoKind;
use va_genai::TextGenerator;
use va_store::{ReportRepository, ReportService};

pub use error::WorkflowError;

/// Entry point for every report operation. Cheap to clone.
pub struct Workflow<R, G> {
    store: ReportService<R>,
    generator: Arc<G>,
    config: Arc<AnalyticaConfig>,
    /// Memo generations running in this process.
    generating: Arc<Mutex<HashSet<(String, MemoKind)>>>,
}

impl<R, G> Clone for Workflow<R, G> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            generator: Arc::clone(&self.generator),
            config: Arc::clone(&self.config),
            generating: Arc::clone(&self.generating),
        }
    }
}

impl<R, G> Workflow<R, G>
where
    R: ReportRepository,
    G: TextGenerator + 'static,
{
    #[must_use]
    pub fn new(store: ReportService<R>, generator: G, config: AnalyticaConfig) -> Self {
        Self {
            store,
            generator: Arc::new(generator),
            config: Arc::new(config),
            generating: Arc::default(),
        }
    }

    #[must_use]
    pub const fn store(&self) -> &ReportService<R> {
        &self.store
    }

    #[must_use]
    pub fn generator(&self) -> &G {
        &self.generator
    }

    #[must_use]
    pub fn config(&self) -> &AnalyticaConfig {
        &self.config
    }
}

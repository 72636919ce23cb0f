use std::path::PathBuf;

use anyhow::Context;
use va_config::{AnalyticaConfig, PROJECT_DIR};
use va_store::{JsonStore, ReportService};
use va_workflow::Workflow;

use crate::collaborator::Collaborator;

pub type CliWorkflow = Workflow<JsonStore, Collaborator>;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub workflow: CliWorkflow,
    pub project_root: PathBuf,
}

impl AppContext {
    /// Open the report store under `<project_root>/.analytica` and pick the
    /// text collaborator from `config.genai`.
    pub fn init(project_root: PathBuf, config: AnalyticaConfig) -> anyhow::Result<Self> {
        let project_dir = project_root.join(PROJECT_DIR);
        let store = ReportService::open(&project_dir, config.general.trail)
            .with_context(|| format!("failed to open report store at {}", project_dir.display()))?;
        let collaborator = Collaborator::from_config(&config.genai)?;
        tracing::debug!(
            root = %project_root.display(),
            online = collaborator.is_online(),
            "application context ready"
        );

        Ok(Self {
            workflow: Workflow::new(store, collaborator, config),
            project_root,
        })
    }

    #[must_use]
    pub fn config(&self) -> &AnalyticaConfig {
        self.workflow.config()
    }

    /// Default export directory: `general.export_dir` under the project root.
    #[must_use]
    pub fn export_dir(&self) -> PathBuf {
        self.project_root.join(&self.config().general.export_dir)
    }
}

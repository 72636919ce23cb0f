use std::path::Path;

use anyhow::Context;
use va_config::AnalyticaConfig;

/// Load `.env` from the project root, then the layered config for that root.
pub fn load_config(project_root: &Path) -> anyhow::Result<AnalyticaConfig> {
    load_project_dotenv(project_root)?;
    AnalyticaConfig::load_for_project(project_root).map_err(anyhow::Error::from)
}

fn load_project_dotenv(project_root: &Path) -> anyhow::Result<()> {
    let env_path = project_root.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
        return Ok(());
    }

    dotenvy::dotenv().ok();
    Ok(())
}

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use va_config::PROJECT_DIR;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::InitArgs;
use crate::output::output;

const CONFIG_FILE: &str = "config.toml";

const CONFIG_TEMPLATE: &str = r#"# Analytica project configuration.
# Environment variables override this file: ANALYTICA_<SECTION>__<KEY>,
# e.g. ANALYTICA_GENAI__API_KEY. GEMINI_API_KEY is also honored.

[genai]
# api_key = ""
text_model = "gemini-2.5-flash"
research_model = "gemini-2.5-flash"
structured_model = "gemini-2.5-pro"
chat_model = "gemini-2.5-pro"
tts_model = "gemini-2.5-flash-preview-tts"
voice = "Zephyr"
timeout_secs = 60

[ingestion]
processing_delay_ms = 1000
completion_delay_ms = 3000
max_attempts = 3
retry_base_delay_ms = 500
retry_max_delay_ms = 5000
summarize_with_model = false

[agents]
voice_delay_secs = 8
behaviour_delay_secs = 10

[general]
default_limit = 20
export_dir = "exports"
trail = true
"#;

#[derive(Debug, Serialize)]
struct InitResponse {
    project_root: String,
    config: String,
    overwritten: bool,
}

/// Handle `vana init`.
pub fn handle(args: &InitArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let root = match flags.project.as_deref() {
        Some(path) => {
            let path = PathBuf::from(path);
            match path.parent() {
                Some(parent) if path.file_name().is_some_and(|name| name == PROJECT_DIR) => {
                    parent.to_path_buf()
                }
                _ => path,
            }
        }
        None => std::env::current_dir().context("failed to read the current directory")?,
    };
    let response = scaffold(&root, args.force)?;
    output(&response, flags.format)
}

fn scaffold(root: &Path, force: bool) -> anyhow::Result<InitResponse> {
    let project_dir = root.join(PROJECT_DIR);
    let config_path = project_dir.join(CONFIG_FILE);
    let existed = config_path.exists();
    if existed && !force {
        anyhow::bail!(
            "{} already exists; pass --force to overwrite it",
            config_path.display()
        );
    }

    std::fs::create_dir_all(&project_dir)
        .with_context(|| format!("failed to create {}", project_dir.display()))?;
    std::fs::write(&config_path, CONFIG_TEMPLATE)
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    tracing::debug!(path = %config_path.display(), "project initialized");

    Ok(InitResponse {
        project_root: root.display().to_string(),
        config: config_path.display().to_string(),
        overwritten: existed,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use va_config::AnalyticaConfig;

    use super::{CONFIG_TEMPLATE, scaffold};

    #[test]
    fn template_matches_the_defaults() {
        let parsed: AnalyticaConfig = toml::from_str(CONFIG_TEMPLATE).expect("template should parse");
        let defaults = AnalyticaConfig::default();
        assert_eq!(parsed.genai.text_model, defaults.genai.text_model);
        assert_eq!(parsed.genai.voice, defaults.genai.voice);
        assert_eq!(parsed.ingestion.max_attempts, defaults.ingestion.max_attempts);
        assert_eq!(parsed.agents.voice_delay_secs, defaults.agents.voice_delay_secs);
        assert_eq!(parsed.general.export_dir, defaults.general.export_dir);
        parsed.validate().expect("template should validate");
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let temp = tempfile::tempdir().expect("tempdir should create");

        let first = scaffold(temp.path(), false).expect("first init");
        assert!(!first.overwritten);
        assert!(temp.path().join(".analytica/config.toml").is_file());

        let err = scaffold(temp.path(), false).expect_err("second init should fail");
        assert!(err.to_string().contains("--force"));

        let forced = scaffold(temp.path(), true).expect("forced init");
        assert!(forced.overwritten);
    }

    #[test]
    fn scaffolded_project_loads() {
        let temp = tempfile::tempdir().expect("tempdir should create");
        scaffold(temp.path(), false).expect("init");

        let config = AnalyticaConfig::load_for_project(temp.path()).expect("config should load");
        assert_eq!(config.general.default_limit, 20);
    }
}

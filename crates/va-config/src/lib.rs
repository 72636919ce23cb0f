//! # va-config
//!
//! Layered configuration loading for Analytica using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`ANALYTICA_*` prefix, `__` as separator)
//! 2. Project-level `.analytica/config.toml`
//! 3. User-level `~/.config/analytica/config.toml`
//! 4. `GEMINI_API_KEY` as a fallback for `genai.api_key`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `ANALYTICA_GENAI__API_KEY` -> `genai.api_key`,
//! `ANALYTICA_INGESTION__MAX_ATTEMPTS` -> `ingestion.max_attempts`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use va_config::AnalyticaConfig;
//!
//! let config = AnalyticaConfig::load_with_dotenv().expect("config");
//!
//! if config.genai.is_configured() {
//!     println!("text model: {}", config.genai.text_model);
//! }
//! ```

mod agents;
mod error;
mod general;
mod genai;
mod ingestion;

pub use agents::AgentsConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use genai::GenAiConfig;
pub use ingestion::IngestionConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project-local state directory.
pub const PROJECT_DIR: &str = ".analytica";

/// Conventional variable holding a Gemini key outside the `ANALYTICA_` namespace.
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnalyticaConfig {
    #[serde(default)]
    pub genai: GenAiConfig,
    #[serde(default)]
    pub ingestion: IngestionConfig,
    #[serde(default)]
    pub agents: AgentsConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl AnalyticaConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source fails to parse or a value
    /// has the wrong type, and `ConfigError::InvalidValue` if a section
    /// fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Load configuration for a project rooted at `project_root`, reading
    /// `<project_root>/.analytica/config.toml` instead of the working
    /// directory's.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_for_project(project_root: &Path) -> Result<Self, ConfigError> {
        let local = project_root.join(PROJECT_DIR).join("config.toml");
        let config: Self = Self::figment_with(&local).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        Self::figment_with(&Self::project_config_path())
    }

    fn figment_with(local_path: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 0: conventional key variable, lowest of the real sources
        figment = figment.merge(
            Env::raw()
                .only(&[GEMINI_API_KEY_VAR])
                .map(|_| "genai.api_key".into()),
        );

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment = figment.merge(Env::prefixed("ANALYTICA_").split("__"));

        figment
    }

    /// Cross-field checks that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ingestion.validate()?;
        self.genai.validate()?;
        Ok(())
    }

    /// `.analytica/config.toml` relative to the working directory.
    #[must_use]
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(PROJECT_DIR).join("config.toml")
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("analytica").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) looking for a `.env`
    /// file, then falls back to the current directory. Missing files are fine.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AnalyticaConfig::default();
        assert!(!config.genai.is_configured());
        config.validate().expect("defaults validate");
        assert_eq!(config.general.default_limit, 20);
    }

    #[test]
    fn project_config_is_read_from_the_given_root() {
        figment::Jail::expect_with(|jail| {
            jail.create_dir("deal/.analytica")?;
            jail.create_file(
                "deal/.analytica/config.toml",
                "[ingestion]\nmax_attempts = 5\n\n[general]\nexport_dir = \"out\"\n",
            )?;
            jail.set_env("ANALYTICA_GENERAL__DEFAULT_LIMIT", "7");

            let config = AnalyticaConfig::load_for_project(&jail.directory().join("deal"))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.ingestion.max_attempts, 5);
            assert_eq!(config.general.export_dir, "out");
            assert_eq!(config.general.default_limit, 7);
            Ok(())
        });
    }

    #[test]
    fn figment_builds_without_files() {
        figment::Jail::expect_with(|_jail| {
            let config: AnalyticaConfig = AnalyticaConfig::figment().extract()?;
            assert_eq!(config.ingestion.processing_delay_ms, 1000);
            assert_eq!(config.agents.voice_delay_secs, 8);
            Ok(())
        });
    }
}

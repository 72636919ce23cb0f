//! Integration tests for TOML configuration loading.
//!
//! Uses `figment::Jail` for sandboxed files and env vars.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;
use va_config::AnalyticaConfig;

#[test]
fn loads_genai_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[genai]
api_key = "toml-key"
text_model = "gemini-2.5-pro"
voice = "Puck"
timeout_secs = 30
"#,
        )?;

        let config: AnalyticaConfig = Figment::from(Serialized::defaults(AnalyticaConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert!(config.genai.is_configured());
        assert_eq!(config.genai.api_key, "toml-key");
        assert_eq!(config.genai.text_model, "gemini-2.5-pro");
        assert_eq!(config.genai.voice, "Puck");
        assert_eq!(config.genai.timeout_secs, 30);
        // Untouched fields keep their defaults.
        assert_eq!(config.genai.tts_model, "gemini-2.5-flash-preview-tts");
        Ok(())
    });
}

#[test]
fn loads_ingestion_and_agents_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[ingestion]
processing_delay_ms = 10
completion_delay_ms = 20
max_attempts = 5
summarize_with_model = true

[agents]
voice_delay_secs = 1
"#,
        )?;

        let config: AnalyticaConfig = Figment::from(Serialized::defaults(AnalyticaConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.ingestion.processing_delay_ms, 10);
        assert_eq!(config.ingestion.completion_delay_ms, 20);
        assert_eq!(config.ingestion.max_attempts, 5);
        assert!(config.ingestion.summarize_with_model);
        assert_eq!(config.agents.voice_delay_secs, 1);
        assert_eq!(config.agents.behaviour_delay_secs, 10);
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[general]
default_limit = 50
export_dir = "out"
"#,
        )?;
        jail.set_env("ANALYTICA_GENERAL__DEFAULT_LIMIT", "5");

        let config: AnalyticaConfig = Figment::from(Serialized::defaults(AnalyticaConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("ANALYTICA_").split("__"))
            .extract()?;

        assert_eq!(config.general.default_limit, 5);
        assert_eq!(config.general.export_dir, "out");
        Ok(())
    });
}

#[test]
fn project_config_file_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".analytica")?;
        jail.create_file(
            ".analytica/config.toml",
            r#"
[genai]
research_model = "gemini-2.5-pro"
"#,
        )?;

        let config = AnalyticaConfig::load().expect("config loads");
        assert_eq!(config.genai.research_model, "gemini-2.5-pro");
        Ok(())
    });
}

#[test]
fn invalid_value_fails_load() {
    Jail::expect_with(|jail| {
        jail.set_env("ANALYTICA_INGESTION__MAX_ATTEMPTS", "0");
        let err = AnalyticaConfig::load().unwrap_err();
        assert!(err.to_string().contains("ingestion.max_attempts"));
        Ok(())
    });
}

#[test]
fn wrong_type_is_a_figment_error() {
    Jail::expect_with(|jail| {
        jail.set_env("ANALYTICA_GENAI__TIMEOUT_SECS", "soon");
        assert!(matches!(
            AnalyticaConfig::load(),
            Err(va_config::ConfigError::Figment(_))
        ));
        Ok(())
    });
}

use va_config::AnalyticaConfig;

const SECTIONS: [&str; 4] = ["GENAI", "INGESTION", "AGENTS", "GENERAL"];

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &AnalyticaConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &AnalyticaConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    for section in SECTIONS {
        let single = format!("ANALYTICA_{section}_");
        let double = format!("ANALYTICA_{section}__");
        if let Some(key) = env_keys
            .iter()
            .find(|key| key.starts_with(&single) && !key.starts_with(&double))
        {
            warnings.push(format!(
                "{key} is ignored. Use double underscores between section and field (example: {double}{})",
                key.trim_start_matches(&single)
            ));
        }
    }

    if !config.genai.is_configured() {
        warnings.push(
            "No Gemini API key configured (GEMINI_API_KEY or ANALYTICA_GENAI__API_KEY). Memo generation, research, and interviews will fail."
                .to_string(),
        );
    }

    warnings
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use va_config::AnalyticaConfig;

    use super::collect_unconfigured_warnings;

    fn configured() -> AnalyticaConfig {
        let mut config = AnalyticaConfig::default();
        config.genai.api_key = "key".to_string();
        config
    }

    #[test]
    fn warns_for_single_underscore_keys() {
        let warnings = collect_unconfigured_warnings(
            &configured(),
            vec![
                ("ANALYTICA_GENAI_API_KEY".to_string(), "key".to_string()),
                ("ANALYTICA_INGESTION__MAX_ATTEMPTS".to_string(), "5".to_string()),
            ],
        );

        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("ANALYTICA_GENAI__API_KEY"));
    }

    #[test]
    fn warns_when_no_api_key_is_set() {
        let warnings = collect_unconfigured_warnings(&AnalyticaConfig::default(), Vec::new());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("GEMINI_API_KEY"));
    }

    #[test]
    fn quiet_when_configured_correctly() {
        let warnings = collect_unconfigured_warnings(
            &configured(),
            vec![("ANALYTICA_GENERAL__DEFAULT_LIMIT".to_string(), "5".to_string())],
        );
        assert!(warnings.is_empty());
    }
}

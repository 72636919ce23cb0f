use serde::de::DeserializeOwned;
use va_core::assessment::{AssessmentAnswers, QUESTIONS};
use va_core::enums::Stage;
use va_workflow::agents::AgentKind;

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// A stage by name (`investment-memo`) or index (`1`).
pub fn parse_stage(raw: &str) -> anyhow::Result<Stage> {
    if let Ok(index) = raw.trim().parse::<u8>() {
        return Stage::from_index(index)
            .ok_or_else(|| anyhow::anyhow!("invalid stage '{raw}': index must be 0, 1, or 2"));
    }
    parse_enum(raw, "stage")
}

pub fn parse_agent(raw: &str) -> anyhow::Result<AgentKind> {
    parse_enum(raw, "agent")
}

/// `name=percent` as given to `memo prefs --weight`.
pub fn parse_weight(raw: &str) -> anyhow::Result<(String, u8)> {
    let (name, weight) = raw
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("invalid weight '{raw}': expected name=percent"))?;
    let weight = weight
        .trim()
        .parse::<u8>()
        .map_err(|error| anyhow::anyhow!("invalid weight '{raw}': {error}"))?;
    Ok((name.trim().to_string(), weight))
}

/// Behavioural test answers as 1-based options, comma separated.
pub fn parse_answers(raw: &str) -> anyhow::Result<AssessmentAnswers> {
    let options: Vec<&str> = raw.split(',').map(str::trim).collect();
    if options.len() != QUESTIONS.len() {
        anyhow::bail!(
            "expected {} answers, got {}",
            QUESTIONS.len(),
            options.len()
        );
    }

    let mut answers = AssessmentAnswers::new();
    for (question, option) in options.into_iter().enumerate() {
        let option = option
            .parse::<usize>()
            .ok()
            .and_then(|o| o.checked_sub(1))
            .ok_or_else(|| {
                anyhow::anyhow!("answer {} must be a number from 1 to 4", question + 1)
            })?;
        answers.answer(question, option)?;
    }
    Ok(answers)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use va_core::enums::{Stage, Tone};
    use va_workflow::agents::AgentKind;

    use super::{parse_agent, parse_answers, parse_enum, parse_stage, parse_weight};

    #[test]
    fn parses_snake_case_enum() {
        let tone: Tone = parse_enum("bullish", "tone").expect("tone should parse");
        assert_eq!(tone, Tone::Bullish);
    }

    #[test]
    fn parses_hyphenated_alias() {
        assert_eq!(
            parse_agent("founder-voice").expect("agent should parse"),
            AgentKind::FounderVoice
        );
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<Tone>("grumpy", "tone").expect_err("should fail");
        assert!(err.to_string().contains("invalid tone 'grumpy'"));
    }

    #[test]
    fn stage_accepts_names_and_indexes() {
        assert_eq!(parse_stage("1").expect("index"), Stage::InvestmentMemo);
        assert_eq!(parse_stage("curated-memo").expect("name"), Stage::CuratedMemo);
        assert!(parse_stage("3").is_err());
    }

    #[test]
    fn weight_splits_name_and_percent() {
        assert_eq!(
            parse_weight("Market Analysis = 15").expect("weight"),
            ("Market Analysis".to_string(), 15)
        );
        assert!(parse_weight("Team").is_err());
        assert!(parse_weight("Team=lots").is_err());
    }

    #[test]
    fn answers_need_twenty_options_in_range() {
        let all_ones = vec!["1"; 20].join(",");
        let answers = parse_answers(&all_ones).expect("answers should parse");
        assert!(answers.is_complete());

        assert!(parse_answers("1,2,3").is_err());
        let zero = format!("0,{}", vec!["1"; 19].join(","));
        assert!(parse_answers(&zero).is_err());
        let five = format!("5,{}", vec!["1"; 19].join(","));
        assert!(parse_answers(&five).is_err());
    }
}

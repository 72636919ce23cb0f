//! Prompt text handed to the generative collaborator.
//!
//! Every builder is a pure function of the report so the same report always
//! produces the same prompt.

use std::fmt::Write as _;

use va_core::entities::{DataSource, Report};
use va_core::preferences::MAX_SECTION_WEIGHT;

/// Stage-1 prompt, or `None` when no selected source has finished ingestion.
#[must_use]
pub fn investment_memo(report: &Report) -> Option<String> {
    let sources: Vec<&DataSource> = report.eligible_sources().collect();
    if sources.is_empty() {
        return None;
    }
    let prefs = &report.investment_memo.preferences;

    let mut prompt = format!(
        "You are an AI investment analyst for a venture capital firm. Your task is to draft a comprehensive investment memo.\n\n\
Company: {}\n\
Description: {}\n\n\
Use the following summarized data sources to inform your analysis:\n\
--- DATA SOURCES ---\n",
        report.company_name,
        report.description.as_deref().unwrap_or_default(),
    );
    for source in sources {
        let _ = write!(
            prompt,
            "Source: {}\nSummary: {}\n\n",
            source.label(),
            source.summary.as_deref().unwrap_or_default()
        );
    }
    let _ = write!(
        prompt,
        "--- END DATA SOURCES ---\n\n\
The memo should have a {} tone and its length should be {}.\n\n\
Generate the memo covering the following sections, with the indicated importance. \
Omit any sections that are not relevant or for which you have insufficient data.\n\
--- SECTIONS & WEIGHTS ---\n",
        prefs.tone, prefs.length
    );
    for section in prefs.enabled_sections() {
        let _ = writeln!(
            prompt,
            "- {} (Importance: {}/{MAX_SECTION_WEIGHT})",
            section.name, section.weight
        );
    }
    prompt.push_str(
        "--- END SECTIONS ---\n\n\
Format the output in Markdown. Start with a main heading for the company name.",
    );
    push_custom(&mut prompt, &prefs.custom_instructions);
    Some(prompt)
}

/// Stage-2 prompt refining the investment memo for an audience.
#[must_use]
pub fn curated_memo(report: &Report) -> String {
    let prefs = &report.curated_memo.preferences;
    let mut prompt = format!(
        "You are an AI assistant for a venture capital firm. Your task is to refine an existing investment memo based on specific preferences.\n\n\
Original Memo Content:\n\
---\n\
{}\n\
---\n\n\
Refinement Instructions:\n\
- Target Audience: {}. Adjust the tone, language, and level of detail accordingly. {}\n\
- Desired Format: {}. Ensure the output is clean Markdown.\n\
- Review the entire memo for clarity, conciseness, and impact.\n\
- Do not introduce new facts, but rephrase and restructure the existing content to better suit the target audience.\n\n\
Return only the refined Markdown content.",
        report.investment_memo.content,
        prefs.audience,
        prefs.audience.guidance(),
        prefs.format,
    );
    push_custom(&mut prompt, &prefs.custom_instructions);
    prompt
}

fn push_custom(prompt: &mut String, custom: &str) {
    let custom = custom.trim();
    if !custom.is_empty() {
        let _ = write!(prompt, "\n\nAdditional instructions:\n{custom}");
    }
}

/// Request for a short digest of one source during ingestion.
#[must_use]
pub fn source_digest(source: &DataSource, body: &str) -> String {
    format!(
        "Summarize the following {} data source for a venture capital analyst in two or three sentences. \
Focus on facts about the company, its market, traction, and team. Return only the summary.\n\n\
Label: {}\n\
---\n\
{body}\n\
---",
        source.source_type,
        source.label(),
    )
}

/// Request for a digest of a web page or video the model reads through search.
#[must_use]
pub fn link_digest(source: &DataSource) -> String {
    format!(
        "Look up the {} at {} and summarize what it says about the company in two or three sentences \
for a venture capital analyst. Return only the summary.",
        if source.source_type == va_core::enums::SourceType::Youtube {
            "video"
        } else {
            "web page"
        },
        source.content.trim(),
    )
}

/// Four starting points for deep research on a company.
#[must_use]
pub fn suggested_research_queries(company: &str, description: &str) -> Vec<String> {
    let sector = description
        .split(" for ")
        .nth(1)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("sector");
    vec![
        format!("What is the market size (TAM, SAM, SOM) for {description}?"),
        format!("Who are the main competitors for {company}?"),
        format!("Recent news and funding rounds related to {company}."),
        format!("Key technology trends in the {sector}."),
    ]
}

/// Request to structure a memo into a slide deck.
#[must_use]
pub fn deck_outline(company: &str, memo: &str) -> String {
    format!(
        "Analyze the following investment memo for \"{company}\". Your task is to structure this content into a professional PowerPoint presentation and identify key data points that can be visualized as charts.\n\n\
Memo Content:\n\
---\n\
{memo}\n\
---\n\n\
Instructions:\n\
1. Create a main title slide for the company.\n\
2. Break down the memo into logical slides based on the \"##\" headers. Each header should be a slide title.\n\
3. For each slide, summarize the content into concise bullet points.\n\
4. **Crucially**, where you find quantifiable data (like financials, market size projections, TAM/SAM/SOM breakdowns, or competitive market share), create a 'chart' object.\n\
5. Use 'bar' charts for comparisons (e.g., revenue over years, competitor features) and 'pie' charts for compositions (e.g., market share, use of funds).\n\
6. Ensure the data in the chart object is clean and correctly formatted. The 'value' must be a number.\n\
7. Return the entire presentation structure in the specified JSON format."
    )
}

/// System instruction for the founder interviewer.
pub const INTERVIEWER_INSTRUCTION: &str = "You are an AI Assistant for Investor Evaluation. Your tone is polite, professional, and supportive. Your process is very structured. Follow these steps precisely.

**Step 1: Introduction & Consent**
- Introduce yourself as the \"AI Assistant for Investor Evaluation\".
- Ask: \"Is this a good time to answer a few questions about you and your startup?\"
- Wait for the founder to agree before continuing.

**Step 2: Verification**
- Ask: \"To start, could you please confirm your full name and your role in the company?\"

**Step 3: Questioning Flow (CRITICAL)**
- Ask the questions from the list below one by one. Never ask more than one question at a time.
- After each answer, acknowledge it briefly with \"Thank you.\" or \"I see, thanks for sharing.\" and then ask the next question.
- If an answer is very short or vague, probe once with \"Could you elaborate on that a little?\"
- If an answer is unintelligible, say \"I'm sorry, I didn't quite catch that. Could you please repeat your answer?\"
- Do not skip questions and do not change their order.
- Do not give advice or opinions about the answers.

**Question List:**
1. Could you tell me about yourself and your professional journey so far?
2. What inspired you to become a founder?
3. What problem is your startup solving?
4. Why do you believe your solution is unique?
5. Who are your target customers?
6. Can you share your current traction (customers, revenue, or adoption numbers)?
7. Tell me about your founding team and their strengths.
8. Where do you see your startup in the next 3–5 years?
9. Is there anything else you'd like investors to know about you or your company?

**Step 4: Closing**
- Thank the founder for their time.
- Summarize that their details will be shared with the investment analysts.
- Say goodbye, ending with \"Thank you for your time, and have a great day!\"

Begin now with Step 1.";

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use va_core::enums::{Audience, SourceType, Tone};

    fn report() -> Report {
        let now = Utc::now();
        let mut report = Report::new("rep-1".into(), "Acme".into(), "Acme - Initial Analysis".into(), now);
        report.description = Some("AI bookkeeping for small shops".into());
        report
    }

    fn completed(id: &str, summary: &str, selected: bool) -> DataSource {
        let mut s = DataSource::pending(id.into(), SourceType::Text, "body".into(), Some(id.into()), Utc::now());
        s.mark_processing().unwrap();
        s.complete(summary.into()).unwrap();
        s.is_selected = selected;
        s
    }

    #[test]
    fn investment_prompt_needs_an_eligible_source() {
        let mut r = report();
        assert_eq!(investment_memo(&r), None);
        r.add_source(completed("deck", "unused", false));
        assert_eq!(investment_memo(&r), None);
    }

    #[test]
    fn investment_prompt_lists_selected_summaries_and_sections() {
        let mut r = report();
        r.add_source(completed("deck", "Revenue doubled", true));
        r.add_source(completed("notes", "Ignored summary", false));
        r.investment_memo.preferences.tone = Tone::Bullish;

        let prompt = investment_memo(&r).unwrap();
        assert!(prompt.contains("Company: Acme\nDescription: AI bookkeeping for small shops"));
        assert!(prompt.contains("Source: deck\nSummary: Revenue doubled\n\n--- END DATA SOURCES ---"));
        assert!(!prompt.contains("Ignored summary"));
        assert!(prompt.contains("a Bullish tone and its length should be Standard"));
        assert!(prompt.contains("- Executive Summary (Importance: 25/25)\n"));
        assert!(!prompt.contains("Investment Score"));
        assert!(prompt.ends_with("Start with a main heading for the company name."));
    }

    #[test]
    fn custom_instructions_are_appended() {
        let mut r = report();
        r.add_source(completed("deck", "s", true));
        r.investment_memo.preferences.custom_instructions = "  Focus on unit economics ".into();
        let prompt = investment_memo(&r).unwrap();
        assert!(prompt.ends_with("Additional instructions:\nFocus on unit economics"));
    }

    #[test]
    fn curated_prompt_names_audience_and_forbids_new_facts() {
        let mut r = report();
        r.investment_memo.content = "# Acme\n\n## Team\nStrong".into();
        r.curated_memo.preferences.audience = Audience::Lp;
        let prompt = curated_memo(&r);
        assert!(prompt.contains("---\n# Acme\n\n## Team\nStrong\n---"));
        assert!(prompt.contains("Target Audience: LP Facing."));
        assert!(prompt.contains("Be more formal and high-level."));
        assert!(prompt.contains("Do not introduce new facts"));
        assert!(prompt.ends_with("Return only the refined Markdown content."));
    }

    #[test]
    fn research_queries_pick_sector_after_for() {
        let queries = suggested_research_queries("Acme", "AI bookkeeping for small shops");
        assert_eq!(queries.len(), 4);
        assert_eq!(queries[1], "Who are the main competitors for Acme?");
        assert_eq!(queries[3], "Key technology trends in the small shops.");

        let queries = suggested_research_queries("Acme", "Robots");
        assert_eq!(queries[3], "Key technology trends in the sector.");
    }

    #[test]
    fn interviewer_instruction_lists_nine_questions() {
        assert!(INTERVIEWER_INSTRUCTION.contains("9. Is there anything else"));
        assert!(INTERVIEWER_INSTRUCTION.ends_with("Begin now with Step 1."));
    }
}

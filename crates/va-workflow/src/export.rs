//! Memo exports: raw Markdown and a slide-deck outline.
//!
//! The deck outline is asked from the structured-output model under a
//! response schema. Any failure there falls back to splitting the memo on
//! its `## ` headings.

use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use va_core::entities::Report;
use va_core::errors::CoreError;
use va_core::responses::ExportResponse;
use va_genai::{ModelRole, Prompt, TextGenerator};
use va_store::ReportRepository;

use crate::{Workflow, WorkflowError, prompts};

pub const DECK_SUBTITLE: &str = "Investment Memo Analysis";
pub const DECK_FOOTER: &str = "VentureAnalytica AI | Confidential";
const FALLBACK_TITLE: &str = "Content";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Pie,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChartPoint {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Chart {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub title: String,
    pub data: Vec<ChartPoint>,
}

/// One content slide. A chart, when present, renders on its own slide
/// right after this one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Slide {
    pub title: String,
    pub bullets: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<Chart>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OutlineSource {
    Model,
    HeadingSplit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DeckOutline {
    pub title: String,
    pub subtitle: String,
    pub footer: String,
    pub slides: Vec<Slide>,
    pub source: OutlineSource,
}

impl DeckOutline {
    fn new(company: &str, slides: Vec<Slide>, source: OutlineSource) -> Self {
        Self {
            title: company.to_string(),
            subtitle: DECK_SUBTITLE.to_string(),
            footer: DECK_FOOTER.to_string(),
            slides,
            source,
        }
    }

    /// Rendered slide count: title slide, content slides, chart slides.
    #[must_use]
    pub fn slide_count(&self) -> usize {
        1 + self.slides.len() + self.slides.iter().filter(|s| s.chart.is_some()).count()
    }
}

/// Response schema handed to the structured-output model, in Gemini's
/// OpenAPI subset. Mirrors `ModelDeck`.
#[must_use]
pub fn deck_response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "slides": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "content": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "chart": {
                            "type": "OBJECT",
                            "properties": {
                                "type": { "type": "STRING", "enum": ["bar", "pie"] },
                                "title": { "type": "STRING" },
                                "data": {
                                    "type": "ARRAY",
                                    "items": {
                                        "type": "OBJECT",
                                        "properties": {
                                            "name": { "type": "STRING" },
                                            "value": { "type": "NUMBER" }
                                        },
                                        "required": ["name", "value"]
                                    }
                                }
                            },
                            "required": ["type", "title", "data"]
                        }
                    },
                    "required": ["title", "content"]
                }
            }
        },
        "required": ["slides"]
    })
}

#[derive(Deserialize)]
struct ModelDeck {
    slides: Vec<ModelSlide>,
}

#[derive(Deserialize)]
struct ModelSlide {
    title: String,
    #[serde(default)]
    content: Vec<String>,
    chart: Option<Chart>,
}

/// Parse the model's JSON into slides. Charts without data are dropped.
///
/// # Errors
///
/// Returns `CoreError::Validation` for malformed JSON or an empty deck.
pub fn parse_model_deck(text: &str) -> Result<Vec<Slide>, CoreError> {
    let deck: ModelDeck = serde_json::from_str(text.trim())
        .map_err(|e| CoreError::Validation(format!("deck outline is not valid JSON: {e}")))?;
    if deck.slides.is_empty() {
        return Err(CoreError::Validation("deck outline has no slides".into()));
    }
    Ok(deck
        .slides
        .into_iter()
        .map(|s| Slide {
            title: s.title,
            bullets: s.content,
            chart: s.chart.filter(|c| !c.data.is_empty()),
        })
        .collect())
}

/// Split a memo on `## ` headings: heading markers removed, first line is
/// the title, leading `-` stripped from bullets.
#[must_use]
pub fn split_by_headings(markdown: &str) -> Vec<Slide> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    for line in markdown.lines() {
        if line.starts_with("## ") && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
        .iter()
        .map(|chunk| {
            let mut lines = chunk.lines();
            let title = lines
                .next()
                .map(|l| l.trim_start_matches('#').trim())
                .filter(|l| !l.is_empty())
                .unwrap_or(FALLBACK_TITLE)
                .to_string();
            let bullets = lines
                .map(|l| l.trim().trim_start_matches('#').trim())
                .map(|l| l.strip_prefix('-').unwrap_or(l).trim())
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect();
            Slide {
                title,
                bullets,
                chart: None,
            }
        })
        .collect()
}

/// The memo text to export: curated if generated, else investment.
///
/// # Errors
///
/// Returns `CoreError::Validation` when neither memo has content.
pub fn export_content(report: &Report) -> Result<&str, CoreError> {
    if report.curated_memo.has_content() {
        Ok(&report.curated_memo.content)
    } else if report.investment_memo.has_content() {
        Ok(&report.investment_memo.content)
    } else {
        Err(CoreError::Validation(
            "there is no generated memo to export".into(),
        ))
    }
}

/// `<company, whitespace runs as _>_Investment_Memo.md`
#[must_use]
pub fn markdown_filename(company: &str) -> String {
    format!("{}_Investment_Memo.md", company.split_whitespace().collect::<Vec<_>>().join("_"))
}

/// `<company>-Investment-Memo.deck.json`
#[must_use]
pub fn deck_filename(company: &str) -> String {
    format!("{}-Investment-Memo.deck.json", company.replace(['/', '\\'], "_"))
}

fn write_export(report_id: &str, dir: &Path, name: &str, body: &str) -> Result<ExportResponse, WorkflowError> {
    std::fs::create_dir_all(dir)?;
    let path: PathBuf = dir.join(name);
    std::fs::write(&path, body)?;
    tracing::info!(report_id, path = %path.display(), bytes = body.len(), "export written");
    Ok(ExportResponse {
        report_id: report_id.to_string(),
        path: path.display().to_string(),
        bytes: body.len(),
    })
}

impl<R, G> Workflow<R, G>
where
    R: ReportRepository,
    G: TextGenerator + 'static,
{
    /// Write the memo as Markdown under `dir`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` without a generated memo, or an I/O error.
    pub async fn export_markdown(&self, report_id: &str, dir: &Path) -> Result<ExportResponse, WorkflowError> {
        let report = self.store.get(report_id).await?;
        let content = export_content(&report)?;
        write_export(report_id, dir, &markdown_filename(&report.company_name), content)
    }

    /// Build the deck outline, preferring the model's structured answer.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` without a generated memo.
    pub async fn build_deck(&self, report_id: &str) -> Result<DeckOutline, WorkflowError> {
        let report = self.store.get(report_id).await?;
        let content = export_content(&report)?;
        let company = &report.company_name;

        let prompt = Prompt::new(ModelRole::Structured, prompts::deck_outline(company, content))
            .with_schema(deck_response_schema());
        let structured = match self.generator.generate(prompt).await {
            Ok(generation) => parse_model_deck(&generation.text).map_err(WorkflowError::from),
            Err(e) => Err(e.into()),
        };
        Ok(match structured {
            Ok(slides) => DeckOutline::new(company, slides, OutlineSource::Model),
            Err(e) => {
                tracing::warn!(report_id, error = %e, "structured deck failed, splitting on headings");
                DeckOutline::new(company, split_by_headings(content), OutlineSource::HeadingSplit)
            }
        })
    }

    /// Write the deck outline as JSON under `dir`.
    ///
    /// # Errors
    ///
    /// See [`Workflow::build_deck`]; also I/O and serialization errors.
    pub async fn export_deck(&self, report_id: &str, dir: &Path) -> Result<ExportResponse, WorkflowError> {
        let deck = self.build_deck(report_id).await?;
        let body = serde_json::to_string_pretty(&deck).map_err(anyhow::Error::from)?;
        write_export(report_id, dir, &deck_filename(&deck.title), &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MEMO: &str = "# Acme\nIntro line\n## Team\n- Ada, CEO\n- Bob, CTO\n\n## Market\nTAM is $4B";

    #[test]
    fn heading_split_makes_one_slide_per_section() {
        let slides = split_by_headings(MEMO);
        let titles: Vec<&str> = slides.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Acme", "Team", "Market"]);
        assert_eq!(slides[0].bullets, vec!["Intro line"]);
        assert_eq!(slides[1].bullets, vec!["Ada, CEO", "Bob, CTO"]);
        assert_eq!(slides[2].bullets, vec!["TAM is $4B"]);
    }

    #[test]
    fn heading_split_of_blank_first_line_uses_fallback_title() {
        let slides = split_by_headings("\nJust text");
        assert_eq!(slides[0].title, "Content");
    }

    #[test]
    fn model_deck_drops_empty_charts() {
        let text = r#"{"slides":[
            {"title":"Market","content":["TAM $4B"],"chart":{"type":"pie","title":"Share","data":[{"name":"Acme","value":12.5}]}},
            {"title":"Team","content":["Ada"],"chart":{"type":"bar","title":"Empty","data":[]}}
        ]}"#;
        let slides = parse_model_deck(text).unwrap();
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].chart.as_ref().unwrap().kind, ChartKind::Pie);
        assert_eq!(slides[1].chart, None);

        let deck = DeckOutline::new("Acme", slides, OutlineSource::Model);
        assert_eq!(deck.slide_count(), 4);
    }

    #[test]
    fn model_deck_rejects_garbage() {
        assert!(parse_model_deck("not json").is_err());
        assert!(parse_model_deck(r#"{"slides":[]}"#).is_err());
    }

    #[test]
    fn filenames_follow_company() {
        assert_eq!(markdown_filename("Acme  Robotics Inc"), "Acme_Robotics_Inc_Investment_Memo.md");
        assert_eq!(deck_filename("Acme Robotics"), "Acme Robotics-Investment-Memo.deck.json");
    }

    #[test]
    fn response_schema_mirrors_the_model_deck() {
        let schema = deck_response_schema();
        let slide = &schema["properties"]["slides"]["items"];
        let mut fields: Vec<_> = slide["properties"].as_object().unwrap().keys().cloned().collect();
        fields.sort();
        assert_eq!(fields, vec!["chart", "content", "title"]);
        assert_eq!(
            slide["properties"]["chart"]["properties"]["type"]["enum"],
            serde_json::json!(["bar", "pie"])
        );

        // The smallest deck the schema allows must parse.
        let minimal = r#"{"slides":[{"title":"Summary","content":[]}]}"#;
        let slides = parse_model_deck(minimal).unwrap();
        assert_eq!(slides[0].title, "Summary");
        assert!(slides[0].bullets.is_empty());
    }

    #[test]
    fn deck_outline_schema_accepts_written_deck() {
        let schema = serde_json::to_value(schemars::schema_for!(DeckOutline)).unwrap();
        let deck = DeckOutline::new("Acme", split_by_headings(MEMO), OutlineSource::HeadingSplit);
        let instance = serde_json::to_value(&deck).unwrap();
        assert!(jsonschema::is_valid(&schema, &instance));
    }
}

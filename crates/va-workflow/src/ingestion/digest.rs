//! Turning a source's raw content into the summary a memo prompt uses.

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use va_core::entities::{DataSource, truncate_chars};
use va_core::enums::SourceType;
use va_genai::{GenAiError, ModelRole, Prompt, TextGenerator};

use crate::prompts;
use crate::sources::parse_data_uri;

/// Characters of content named in a simulated summary when there is no filename.
const SIMULATED_LABEL_CHARS: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DigestError {
    /// The content cannot be digested at all. Never retried.
    #[error("unreadable source: {0}")]
    Unreadable(String),

    /// The collaborator refused the request. Never retried.
    #[error("summarization rejected: {0}")]
    Rejected(String),

    /// The collaborator was unavailable. Worth another attempt.
    #[error("summarizer unavailable: {0}")]
    Unavailable(String),
}

impl DigestError {
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

impl From<GenAiError> for DigestError {
    fn from(err: GenAiError) -> Self {
        if err.is_transient() {
            Self::Unavailable(err.to_string())
        } else {
            Self::Rejected(err.to_string())
        }
    }
}

/// Produces the summary stored on a completed source.
pub trait SourceDigester: Send + Sync {
    fn digest(&self, source: &DataSource)
    -> impl Future<Output = Result<String, DigestError>> + Send;
}

/// Offline digester: names the source instead of reading it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedDigester;

impl SimulatedDigester {
    /// `Summary for <filename or first 30 chars of content>...`
    #[must_use]
    pub fn summarize(source: &DataSource) -> String {
        let label = source
            .filename
            .as_deref()
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| truncate_chars(&source.content, SIMULATED_LABEL_CHARS));
        format!("Summary for {label}...")
    }
}

impl SourceDigester for SimulatedDigester {
    async fn digest(&self, source: &DataSource) -> Result<String, DigestError> {
        if source.content.trim().is_empty() {
            return Err(DigestError::Unreadable("source has no content".into()));
        }
        Ok(Self::summarize(source))
    }
}

/// Asks the text collaborator for a short summary.
///
/// Links are read through web search. Text bodies and text-typed files are
/// sent inline; binary files fall back to the simulated summary.
pub struct ModelDigester<G> {
    generator: Arc<G>,
}

impl<G> ModelDigester<G> {
    #[must_use]
    pub const fn new(generator: Arc<G>) -> Self {
        Self { generator }
    }
}

fn is_textual(mime: &str) -> bool {
    mime.starts_with("text/") || mime == "application/json"
}

impl<G: TextGenerator> SourceDigester for ModelDigester<G> {
    async fn digest(&self, source: &DataSource) -> Result<String, DigestError> {
        if source.content.trim().is_empty() {
            return Err(DigestError::Unreadable("source has no content".into()));
        }
        let prompt = match source.source_type {
            SourceType::Url | SourceType::Youtube => {
                Prompt::new(ModelRole::Research, prompts::link_digest(source)).with_web_search()
            }
            _ => match parse_data_uri(&source.content) {
                Some((mime, bytes)) if is_textual(mime) => {
                    let body = String::from_utf8_lossy(&bytes);
                    Prompt::new(ModelRole::Text, prompts::source_digest(source, &body))
                }
                Some((mime, _)) => {
                    tracing::debug!(source_id = %source.id, mime, "binary body, using simulated summary");
                    return Ok(SimulatedDigester::summarize(source));
                }
                None if source.content.starts_with("data:") => {
                    return Err(DigestError::Unreadable("malformed data URI".into()));
                }
                None => Prompt::new(ModelRole::Text, prompts::source_digest(source, &source.content)),
            },
        };

        let generation = self.generator.generate(prompt).await?;
        Ok(generation.text.trim().to_string())
    }
}

/// The digester chosen by configuration.
pub enum Digester<G> {
    Simulated(SimulatedDigester),
    Model(ModelDigester<G>),
}

impl<G: TextGenerator> SourceDigester for Digester<G> {
    async fn digest(&self, source: &DataSource) -> Result<String, DigestError> {
        match self {
            Self::Simulated(d) => d.digest(source).await,
            Self::Model(d) => d.digest(source).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;
    use va_genai::Generation;

    use crate::sources::data_uri;

    fn source(source_type: SourceType, content: &str, filename: Option<&str>) -> DataSource {
        DataSource::pending(
            "src-00000001".into(),
            source_type,
            content.into(),
            filename.map(Into::into),
            Utc::now(),
        )
    }

    #[derive(Default)]
    struct Recorder {
        prompts: Mutex<Vec<Prompt>>,
        fail_with: Option<u16>,
    }

    impl TextGenerator for Recorder {
        async fn generate(&self, prompt: Prompt) -> Result<Generation, GenAiError> {
            self.prompts.lock().unwrap().push(prompt);
            match self.fail_with {
                Some(status) => Err(GenAiError::Api {
                    status,
                    message: "boom".into(),
                }),
                None => Ok(Generation::text("  A concise summary. ")),
            }
        }
    }

    #[tokio::test]
    async fn simulated_names_filename_or_content() {
        let named = source(SourceType::File, "data:x", Some("deck.pdf"));
        assert_eq!(SimulatedDigester.digest(&named).await.unwrap(), "Summary for deck.pdf...");

        let unnamed = source(SourceType::Text, "Founded in 2021 by two engineers from Stripe", None);
        assert_eq!(
            SimulatedDigester.digest(&unnamed).await.unwrap(),
            "Summary for Founded in 2021 by two enginee..."
        );
    }

    #[tokio::test]
    async fn empty_content_is_unreadable() {
        let empty = source(SourceType::Text, "   ", Some("notes"));
        let err = SimulatedDigester.digest(&empty).await.unwrap_err();
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn links_are_read_through_search() {
        let generator = Arc::new(Recorder::default());
        let digester = ModelDigester::new(Arc::clone(&generator));
        let summary = digester
            .digest(&source(SourceType::Url, "https://acme.io", None))
            .await
            .unwrap();
        assert_eq!(summary, "A concise summary.");

        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].web_search);
        assert_eq!(prompts[0].role, ModelRole::Research);
        assert!(prompts[0].text.contains("web page at https://acme.io"));
    }

    #[tokio::test]
    async fn text_files_are_decoded_and_binaries_skipped() {
        let generator = Arc::new(Recorder::default());
        let digester = ModelDigester::new(Arc::clone(&generator));

        let notes = source(SourceType::File, &data_uri("text/plain", b"Churn is 2%"), Some("notes.txt"));
        digester.digest(&notes).await.unwrap();
        let pdf = source(SourceType::File, &data_uri("application/pdf", b"%PDF"), Some("deck.pdf"));
        assert_eq!(digester.digest(&pdf).await.unwrap(), "Summary for deck.pdf...");

        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].text.contains("Churn is 2%"));
    }

    #[tokio::test]
    async fn server_errors_are_retryable_client_errors_are_not() {
        let flaky = ModelDigester::new(Arc::new(Recorder {
            fail_with: Some(503),
            ..Recorder::default()
        }));
        let text = source(SourceType::Text, "body", None);
        assert!(flaky.digest(&text).await.unwrap_err().is_retryable());

        let refused = ModelDigester::new(Arc::new(Recorder {
            fail_with: Some(400),
            ..Recorder::default()
        }));
        assert!(matches!(
            refused.digest(&text).await.unwrap_err(),
            DigestError::Rejected(_)
        ));
    }
}

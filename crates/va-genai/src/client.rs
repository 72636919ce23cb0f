//! Gemini REST client.

use std::time::Duration;

use base64::{Engine, engine::general_purpose::STANDARD};
use va_config::GenAiConfig;

use crate::{
    error::GenAiError,
    http::check_response,
    speech::{SPEECH_STYLE_PREFIX, SpeechAudio, SpeechSynthesizer},
    text::{Generation, GroundingSource, ModelRole, Prompt, TextGenerator},
    wire::{
        Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, SpeechConfig,
        Tool,
    },
};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// HTTP client for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: GenAiConfig,
}

impl GeminiClient {
    /// Build a client from the `genai` config section.
    ///
    /// # Errors
    ///
    /// Returns [`GenAiError::NotConfigured`] without an API key, or
    /// [`GenAiError::Http`] if the HTTP client cannot be built.
    pub fn new(config: GenAiConfig) -> Result<Self, GenAiError> {
        if !config.is_configured() {
            return Err(GenAiError::NotConfigured);
        }
        let http = reqwest::Client::builder()
            .user_agent("analytica/0.1")
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    /// Model name configured for a role.
    #[must_use]
    pub fn model_for(&self, role: ModelRole) -> &str {
        match role {
            ModelRole::Text => &self.config.text_model,
            ModelRole::Research => &self.config.research_model,
            ModelRole::Structured => &self.config.structured_model,
            ModelRole::Chat => &self.config.chat_model,
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{model}:generateContent",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn call(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenAiError> {
        tracing::debug!(model, turns = body.contents.len(), "gemini: generateContent");
        let resp = self
            .http
            .post(self.endpoint(model))
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(body)
            .send()
            .await?;
        let resp = check_response(resp).await?;
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| GenAiError::Parse(e.to_string()))
    }
}

/// Translate a [`Prompt`] into a request body.
pub(crate) fn build_request(prompt: Prompt) -> GenerateContentRequest {
    let mut contents: Vec<Content> = prompt
        .history
        .iter()
        .map(|t| Content::text(Some(t.role.as_str()), t.text.clone()))
        .collect();
    contents.push(Content::text(Some("user"), prompt.text));

    let generation_config = prompt.response_schema.map(|schema| GenerationConfig {
        response_mime_type: Some("application/json".to_string()),
        response_schema: Some(schema),
        ..GenerationConfig::default()
    });

    GenerateContentRequest {
        contents,
        system_instruction: prompt.system_instruction.map(|s| Content::text(None, s)),
        tools: if prompt.web_search {
            vec![Tool::google_search()]
        } else {
            Vec::new()
        },
        generation_config,
    }
}

/// Pull text and grounding sources out of a response.
pub(crate) fn read_generation(resp: &GenerateContentResponse) -> Result<Generation, GenAiError> {
    let candidate = resp.first_candidate().map_err(GenAiError::EmptyResponse)?;
    let text = candidate.text();
    if text.trim().is_empty() {
        let reason = candidate
            .finish_reason
            .clone()
            .unwrap_or_else(|| "no text".to_string());
        return Err(GenAiError::EmptyResponse(reason));
    }

    let sources = candidate
        .grounding_metadata
        .iter()
        .flat_map(|m| m.grounding_chunks.iter())
        .filter_map(|c| c.web.as_ref())
        .filter_map(|w| {
            let uri = w.uri.clone()?;
            Some(GroundingSource {
                title: w.title.clone().unwrap_or_else(|| uri.clone()),
                uri,
            })
        })
        .collect();

    Ok(Generation { text, sources })
}

/// Decode the inline audio part of a speech response.
pub(crate) fn read_audio(resp: &GenerateContentResponse) -> Result<SpeechAudio, GenAiError> {
    let candidate = resp.first_candidate().map_err(GenAiError::EmptyResponse)?;
    let data = candidate
        .inline_data()
        .ok_or_else(|| GenAiError::EmptyResponse("no audio part".to_string()))?;
    let pcm = STANDARD
        .decode(&data.data)
        .map_err(|e| GenAiError::Parse(format!("audio payload: {e}")))?;
    Ok(SpeechAudio::from_mime(pcm, &data.mime_type))
}

impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: Prompt) -> Result<Generation, GenAiError> {
        let model = self.model_for(prompt.role).to_string();
        let body = build_request(prompt);
        let resp = self.call(&model, &body).await?;
        let generation = read_generation(&resp)?;
        tracing::debug!(
            model,
            chars = generation.text.len(),
            sources = generation.sources.len(),
            "gemini: generated"
        );
        Ok(generation)
    }
}

impl SpeechSynthesizer for GeminiClient {
    async fn synthesize(&self, text: &str) -> Result<SpeechAudio, GenAiError> {
        let body = GenerateContentRequest {
            contents: vec![Content::text(
                Some("user"),
                format!("{SPEECH_STYLE_PREFIX}{text}"),
            )],
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["AUDIO".to_string()],
                speech_config: Some(SpeechConfig::voice(&self.config.voice)),
                ..GenerationConfig::default()
            }),
            ..GenerateContentRequest::default()
        };
        let resp = self.call(&self.config.tts_model, &body).await?;
        read_audio(&resp)
    }
}

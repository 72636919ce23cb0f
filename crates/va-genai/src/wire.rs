//! Gemini `generateContent` request and response bodies.

use serde::{Deserialize, Serialize};

// ── Request ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn text(role: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: Some(text.into()),
                inline_data: None,
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Tool {
    pub google_search: serde_json::Value,
}

impl Tool {
    pub fn google_search() -> Self {
        Self {
            google_search: serde_json::json!({}),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub response_modalities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_config: Option<SpeechConfig>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechConfig {
    pub voice_config: VoiceConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    pub prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrebuiltVoiceConfig {
    pub voice_name: String,
}

impl SpeechConfig {
    pub fn voice(name: &str) -> Self {
        Self {
            voice_config: VoiceConfig {
                prebuilt_voice_config: PrebuiltVoiceConfig {
                    voice_name: name.to_string(),
                },
            },
        }
    }
}

// ── Response ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroundingChunk {
    #[serde(default)]
    pub web: Option<WebChunk>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebChunk {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl GenerateContentResponse {
    /// First candidate, or why there is none.
    pub fn first_candidate(&self) -> Result<&Candidate, String> {
        self.candidates.first().ok_or_else(|| {
            self.prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.clone())
                .map_or_else(|| "no candidates".to_string(), |r| format!("blocked: {r}"))
        })
    }
}

impl Candidate {
    /// Concatenated text parts.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect()
    }

    /// First inline binary part.
    pub fn inline_data(&self) -> Option<&InlineData> {
        self.content
            .iter()
            .flat_map(|c| c.parts.iter())
            .find_map(|p| p.inline_data.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn request_uses_provider_field_names() {
        let req = GenerateContentRequest {
            contents: vec![Content::text(Some("user"), "hello")],
            system_instruction: Some(Content::text(None, "be brief")),
            tools: vec![Tool::google_search()],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".into()),
                response_schema: Some(json!({"type": "OBJECT"})),
                ..Default::default()
            }),
        };

        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "contents": [{"role": "user", "parts": [{"text": "hello"}]}],
                "systemInstruction": {"parts": [{"text": "be brief"}]},
                "tools": [{"google_search": {}}],
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "responseSchema": {"type": "OBJECT"}
                }
            })
        );
    }

    #[test]
    fn speech_request_shape() {
        let config = GenerationConfig {
            response_modalities: vec!["AUDIO".into()],
            speech_config: Some(SpeechConfig::voice("Zephyr")),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({
                "responseModalities": ["AUDIO"],
                "speechConfig": {"voiceConfig": {"prebuiltVoiceConfig": {"voiceName": "Zephyr"}}}
            })
        );
    }

    #[test]
    fn parses_grounded_response() {
        let body = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "The market "}, {"text": "is large."}]},
                "finishReason": "STOP",
                "groundingMetadata": {
                    "groundingChunks": [
                        {"web": {"uri": "https://example.com/a", "title": "Report A"}},
                        {"web": {"uri": "https://example.com/b"}},
                        {}
                    ]
                }
            }]
        }"#;
        let resp: GenerateContentResponse = serde_json::from_str(body).unwrap();
        let candidate = resp.first_candidate().unwrap();
        assert_eq!(candidate.text(), "The market is large.");
        let chunks = &candidate.grounding_metadata.as_ref().unwrap().grounding_chunks;
        assert_eq!(chunks.len(), 3);
        assert!(chunks[2].web.is_none());
    }

    #[test]
    fn parses_audio_response() {
        let body = r#"{
            "candidates": [{
                "content": {"parts": [{"inlineData": {"mimeType": "audio/L16;codec=pcm;rate=24000", "data": "AAAA"}}]}
            }]
        }"#;
        let resp: GenerateContentResponse = serde_json::from_str(body).unwrap();
        let data = resp.first_candidate().unwrap().inline_data().unwrap();
        assert_eq!(data.mime_type, "audio/L16;codec=pcm;rate=24000");
        assert_eq!(data.data, "AAAA");
    }

    #[test]
    fn blocked_prompt_reports_reason() {
        let resp: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();
        assert_eq!(resp.first_candidate().unwrap_err(), "blocked: SAFETY");
    }
}

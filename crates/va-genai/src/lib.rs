//! # va-genai
//!
//! Gemini REST client for Analytica.
//!
//! Covers the provider features the workflow needs:
//! - plain text generation (memo drafting and refinement)
//! - web-search grounding (deep research)
//! - structured JSON output under a response schema (deck outlines)
//! - multi-turn chat (founder voice interview)
//! - text-to-speech (interviewer voice)
//!
//! The workflow depends on the [`TextGenerator`] and [`SpeechSynthesizer`]
//! traits, not on [`GeminiClient`], so tests substitute scripted fakes.

mod chat;
mod client;
mod error;
mod http;
mod speech;
mod text;
mod wire;

pub use chat::ChatSession;
pub use client::GeminiClient;
pub use error::GenAiError;
pub use speech::{DEFAULT_SAMPLE_RATE, SPEECH_STYLE_PREFIX, SpeechAudio, SpeechSynthesizer};
pub use text::{
    Generation, GroundingSource, ModelRole, Prompt, TextGenerator, Turn, TurnRole,
};

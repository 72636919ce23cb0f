//! Speech synthesis output and collaborator trait.

use std::future::Future;
use std::time::Duration;

use crate::error::GenAiError;

/// Sample rate the provider uses for synthesized speech when the MIME type omits one.
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

/// Style hint prepended to every synthesized utterance.
pub const SPEECH_STYLE_PREFIX: &str =
    "Speak this naturally and conversationally, without awkward pauses: ";

/// Raw 16-bit little-endian PCM audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechAudio {
    pub pcm: Vec<u8>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl SpeechAudio {
    /// Mono audio at the provider's default rate.
    #[must_use]
    pub const fn mono(pcm: Vec<u8>) -> Self {
        Self {
            pcm,
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels: 1,
        }
    }

    /// Build from a provider MIME type such as `audio/L16;codec=pcm;rate=24000`.
    #[must_use]
    pub fn from_mime(pcm: Vec<u8>, mime_type: &str) -> Self {
        let sample_rate = mime_type
            .split(';')
            .filter_map(|p| p.trim().strip_prefix("rate="))
            .find_map(|r| r.parse().ok())
            .unwrap_or(DEFAULT_SAMPLE_RATE);
        Self {
            sample_rate,
            ..Self::mono(pcm)
        }
    }

    /// Interleaved 16-bit samples.
    pub fn samples(&self) -> impl Iterator<Item = i16> + '_ {
        self.pcm
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
    }

    /// Playback length.
    #[must_use]
    pub fn duration(&self) -> Duration {
        let frames = self.pcm.len() as u64 / 2 / u64::from(self.channels.max(1));
        Duration::from_millis(frames * 1000 / u64::from(self.sample_rate.max(1)))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pcm.len() < 2
    }
}

/// Anything that can speak text aloud.
pub trait SpeechSynthesizer: Send + Sync {
    fn synthesize(&self, text: &str) -> impl Future<Output = Result<SpeechAudio, GenAiError>> + Send;
}

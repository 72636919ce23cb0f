//! Interviewer speech written to disk as WAV files.

use std::path::{Path, PathBuf};

use va_genai::SpeechAudio;
use va_workflow::WorkflowError;
use va_workflow::interview::AudioSink;

/// Audio sink for a terminal without playback: each utterance becomes
/// `turn-NNN.wav` in `dir`, or is dropped when no directory was given.
#[derive(Debug, Default)]
pub struct WavSink {
    dir: Option<PathBuf>,
    count: usize,
    written: Vec<PathBuf>,
}

impl WavSink {
    pub fn new(dir: Option<PathBuf>) -> std::io::Result<Self> {
        if let Some(dir) = &dir {
            std::fs::create_dir_all(dir)?;
        }
        Ok(Self {
            dir,
            count: 0,
            written: Vec::new(),
        })
    }

    #[must_use]
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl AudioSink for WavSink {
    async fn play(&mut self, audio: SpeechAudio) -> Result<(), WorkflowError> {
        self.count += 1;
        let Some(dir) = &self.dir else {
            return Ok(());
        };
        if audio.is_empty() {
            return Ok(());
        }
        let path = dir.join(format!("turn-{:03}.wav", self.count));
        write_wav(&path, &audio)?;
        tracing::debug!(path = %path.display(), "interviewer turn written");
        self.written.push(path);
        Ok(())
    }

    fn stop(&mut self) {}
}

fn write_wav(path: &Path, audio: &SpeechAudio) -> Result<(), WorkflowError> {
    let spec = hound::WavSpec {
        channels: audio.channels.max(1),
        sample_rate: audio.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).map_err(anyhow::Error::from)?;
    for sample in audio.samples() {
        writer.write_sample(sample).map_err(anyhow::Error::from)?;
    }
    writer.finalize().map_err(anyhow::Error::from)?;
    Ok(())
}

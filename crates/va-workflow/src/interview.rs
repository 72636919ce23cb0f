//! Async driver for the founder voice interview.
//!
//! The reducer in `va_core::interview` decides what happens next; this
//! driver executes its commands against the chat model, the speech
//! synthesizer, an audio sink, and an optional speech recognizer, feeding
//! each result back in as the next event.

use std::collections::VecDeque;
use std::future::Future;

use chrono::Utc;
use va_core::entities::DataSource;
use va_core::ids::{self, PREFIX_SOURCE};
use va_core::interview::{Interview, InterviewCommand, InterviewEvent};
use va_genai::{ChatSession, SpeechAudio, SpeechSynthesizer, TextGenerator};

use crate::WorkflowError;
use crate::prompts::INTERVIEWER_INSTRUCTION;

pub const INIT_FAILED: &str = "Failed to initialize the AI agent.";
pub const REPLY_FAILED: &str = "Failed to get AI response.";

/// Where synthesized speech is played.
pub trait AudioSink: Send {
    fn play(&mut self, audio: SpeechAudio) -> impl Future<Output = Result<(), WorkflowError>> + Send;

    /// Cut off whatever is playing.
    fn stop(&mut self);
}

/// What a recognizer heard during one listening turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Heard {
    Speech(String),
    /// Recognizer error code, e.g. `no-speech` or `network`.
    Error(String),
    Ended,
}

/// Speech-to-text for the founder's answers.
pub trait SpeechRecognizer: Send {
    fn is_available(&self) -> bool;

    fn listen(&mut self) -> impl Future<Output = Heard> + Send;

    fn stop(&mut self);
}

/// Recognizer for environments without speech input. The interview falls
/// back to typed answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRecognizer;

impl SpeechRecognizer for NoRecognizer {
    fn is_available(&self) -> bool {
        false
    }

    async fn listen(&mut self) -> Heard {
        Heard::Ended
    }

    fn stop(&mut self) {}
}

/// Sink that drops audio.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSink;

impl AudioSink for SilentSink {
    async fn play(&mut self, _audio: SpeechAudio) -> Result<(), WorkflowError> {
        Ok(())
    }

    fn stop(&mut self) {}
}

pub struct InterviewDriver<'a, G, S, A, V> {
    generator: &'a G,
    synthesizer: Option<&'a S>,
    sink: A,
    recognizer: V,
    chat: ChatSession,
    interview: Interview,
    answered_once: bool,
}

impl<'a, G, S, A, V> InterviewDriver<'a, G, S, A, V>
where
    G: TextGenerator,
    S: SpeechSynthesizer,
    A: AudioSink,
    V: SpeechRecognizer,
{
    /// Without a synthesizer AI turns are shown but not spoken.
    pub fn new(generator: &'a G, synthesizer: Option<&'a S>, sink: A, recognizer: V) -> Self {
        Self {
            generator,
            synthesizer,
            sink,
            recognizer,
            chat: ChatSession::new(INTERVIEWER_INSTRUCTION),
            interview: Interview::new(),
            answered_once: false,
        }
    }

    #[must_use]
    pub const fn interview(&self) -> &Interview {
        &self.interview
    }

    #[must_use]
    pub const fn sink(&self) -> &A {
        &self.sink
    }

    /// Open the session and run the interviewer's first turn.
    ///
    /// # Errors
    ///
    /// Returns an error only if the sink fails or the reducer rejects an event.
    pub async fn start(&mut self) -> Result<(), WorkflowError> {
        let voice_available = self.recognizer.is_available();
        self.dispatch(InterviewEvent::Started { voice_available }).await
    }

    /// A typed answer from the founder.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` while the interviewer is busy.
    pub async fn say(&mut self, text: &str) -> Result<(), WorkflowError> {
        self.dispatch(InterviewEvent::UserMessage(text.to_string())).await
    }

    /// The microphone button.
    ///
    /// # Errors
    ///
    /// See [`InterviewDriver::start`].
    pub async fn toggle_mic(&mut self) -> Result<(), WorkflowError> {
        self.dispatch(InterviewEvent::ToggleMic).await
    }

    /// The finished interview as a transcript source.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` until the interviewer has signed off.
    pub fn finish(&self) -> Result<DataSource, WorkflowError> {
        Ok(self
            .interview
            .to_source(ids::generate(PREFIX_SOURCE)?, Utc::now())?)
    }

    async fn dispatch(&mut self, event: InterviewEvent) -> Result<(), WorkflowError> {
        let mut queue: VecDeque<InterviewCommand> = self.interview.handle(event)?.into();
        while let Some(command) = queue.pop_front() {
            if let Some(event) = self.execute(command).await? {
                queue.extend(self.interview.handle(event)?);
            }
        }
        Ok(())
    }

    async fn execute(&mut self, command: InterviewCommand) -> Result<Option<InterviewEvent>, WorkflowError> {
        let event = match command {
            InterviewCommand::SendToChat(message) => {
                match self.chat.send(self.generator, &message).await {
                    Ok(reply) => {
                        self.answered_once = true;
                        Some(InterviewEvent::AiReplied(reply))
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "interviewer chat failed");
                        let notice = if self.answered_once { REPLY_FAILED } else { INIT_FAILED };
                        Some(InterviewEvent::ChatFailed(notice.to_string()))
                    }
                }
            }
            InterviewCommand::Synthesize(text) => Some(self.speak(&text).await?),
            InterviewCommand::StopSpeech => {
                self.sink.stop();
                None
            }
            InterviewCommand::StopListening => {
                self.recognizer.stop();
                None
            }
            InterviewCommand::StartListening => {
                if self.interview.is_finished() {
                    None
                } else {
                    Some(match self.recognizer.listen().await {
                        Heard::Speech(text) => InterviewEvent::UserMessage(text),
                        Heard::Error(kind) => InterviewEvent::RecognitionError(kind),
                        Heard::Ended => InterviewEvent::RecognitionEnded,
                    })
                }
            }
        };
        Ok(event)
    }

    async fn speak(&mut self, text: &str) -> Result<InterviewEvent, WorkflowError> {
        let Some(synthesizer) = self.synthesizer else {
            return Ok(InterviewEvent::PlaybackFinished);
        };
        match synthesizer.synthesize(text).await {
            Ok(audio) if !audio.is_empty() => {
                self.sink.play(audio).await?;
                Ok(InterviewEvent::PlaybackFinished)
            }
            Ok(_) => Ok(InterviewEvent::SpeechFailed),
            Err(e) => {
                tracing::warn!(error = %e, "speech synthesis failed");
                Ok(InterviewEvent::SpeechFailed)
            }
        }
    }
}

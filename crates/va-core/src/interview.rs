//! Founder voice interview loop.
//!
//! The interview is a reducer: events from the chat model, the speech
//! synthesizer, the recognizer, and the founder go in; commands for those
//! collaborators come out. The async driver that executes the commands lives
//! in `va-workflow`.

use chrono::{DateTime, SecondsFormat, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::DataSource;
use crate::enums::{InterviewStatus, SourceType, Speaker};
use crate::errors::CoreError;

pub const TRANSCRIPT_FILENAME: &str = "Founder Voice Interview Transcript";
pub const OPENING_MESSAGE: &str = "Please introduce yourself and start the interview.";
pub const INITIALIZING_NOTICE: &str = "Initializing AI Assistant...";
pub const VOICE_UNSUPPORTED: &str = "Voice input is not supported. Please use text input.";
pub const SPEECH_FAILED: &str = "Could not generate AI speech.";
pub const RECOGNITION_FAILED: &str = "Voice recognition error. Please try again or use text input.";

/// Lower-cased phrases that mark the interviewer's sign-off.
pub const FINISH_PHRASES: [&str; 2] = ["thank you for your time", "have a great day"];

/// Recognizer errors that are routine and not surfaced.
const SILENT_RECOGNITION_ERRORS: [&str; 2] = ["no-speech", "aborted"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TranscriptItem {
    pub speaker: Speaker,
    pub text: String,
}

/// Something that happened during the interview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterviewEvent {
    /// The session is up; `voice_available` says whether speech recognition exists.
    Started { voice_available: bool },
    /// The founder said or typed something.
    UserMessage(String),
    AiReplied(String),
    ChatFailed(String),
    SpeechFailed,
    PlaybackFinished,
    RecognitionError(String),
    RecognitionEnded,
    /// Microphone button: interrupt speech, stop listening, or start listening.
    ToggleMic,
}

/// Work the driver must perform in response to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterviewCommand {
    SendToChat(String),
    Synthesize(String),
    StopSpeech,
    StartListening,
    StopListening,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Interview {
    pub status: InterviewStatus,
    pub transcript: Vec<TranscriptItem>,
    /// False once speech recognition turned out to be unavailable.
    pub voice_mode: bool,
    pub error: Option<String>,
}

impl Default for Interview {
    fn default() -> Self {
        Self {
            status: InterviewStatus::Initializing,
            transcript: Vec::new(),
            voice_mode: true,
            error: None,
        }
    }
}

impl Interview {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an event and return the commands to execute, in order.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` when the founder speaks while
    /// the assistant is busy.
    pub fn handle(&mut self, event: InterviewEvent) -> Result<Vec<InterviewCommand>, CoreError> {
        let commands = match event {
            InterviewEvent::Started { voice_available } => {
                self.push(Speaker::System, INITIALIZING_NOTICE);
                if !voice_available {
                    self.voice_mode = false;
                    self.error = Some(VOICE_UNSUPPORTED.to_string());
                }
                self.status = InterviewStatus::Processing;
                vec![InterviewCommand::SendToChat(OPENING_MESSAGE.to_string())]
            }
            InterviewEvent::UserMessage(text) => {
                if !matches!(self.status, InterviewStatus::Idle | InterviewStatus::Listening) {
                    return Err(CoreError::InvalidTransition {
                        entity_type: "interview".into(),
                        id: "founder_voice".into(),
                        from: self.status.to_string(),
                        to: InterviewStatus::Processing.to_string(),
                    });
                }
                let text = text.trim();
                if text.is_empty() {
                    self.listen()
                } else {
                    self.push(Speaker::User, text);
                    self.status = InterviewStatus::Processing;
                    vec![InterviewCommand::SendToChat(text.to_string())]
                }
            }
            InterviewEvent::AiReplied(text) => {
                self.push(Speaker::Ai, &text);
                self.status = InterviewStatus::Speaking;
                vec![InterviewCommand::Synthesize(text)]
            }
            InterviewEvent::ChatFailed(message) => {
                self.error = Some(message);
                self.status = InterviewStatus::Idle;
                Vec::new()
            }
            InterviewEvent::SpeechFailed => {
                self.error = Some(SPEECH_FAILED.to_string());
                self.listen()
            }
            InterviewEvent::PlaybackFinished => {
                if self.status == InterviewStatus::Speaking {
                    self.listen()
                } else {
                    Vec::new()
                }
            }
            InterviewEvent::RecognitionError(kind) => {
                if !SILENT_RECOGNITION_ERRORS.contains(&kind.as_str()) {
                    self.error = Some(RECOGNITION_FAILED.to_string());
                }
                self.status = InterviewStatus::Idle;
                Vec::new()
            }
            InterviewEvent::RecognitionEnded => {
                if self.status == InterviewStatus::Listening {
                    self.status = InterviewStatus::Idle;
                }
                Vec::new()
            }
            InterviewEvent::ToggleMic => self.toggle_mic(),
        };
        Ok(commands)
    }

    fn toggle_mic(&mut self) -> Vec<InterviewCommand> {
        if !self.voice_mode {
            return Vec::new();
        }
        match self.status {
            InterviewStatus::Speaking => {
                self.status = InterviewStatus::Listening;
                vec![InterviewCommand::StopSpeech, InterviewCommand::StartListening]
            }
            InterviewStatus::Listening => {
                self.status = InterviewStatus::Idle;
                vec![InterviewCommand::StopListening]
            }
            InterviewStatus::Idle => self.listen(),
            InterviewStatus::Initializing | InterviewStatus::Processing => Vec::new(),
        }
    }

    /// Hand the turn to the founder: listen in voice mode, otherwise wait
    /// for typed input.
    fn listen(&mut self) -> Vec<InterviewCommand> {
        if !self.voice_mode {
            self.status = InterviewStatus::Idle;
            return Vec::new();
        }
        if self.status == InterviewStatus::Listening {
            return Vec::new();
        }
        self.status = InterviewStatus::Listening;
        vec![InterviewCommand::StartListening]
    }

    fn push(&mut self, speaker: Speaker, text: &str) {
        self.transcript.push(TranscriptItem {
            speaker,
            text: text.to_string(),
        });
    }

    /// The interviewer has signed off.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.transcript.iter().any(|item| {
            item.speaker == Speaker::Ai && {
                let lower = item.text.to_lowercase();
                FINISH_PHRASES.iter().any(|p| lower.contains(p))
            }
        })
    }

    /// Finished and not mid-turn.
    #[must_use]
    pub fn can_complete(&self) -> bool {
        self.is_finished()
            && !matches!(
                self.status,
                InterviewStatus::Speaking | InterviewStatus::Processing
            )
    }

    /// Typed input is accepted only while the assistant waits.
    #[must_use]
    pub fn accepts_text(&self) -> bool {
        self.status == InterviewStatus::Idle
    }

    /// Markdown transcript with call metadata.
    #[must_use]
    pub fn render_transcript(&self, now: DateTime<Utc>) -> String {
        let lines: Vec<String> = self
            .transcript
            .iter()
            .map(|t| format!("{}: {}", t.speaker.as_str().to_uppercase(), t.text))
            .collect();
        format!(
            "# Founder Voice Interview Transcript\n\
**Call Metadata:**\n\
- **Date/Time:** {}\n\
- **Outcome:** Success\n\
---\n\
**Transcript:**\n\
{}",
            now.to_rfc3339_opts(SecondsFormat::Millis, true),
            lines.join("\n\n")
        )
    }

    /// Package the finished interview as a `transcript` source.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` until the interviewer has signed off
    /// and the current turn has ended.
    pub fn to_source(&self, id: String, now: DateTime<Utc>) -> Result<DataSource, CoreError> {
        if !self.can_complete() {
            return Err(CoreError::Validation(
                "the interview has not finished yet".into(),
            ));
        }
        Ok(DataSource::completed(
            id,
            SourceType::Transcript,
            self.render_transcript(now),
            Some(TRANSCRIPT_FILENAME.to_string()),
            now,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn started(voice: bool) -> Interview {
        let mut interview = Interview::new();
        let cmds = interview
            .handle(InterviewEvent::Started {
                voice_available: voice,
            })
            .unwrap();
        assert_eq!(cmds, vec![InterviewCommand::SendToChat(OPENING_MESSAGE.into())]);
        interview
    }

    #[test]
    fn start_processes_opening_turn() {
        let interview = started(true);
        assert_eq!(interview.status, InterviewStatus::Processing);
        assert_eq!(interview.transcript[0].speaker, Speaker::System);
        assert_eq!(interview.error, None);
    }

    #[test]
    fn missing_recognizer_falls_back_to_text() {
        let mut interview = started(false);
        assert!(!interview.voice_mode);
        assert_eq!(interview.error.as_deref(), Some(VOICE_UNSUPPORTED));

        interview.handle(InterviewEvent::AiReplied("Hello".into())).unwrap();
        let cmds = interview.handle(InterviewEvent::PlaybackFinished).unwrap();
        assert!(cmds.is_empty());
        assert_eq!(interview.status, InterviewStatus::Idle);
        assert!(interview.accepts_text());
    }

    #[test]
    fn ai_reply_is_spoken_then_listened_for() {
        let mut interview = started(true);
        let cmds = interview.handle(InterviewEvent::AiReplied("Hi there".into())).unwrap();
        assert_eq!(cmds, vec![InterviewCommand::Synthesize("Hi there".into())]);
        assert_eq!(interview.status, InterviewStatus::Speaking);

        let cmds = interview.handle(InterviewEvent::PlaybackFinished).unwrap();
        assert_eq!(cmds, vec![InterviewCommand::StartListening]);
        assert_eq!(interview.status, InterviewStatus::Listening);
    }

    #[test]
    fn user_message_goes_to_chat() {
        let mut interview = started(false);
        interview.handle(InterviewEvent::AiReplied("Ready?".into())).unwrap();
        interview.handle(InterviewEvent::PlaybackFinished).unwrap();
        let cmds = interview.handle(InterviewEvent::UserMessage(" Yes ".into())).unwrap();
        assert_eq!(cmds, vec![InterviewCommand::SendToChat("Yes".into())]);
        assert_eq!(interview.status, InterviewStatus::Processing);
        assert_eq!(interview.transcript.last().unwrap().text, "Yes");
    }

    #[test]
    fn blank_message_returns_to_listening() {
        let mut interview = started(true);
        interview.handle(InterviewEvent::AiReplied("Ready?".into())).unwrap();
        interview.handle(InterviewEvent::ToggleMic).unwrap();
        interview.handle(InterviewEvent::ToggleMic).unwrap();
        assert_eq!(interview.status, InterviewStatus::Idle);
        let cmds = interview.handle(InterviewEvent::UserMessage("   ".into())).unwrap();
        assert_eq!(cmds, vec![InterviewCommand::StartListening]);
    }

    #[test]
    fn speaking_while_busy_is_rejected() {
        let mut interview = started(true);
        assert!(interview.handle(InterviewEvent::UserMessage("hi".into())).is_err());
    }

    #[test]
    fn interrupt_stops_speech_and_listens() {
        let mut interview = started(true);
        interview.handle(InterviewEvent::AiReplied("A long answer".into())).unwrap();
        let cmds = interview.handle(InterviewEvent::ToggleMic).unwrap();
        assert_eq!(
            cmds,
            vec![InterviewCommand::StopSpeech, InterviewCommand::StartListening]
        );
        assert_eq!(interview.status, InterviewStatus::Listening);

        let cmds = interview.handle(InterviewEvent::ToggleMic).unwrap();
        assert_eq!(cmds, vec![InterviewCommand::StopListening]);
        assert_eq!(interview.status, InterviewStatus::Idle);
    }

    #[test]
    fn routine_recognition_errors_are_silent() {
        let mut interview = started(true);
        interview.handle(InterviewEvent::RecognitionError("no-speech".into())).unwrap();
        assert_eq!(interview.error, None);
        interview.handle(InterviewEvent::RecognitionError("network".into())).unwrap();
        assert_eq!(interview.error.as_deref(), Some(RECOGNITION_FAILED));
        assert_eq!(interview.status, InterviewStatus::Idle);
    }

    #[test]
    fn recognition_end_only_idles_from_listening() {
        let mut interview = started(true);
        interview.handle(InterviewEvent::RecognitionEnded).unwrap();
        assert_eq!(interview.status, InterviewStatus::Processing);
    }

    #[test]
    fn speech_failure_still_hands_over_turn() {
        let mut interview = started(true);
        interview.handle(InterviewEvent::AiReplied("Hi".into())).unwrap();
        let cmds = interview.handle(InterviewEvent::SpeechFailed).unwrap();
        assert_eq!(cmds, vec![InterviewCommand::StartListening]);
        assert_eq!(interview.error.as_deref(), Some(SPEECH_FAILED));
    }

    #[test]
    fn chat_failure_idles_with_error() {
        let mut interview = started(true);
        interview
            .handle(InterviewEvent::ChatFailed("Failed to initialize the AI agent.".into()))
            .unwrap();
        assert_eq!(interview.status, InterviewStatus::Idle);
        assert!(interview.error.is_some());
    }

    #[test]
    fn sign_off_finishes_interview() {
        let mut interview = started(false);
        assert!(!interview.is_finished());
        interview
            .handle(InterviewEvent::AiReplied("Thank you for your time. Goodbye!".into()))
            .unwrap();
        assert!(interview.is_finished());
        assert!(!interview.can_complete());
        interview.handle(InterviewEvent::PlaybackFinished).unwrap();
        assert!(interview.can_complete());
    }

    #[test]
    fn user_saying_phrase_does_not_finish() {
        let mut interview = started(false);
        interview.handle(InterviewEvent::AiReplied("Question 1?".into())).unwrap();
        interview.handle(InterviewEvent::PlaybackFinished).unwrap();
        interview
            .handle(InterviewEvent::UserMessage("have a great day".into()))
            .unwrap();
        assert!(!interview.is_finished());
    }

    #[test]
    fn transcript_source_renders_turns() {
        let mut interview = started(false);
        interview.handle(InterviewEvent::AiReplied("Hello".into())).unwrap();
        interview.handle(InterviewEvent::PlaybackFinished).unwrap();
        interview.handle(InterviewEvent::UserMessage("Hi".into())).unwrap();
        assert!(interview.to_source("src-t".into(), Utc::now()).is_err());
        interview
            .handle(InterviewEvent::AiReplied("Have a great day!".into()))
            .unwrap();
        interview.handle(InterviewEvent::PlaybackFinished).unwrap();

        let source = interview.to_source("src-t".into(), Utc::now()).unwrap();
        assert_eq!(source.source_type, SourceType::Transcript);
        assert_eq!(source.filename.as_deref(), Some(TRANSCRIPT_FILENAME));
        assert!(source.content.starts_with("# Founder Voice Interview Transcript\n**Call Metadata:**"));
        assert!(source.content.contains("- **Outcome:** Success"));
        assert!(source.content.contains("AI: Hello\n\nUSER: Hi\n\nAI: Have a great day!"));
    }
}

use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use va_workflow::ingestion::{IngestionOutcome, JobState};

use crate::ui;

const TICK: Duration = Duration::from_millis(100);

/// Spinner on stderr for model calls and ingestion jobs. Does nothing when
/// progress is off, so JSON on stdout stays clean either way.
pub struct Progress {
    bar: Option<ProgressBar>,
}

impl Progress {
    #[must_use]
    pub fn spinner(message: &str) -> Self {
        if !ui::prefs().progress {
            return Self { bar: None };
        }

        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        bar.enable_steady_tick(TICK);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg} {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        Self { bar: Some(bar) }
    }

    /// Mirror an ingestion job's state for the source called `label`.
    pub fn show_job(&self, label: &str, state: &JobState) {
        self.set_message(&job_message(label, state));
    }

    /// Close the spinner with the outcome of the source called `label`.
    pub fn finish_job(&self, label: &str, outcome: &IngestionOutcome) {
        match outcome {
            IngestionOutcome::Completed { .. } => self.finish_ok(&format!("{label}: completed")),
            IngestionOutcome::Failed { reason } => self.finish_err(&format!("{label}: failed ({reason})")),
            IngestionOutcome::Skipped => self.finish_clear(),
        }
    }

    pub fn set_message(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
        }
    }

    pub fn finish_ok(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message(message.to_string());
        }
    }

    pub fn finish_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    pub fn finish_err(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.abandon_with_message(message.to_string());
        }
    }
}

fn job_message(label: &str, state: &JobState) -> String {
    match state {
        JobState::Queued => format!("{label}: queued"),
        JobState::Processing { attempt: 1 } => format!("{label}: processing"),
        JobState::Processing { attempt } => format!("{label}: processing (attempt {attempt})"),
        JobState::Finished(_) => format!("{label}: finishing"),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use va_workflow::ingestion::{IngestionOutcome, JobState};

    use super::job_message;

    #[test]
    fn job_messages_follow_the_source_lifecycle() {
        assert_eq!(job_message("deck.pdf", &JobState::Queued), "deck.pdf: queued");
        assert_eq!(
            job_message("deck.pdf", &JobState::Processing { attempt: 1 }),
            "deck.pdf: processing"
        );
        assert_eq!(
            job_message("deck.pdf", &JobState::Processing { attempt: 3 }),
            "deck.pdf: processing (attempt 3)"
        );
        assert_eq!(
            job_message("deck.pdf", &JobState::Finished(IngestionOutcome::Skipped)),
            "deck.pdf: finishing"
        );
    }
}

//! Shared fixtures for workflow integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use va_config::AnalyticaConfig;
use va_core::entities::Report;
use va_genai::{GenAiError, Generation, GroundingSource, Prompt, TextGenerator};
use va_store::{MemoryStore, ReportService};
use va_workflow::Workflow;
use va_workflow::reports::NewReport;

pub const DEFAULT_REPLY: &str = "## Summary\nA generated memo.";

/// Scripted collaborator. Replies are consumed in order; once the script
/// runs out every call answers with [`DEFAULT_REPLY`].
#[derive(Default)]
pub struct FakeGenerator {
    replies: Mutex<VecDeque<Result<Generation, GenAiError>>>,
    prompts: Mutex<Vec<Prompt>>,
}

impl FakeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(Generation::text(text)));
        self
    }

    pub fn reply_with_sources(self, text: &str, sources: &[(&str, &str)]) -> Self {
        let generation = Generation {
            text: text.to_string(),
            sources: sources
                .iter()
                .map(|(title, uri)| GroundingSource {
                    title: (*title).to_string(),
                    uri: (*uri).to_string(),
                })
                .collect(),
        };
        self.replies.lock().unwrap().push_back(Ok(generation));
        self
    }

    pub fn fail(self, status: u16) -> Self {
        self.replies.lock().unwrap().push_back(Err(GenAiError::Api {
            status,
            message: "model unavailable".into(),
        }));
        self
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<Prompt> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn last_prompt(&self) -> Prompt {
        self.prompts.lock().unwrap().last().cloned().unwrap()
    }
}

impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: Prompt) -> Result<Generation, GenAiError> {
        self.prompts.lock().unwrap().push(prompt);
        let next = self.replies.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(Generation::text(DEFAULT_REPLY)))
    }
}

pub type TestWorkflow = Workflow<MemoryStore, FakeGenerator>;

pub fn workflow(generator: FakeGenerator) -> TestWorkflow {
    Workflow::new(ReportService::in_memory(), generator, AnalyticaConfig::default())
}

pub fn new_report(description: &str) -> NewReport {
    NewReport {
        company_name: "Acme Robotics".into(),
        description: description.into(),
        founder_name: "Ada Lovelace".into(),
        founder_email: "ada@acme.io".into(),
        founder_phone: "+1 5551234".into(),
    }
}

/// Report whose description is already a completed, selected source.
pub async fn ready_report(wf: &TestWorkflow) -> Report {
    wf.create_report(new_report("Warehouse robots that pick mixed SKUs."))
        .await
        .unwrap()
}

/// Report with no sources at all.
pub async fn empty_report(wf: &TestWorkflow) -> Report {
    wf.create_report(new_report("")).await.unwrap()
}

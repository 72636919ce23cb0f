//! Founder agents: the voice call and the behaviour test.
//!
//! Triggering sends the founder an invitation (stand-in: a notice) and marks
//! the agent pending. Completion arrives later, either from a webhook-style
//! call to [`Workflow::complete_agent`] or from [`Workflow::simulate_agent`].

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::task::JoinHandle;
use va_core::entities::{AgentRun, DataSource, Report};
use va_core::enums::{AgentStatus, EntityType, SourceType, TrailOp};
use va_core::errors::CoreError;
use va_core::ids::{self, PREFIX_SOURCE};
use va_core::responses::AgentTriggerResponse;
use va_genai::TextGenerator;
use va_store::ReportRepository;

use crate::{Workflow, WorkflowError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    FounderVoice,
    BehaviourTest,
}

impl AgentKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FounderVoice => "founder_voice",
            Self::BehaviourTest => "behaviour_test",
        }
    }

    /// What the founder is asked to complete.
    #[must_use]
    pub const fn task(self) -> &'static str {
        match self {
            Self::FounderVoice => "Founder Voice interview",
            Self::BehaviourTest => "Founder Behaviour Test",
        }
    }

    /// Source type the agent's result is stored as.
    #[must_use]
    pub const fn result_type(self) -> SourceType {
        match self {
            Self::FounderVoice => SourceType::Transcript,
            Self::BehaviourTest => SourceType::Assessment,
        }
    }

    const fn result_label(self) -> &'static str {
        match self {
            Self::FounderVoice => "Founder Voice Call Transcript",
            Self::BehaviourTest => "Founder Psychometric Assessment Results",
        }
    }

    const fn run(self, report: &Report) -> &AgentRun {
        match self {
            Self::FounderVoice => &report.founder_voice,
            Self::BehaviourTest => &report.founder_behaviour_test,
        }
    }

    const fn run_mut(self, report: &mut Report) -> &mut AgentRun {
        match self {
            Self::FounderVoice => &mut report.founder_voice,
            Self::BehaviourTest => &mut report.founder_behaviour_test,
        }
    }

    /// Why the agent cannot be triggered on `report`, if anything.
    #[must_use]
    pub fn blocked_reason(self, report: &Report) -> Option<String> {
        if !report.founder.has_email() {
            return Some("the report has no founder e-mail".into());
        }
        let status = self.run(report).status;
        if status != AgentStatus::Idle {
            return Some(format!("{} is already {status}", self.as_str()));
        }
        if report.has_source_type(self.result_type()) {
            return Some(format!("the report already has a {} source", self.result_type()));
        }
        None
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<R, G> Workflow<R, G>
where
    R: ReportRepository,
    G: TextGenerator + 'static,
{
    /// Invite the founder and mark the agent pending.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` without a founder e-mail, while the
    /// agent is not idle, or when its result source already exists.
    pub async fn trigger_agent(
        &self,
        report_id: &str,
        agent: AgentKind,
    ) -> Result<AgentTriggerResponse, WorkflowError> {
        let (report, ()) = self
            .store
            .update(report_id, |report, changes| {
                if let Some(reason) = agent.blocked_reason(report) {
                    return Err(CoreError::Validation(format!("cannot trigger {agent}: {reason}")));
                }
                let run = agent.run_mut(report);
                run.status = AgentStatus::Pending;
                run.last_triggered = Some(changes.now());
                changes.record(TrailOp::Transition, EntityType::Agent, agent.as_str(), &*run);
                Ok(())
            })
            .await?;

        let notice = format!(
            "Email sent to {} prompting them to complete the {}.",
            report.founder.email,
            agent.task()
        );
        tracing::info!(report_id, agent = %agent, "founder agent triggered");
        Ok(AgentTriggerResponse {
            report_id: report.id.clone(),
            agent: agent.as_str().to_string(),
            status: agent.run(&report).status,
            notice,
        })
    }

    /// Record the founder's completion and attach the result source.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` unless the agent is pending.
    pub async fn complete_agent(&self, report_id: &str, agent: AgentKind) -> Result<Report, WorkflowError> {
        let source_id = ids::generate(PREFIX_SOURCE)?;
        let (report, ()) = self
            .store
            .update(report_id, |report, changes| {
                let run = agent.run_mut(report);
                if run.status != AgentStatus::Pending {
                    return Err(CoreError::InvalidTransition {
                        entity_type: "agent".into(),
                        id: agent.as_str().into(),
                        from: run.status.to_string(),
                        to: AgentStatus::Completed.to_string(),
                    });
                }
                run.status = AgentStatus::Completed;
                changes.record(
                    TrailOp::Transition,
                    EntityType::Agent,
                    agent.as_str(),
                    json!({ "status": AgentStatus::Completed }),
                );

                let label = agent.result_label();
                let source = DataSource::completed(
                    source_id,
                    agent.result_type(),
                    format!("{label} (Completed)"),
                    Some(label.to_string()),
                    changes.now(),
                );
                changes.record(TrailOp::Create, EntityType::DataSource, &source.id, &source);
                report.add_source(source);
                Ok(())
            })
            .await?;
        tracing::info!(report_id, agent = %agent, "founder agent completed");
        Ok(report)
    }

    /// Complete the agent after its configured delay, as if the founder
    /// finished the task.
    #[must_use]
    pub fn simulate_agent(
        &self,
        report_id: &str,
        agent: AgentKind,
    ) -> JoinHandle<Result<Report, WorkflowError>> {
        let delay = match agent {
            AgentKind::FounderVoice => self.config.agents.voice_delay(),
            AgentKind::BehaviourTest => self.config.agents.behaviour_delay(),
        };
        let workflow = self.clone();
        let report_id = report_id.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            workflow.complete_agent(&report_id, agent).await
        })
    }

    /// Agents that can be triggered right now on a report.
    ///
    /// # Errors
    ///
    /// Returns a not-found store error for an unknown report.
    pub async fn available_agents(&self, report_id: &str) -> Result<Vec<AgentKind>, WorkflowError> {
        let report = self.store.get(report_id).await?;
        Ok([AgentKind::FounderVoice, AgentKind::BehaviourTest]
            .into_iter()
            .filter(|a| a.blocked_reason(&report).is_none())
            .collect())
    }
}

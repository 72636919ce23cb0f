use clap::Subcommand;

/// Founder agent commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AgentCommands {
    /// Invite the founder (founder-voice or behaviour-test).
    Trigger {
        report: String,
        agent: String,
        /// Wait for a simulated completion.
        #[arg(long)]
        simulate: bool,
    },
    /// Record that the founder finished.
    Complete { report: String, agent: String },
    /// Agents that can still be triggered.
    List { report: String },
}

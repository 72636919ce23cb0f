use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::subcommands::{
    AgentCommands, MemoCommands, ReportCommands, ResearchCommands, SourceCommands, StageCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Initialize analytica for a project.
    Init(InitArgs),
    /// Reports and founder submissions.
    Report {
        #[command(subcommand)]
        action: ReportCommands,
    },
    /// Data sources on a report.
    Source {
        #[command(subcommand)]
        action: SourceCommands,
    },
    /// Memo stage navigation.
    Stage {
        #[command(subcommand)]
        action: StageCommands,
    },
    /// Investment and curated memos.
    Memo {
        #[command(subcommand)]
        action: MemoCommands,
    },
    /// Founder agents (voice call, behaviour test).
    Agent {
        #[command(subcommand)]
        action: AgentCommands,
    },
    /// Web-grounded deep research.
    Research {
        #[command(subcommand)]
        action: ResearchCommands,
    },
    /// Export the memo as Markdown or a slide-deck outline.
    Export(ExportArgs),
    /// Submit a founder registration.
    Register(RegisterArgs),
    /// Run the founder voice interview in the terminal.
    Interview(InterviewArgs),
    /// Print the JSON schema of a response type.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config.toml.
    #[arg(long)]
    pub force: bool,
}

#[derive(Clone, Debug, Args)]
pub struct ExportArgs {
    /// Report ID.
    pub report: String,
    /// Write a slide-deck outline instead of Markdown.
    #[arg(long)]
    pub deck: bool,
    /// Output directory (defaults to general.export_dir under the project root).
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub company: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value = "")]
    pub founder_name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long, default_value = "+1")]
    pub country_code: String,
    /// Pitch deck or other document to attach. Repeatable.
    #[arg(long)]
    pub file: Vec<PathBuf>,
    /// Interview transcript written by `vana interview --out`. Omit to skip the call.
    #[arg(long)]
    pub transcript: Option<PathBuf>,
    /// Behavioural test answers: 20 comma-separated options, each 1-4.
    #[arg(long)]
    pub answers: String,
}

#[derive(Clone, Debug, Args)]
pub struct InterviewArgs {
    /// Write each spoken interviewer turn as a WAV file into this directory.
    #[arg(long)]
    pub voice_out: Option<PathBuf>,
    /// Write the finished transcript here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Type name, e.g. report, data-source, deck-outline.
    pub type_name: String,
}

use clap::Subcommand;

/// Stage navigation commands.
#[derive(Clone, Debug, Subcommand)]
pub enum StageCommands {
    /// Show the current stage and whether the report can move on.
    Show { report: String },
    /// Jump to a stage (name or 0-2) and run its generation.
    Goto { report: String, stage: String },
    /// Move one stage forward.
    Next { report: String },
    /// Move back one stage, or to `--to`.
    Back {
        report: String,
        #[arg(long)]
        to: Option<String>,
    },
}

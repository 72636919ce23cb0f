use std::path::PathBuf;

use clap::Subcommand;

/// Memo commands.
#[derive(Clone, Debug, Subcommand)]
pub enum MemoCommands {
    /// Generate (or retry) a memo.
    Generate {
        report: String,
        /// Target the curated memo.
        #[arg(long)]
        curated: bool,
    },
    /// Show a memo.
    Show {
        report: String,
        #[arg(long)]
        curated: bool,
    },
    /// Update investment memo preferences. Resets the memo.
    Prefs {
        report: String,
        #[arg(long)]
        tone: Option<String>,
        #[arg(long)]
        length: Option<String>,
        #[arg(long)]
        instructions: Option<String>,
        /// Section weight as `name=percent`. Repeatable.
        #[arg(long)]
        weight: Vec<String>,
        #[arg(long)]
        enable: Vec<String>,
        #[arg(long)]
        disable: Vec<String>,
    },
    /// Update curated memo preferences. Resets the curated memo.
    CuratePrefs {
        report: String,
        #[arg(long)]
        audience: Option<String>,
        #[arg(long)]
        format: Option<String>,
        #[arg(long)]
        instructions: Option<String>,
    },
    /// Replace the curated memo with the contents of a file.
    Edit {
        report: String,
        #[arg(long)]
        file: PathBuf,
    },
}

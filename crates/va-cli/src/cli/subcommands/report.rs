use clap::Subcommand;

/// Report commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ReportCommands {
    /// Create an analyst report.
    Create {
        #[arg(long)]
        company: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        founder_name: String,
        #[arg(long, default_value = "")]
        founder_email: String,
        #[arg(long, default_value = "")]
        founder_phone: String,
    },
    /// List analyst reports, newest first.
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// List founder submissions.
    Submissions {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Get a report by ID.
    Get { id: String },
    /// Delete a report.
    Delete { id: String },
    /// Start an analyst report from a founder submission.
    Import { submission: String },
    /// Show the mutation trail of a report.
    History { id: String },
}

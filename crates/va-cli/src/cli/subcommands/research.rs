use clap::Subcommand;

/// Deep research commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ResearchCommands {
    /// Run a web-grounded query.
    Run {
        query: String,
        #[arg(long)]
        report: Option<String>,
        /// Attach the result to the report as a research source.
        #[arg(long, requires = "report")]
        attach: bool,
    },
    /// Suggested queries for a report's company.
    Suggest { report: String },
}

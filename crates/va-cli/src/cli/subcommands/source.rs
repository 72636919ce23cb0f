use std::path::PathBuf;

use clap::{ArgGroup, Subcommand};

/// Data source commands.
#[derive(Clone, Debug, Subcommand)]
pub enum SourceCommands {
    /// Add a source and ingest it.
    #[command(group(
        ArgGroup::new("input")
            .required(true)
            .args(["url", "youtube", "text", "file"])
    ))]
    Add {
        report: String,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        youtube: Option<String>,
        #[arg(long)]
        text: Option<String>,
        /// Document or image on disk.
        #[arg(long)]
        file: Option<PathBuf>,
        /// Leave the source pending.
        #[arg(long)]
        no_ingest: bool,
    },
    /// Ingest every unfinished source of a report.
    Ingest { report: String },
    /// List the sources of a report.
    List { report: String },
    /// Flip a source's selection.
    Toggle { report: String, source: String },
    /// Select every source (or none).
    SelectAll {
        report: String,
        #[arg(long)]
        none: bool,
    },
    /// Rename a source.
    Rename {
        report: String,
        source: String,
        name: String,
    },
    /// Delete a source.
    Delete { report: String, source: String },
}

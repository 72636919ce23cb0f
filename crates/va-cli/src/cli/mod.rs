use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{ColorMode, GlobalFlags, OutputFormat, ProgressMode};
pub use root_commands::Commands;

/// Top-level CLI parser for the `vana` binary.
#[derive(Debug, Parser)]
#[command(
    name = "vana",
    version,
    about = "Analytica - investment memo workflow for venture analysts"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root path (defaults to auto-detect via .analytica)
    #[arg(short, long, global = true)]
    pub project: Option<String>,

    /// Colorize table output: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorMode,

    /// Draw spinners for long operations: auto, on, off
    #[arg(long, global = true, default_value = "auto")]
    pub progress: ProgressMode,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
            project: self.project.clone(),
            color: self.color,
            progress: self.progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::{CommandFactory, Parser};

    use super::subcommands::{MemoCommands, SourceCommands};
    use super::{Cli, Commands, GlobalFlags, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "vana",
            "--format",
            "table",
            "--limit",
            "10",
            "--verbose",
            "report",
            "list",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.limit, Some(10));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Report { .. }));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["vana", "report", "list", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["vana", "--format", "xml", "report", "list"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn source_add_takes_exactly_one_input() {
        let cli = Cli::try_parse_from([
            "vana", "source", "add", "rep-1", "--file", "deck.pdf", "--no-ingest",
        ])
        .expect("cli should parse");
        match cli.command {
            Commands::Source {
                action: SourceCommands::Add { file, no_ingest, .. },
            } => {
                assert_eq!(file, Some(PathBuf::from("deck.pdf")));
                assert!(no_ingest);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let both = Cli::try_parse_from([
            "vana", "source", "add", "rep-1", "--url", "https://acme.io", "--text", "notes",
        ]);
        assert!(both.is_err());
        assert!(Cli::try_parse_from(["vana", "source", "add", "rep-1"]).is_err());
    }

    #[test]
    fn memo_prefs_collects_repeated_weights() {
        let cli = Cli::try_parse_from([
            "vana",
            "memo",
            "prefs",
            "rep-1",
            "--weight",
            "Team=20",
            "--weight",
            "Market=15",
            "--disable",
            "Risks",
        ])
        .expect("cli should parse");
        match cli.command {
            Commands::Memo {
                action: MemoCommands::Prefs { weight, disable, .. },
            } => {
                assert_eq!(weight, vec!["Team=20".to_string(), "Market=15".to_string()]);
                assert_eq!(disable, vec!["Risks".to_string()]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn research_attach_requires_a_report() {
        assert!(Cli::try_parse_from(["vana", "research", "run", "tam", "--attach"]).is_err());
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["vana", "--project", "/tmp/demo", "report", "list"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.project.as_deref(), Some("/tmp/demo"));
    }
}

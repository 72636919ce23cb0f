use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use va_config::PROJECT_DIR;

mod audio;
mod bootstrap;
mod cli;
mod collaborator;
mod commands;
mod context;
mod output;
mod progress;
mod ui;
mod write_lock;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("vana error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    ui::init(&flags);

    match &cli.command {
        cli::Commands::Init(args) => return commands::init::handle(args, &flags),
        cli::Commands::Schema(args) => return commands::schema::handle(args, &flags),
        _ => {}
    }

    let project_root = resolve_project_root(flags.project.as_deref())?;
    let config = bootstrap::load_config(&project_root)?;
    context::warn_unconfigured(&config);

    let command = cli.command;
    let write_lock = if command_requires_write_lock(&command) {
        Some(write_lock::acquire_for_project(&project_root, &lock_holder(&command)).await?)
    } else {
        None
    };

    let ctx = context::AppContext::init(project_root, config)
        .context("failed to initialize analytica application context")?;

    let result = commands::dispatch::dispatch(command, &ctx, &flags).await;
    drop(write_lock);
    result
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("ANALYTICA_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn resolve_project_root(project_override: Option<&str>) -> anyhow::Result<PathBuf> {
    if let Some(path) = project_override {
        let explicit = PathBuf::from(path);

        if explicit
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name == PROJECT_DIR)
        {
            return explicit
                .parent()
                .map(std::path::Path::to_path_buf)
                .context("invalid --project path: '.analytica' directory has no parent");
        }

        if explicit.is_dir() {
            return Ok(explicit);
        }

        anyhow::bail!(
            "invalid --project '{}': directory does not exist",
            explicit.display()
        );
    }

    let start = std::env::current_dir().context("failed to read current directory")?;
    context::find_project_root(&start)
        .context("not an analytica project (no .analytica directory found). Run 'vana init' first.")
}

fn command_requires_write_lock(command: &cli::Commands) -> bool {
    use crate::cli::subcommands::{
        AgentCommands, MemoCommands, ReportCommands, ResearchCommands, SourceCommands,
        StageCommands,
    };

    match command {
        cli::Commands::Report { action } => !matches!(
            action,
            ReportCommands::List { .. }
                | ReportCommands::Submissions { .. }
                | ReportCommands::Get { .. }
                | ReportCommands::History { .. }
        ),
        cli::Commands::Source { action } => !matches!(action, SourceCommands::List { .. }),
        cli::Commands::Stage { action } => !matches!(action, StageCommands::Show { .. }),
        cli::Commands::Memo { action } => !matches!(action, MemoCommands::Show { .. }),
        cli::Commands::Agent { action } => !matches!(action, AgentCommands::List { .. }),
        cli::Commands::Research { action } => match action {
            ResearchCommands::Run { attach, .. } => *attach,
            ResearchCommands::Suggest { .. } => false,
        },
        cli::Commands::Export(_) | cli::Commands::Interview(_) => false,
        cli::Commands::Register(_) => true,
        cli::Commands::Init(_) | cli::Commands::Schema(_) => false,
    }
}

/// Who holds the write lock, as shown to a blocked command.
fn lock_holder(command: &cli::Commands) -> String {
    let group = match command {
        cli::Commands::Init(_) => "init",
        cli::Commands::Report { .. } => "report",
        cli::Commands::Source { .. } => "source",
        cli::Commands::Stage { .. } => "stage",
        cli::Commands::Memo { .. } => "memo",
        cli::Commands::Agent { .. } => "agent",
        cli::Commands::Research { .. } => "research",
        cli::Commands::Export(_) => "export",
        cli::Commands::Register(_) => "register",
        cli::Commands::Interview(_) => "interview",
        cli::Commands::Schema(_) => "schema",
    };
    match target_report(command) {
        Some(report) => format!("`vana {group}` on {report}"),
        None => format!("`vana {group}`"),
    }
}

fn target_report(command: &cli::Commands) -> Option<&str> {
    use crate::cli::subcommands::{
        AgentCommands, MemoCommands, ReportCommands, ResearchCommands, SourceCommands,
        StageCommands,
    };

    match command {
        cli::Commands::Report {
            action: ReportCommands::Get { id } | ReportCommands::Delete { id } | ReportCommands::History { id },
        } => Some(id),
        cli::Commands::Source {
            action:
                SourceCommands::Add { report, .. }
                | SourceCommands::Ingest { report }
                | SourceCommands::List { report }
                | SourceCommands::Toggle { report, .. }
                | SourceCommands::SelectAll { report, .. }
                | SourceCommands::Rename { report, .. }
                | SourceCommands::Delete { report, .. },
        } => Some(report),
        cli::Commands::Stage {
            action:
                StageCommands::Show { report }
                | StageCommands::Goto { report, .. }
                | StageCommands::Next { report }
                | StageCommands::Back { report, .. },
        } => Some(report),
        cli::Commands::Memo {
            action:
                MemoCommands::Generate { report, .. }
                | MemoCommands::Show { report, .. }
                | MemoCommands::Prefs { report, .. }
                | MemoCommands::CuratePrefs { report, .. }
                | MemoCommands::Edit { report, .. },
        } => Some(report),
        cli::Commands::Agent {
            action:
                AgentCommands::Trigger { report, .. }
                | AgentCommands::Complete { report, .. }
                | AgentCommands::List { report },
        } => Some(report),
        cli::Commands::Research {
            action: ResearchCommands::Run { report, .. },
        } => report.as_deref(),
        cli::Commands::Research {
            action: ResearchCommands::Suggest { report },
        } => Some(report),
        cli::Commands::Export(args) => Some(&args.report),
        _ => None,
    }
}

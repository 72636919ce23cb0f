use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Report { action } => commands::report::handle(&action, ctx, flags).await,
        Commands::Source { action } => commands::source::handle(&action, ctx, flags).await,
        Commands::Stage { action } => commands::stage::handle(&action, ctx, flags).await,
        Commands::Memo { action } => commands::memo::handle(&action, ctx, flags).await,
        Commands::Agent { action } => commands::agent::handle(&action, ctx, flags).await,
        Commands::Research { action } => commands::research::handle(&action, ctx, flags).await,
        Commands::Export(args) => commands::export::handle(&args, ctx, flags).await,
        Commands::Register(args) => commands::register::handle(&args, ctx, flags).await,
        Commands::Interview(args) => commands::interview::handle(&args, ctx, flags).await,
        Commands::Init(_) | Commands::Schema(_) => {
            anyhow::bail!("init and schema run before the project is opened")
        }
    }
}

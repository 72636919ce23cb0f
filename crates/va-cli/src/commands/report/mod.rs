mod create;
mod get;
mod import;
mod list;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ReportCommands;
use crate::context::AppContext;

/// Handle `vana report`.
pub async fn handle(action: &ReportCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        ReportCommands::Create {
            company,
            description,
            founder_name,
            founder_email,
            founder_phone,
        } => {
            create::run(
                company,
                description,
                founder_name,
                founder_email,
                founder_phone,
                ctx,
                flags,
            )
            .await
        }
        ReportCommands::List { search, limit } => {
            list::run(list::Listing::Reports, search.as_deref(), *limit, ctx, flags).await
        }
        ReportCommands::Submissions { search, limit } => {
            list::run(list::Listing::Submissions, search.as_deref(), *limit, ctx, flags).await
        }
        ReportCommands::Get { id } => get::run(id, ctx, flags).await,
        ReportCommands::Delete { id } => get::delete(id, ctx, flags).await,
        ReportCommands::History { id } => get::history(id, ctx, flags),
        ReportCommands::Import { submission } => import::run(submission, ctx, flags).await,
    }
}

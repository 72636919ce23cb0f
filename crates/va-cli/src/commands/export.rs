use crate::cli::GlobalFlags;
use crate::cli::root_commands::ExportArgs;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

/// Handle `vana export`.
pub async fn handle(args: &ExportArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let dir = args.dir.clone().unwrap_or_else(|| ctx.export_dir());

    let response = if args.deck {
        let progress = Progress::spinner("building slide outline");
        let response = ctx.workflow.export_deck(&args.report, &dir).await;
        progress.finish_clear();
        response?
    } else {
        ctx.workflow.export_markdown(&args.report, &dir).await?
    };

    if !flags.quiet {
        eprintln!("Wrote {} ({} bytes)", response.path, response.bytes);
    }
    output(&response, flags.format)
}

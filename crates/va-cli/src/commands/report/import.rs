use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// `vana report import <submission>`: copy a founder submission into a new
/// analyst report at stage 0.
pub async fn run(submission: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = ctx.workflow.create_from_submission(submission).await?;
    if !flags.quiet {
        eprintln!("Created {} from {submission}", report.id);
    }
    output(&report, flags.format)
}

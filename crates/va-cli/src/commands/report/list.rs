use va_core::entities::Report;
use va_core::responses::{ReportListResponse, ReportSummary};

use crate::cli::GlobalFlags;
use crate::commands::shared::limit::{effective_limit, truncate_to};
use crate::context::AppContext;
use crate::output::output;

#[derive(Clone, Copy, Debug)]
pub enum Listing {
    Reports,
    Submissions,
}

pub async fn run(
    listing: Listing,
    search: Option<&str>,
    limit: Option<u32>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let limit = effective_limit(limit, flags.limit, ctx.config().general.default_limit);
    let query = search.unwrap_or_default();
    let reports = match listing {
        Listing::Reports => ctx.workflow.list_reports(query).await?,
        Listing::Submissions => ctx.workflow.list_submissions(query).await?,
    };

    output(&summarize(&reports, limit), flags.format)
}

fn summarize(reports: &[Report], limit: u32) -> ReportListResponse {
    let mut summaries: Vec<ReportSummary> = reports.iter().map(ReportSummary::from).collect();
    let total = summaries.len();
    truncate_to(&mut summaries, limit);
    ReportListResponse {
        reports: summaries,
        total,
    }
}

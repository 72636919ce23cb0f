use va_workflow::reports::NewReport;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    company: &str,
    description: &str,
    founder_name: &str,
    founder_email: &str,
    founder_phone: &str,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let report = ctx
        .workflow
        .create_report(NewReport {
            company_name: company.to_string(),
            description: description.to_string(),
            founder_name: founder_name.to_string(),
            founder_email: founder_email.to_string(),
            founder_phone: founder_phone.to_string(),
        })
        .await?;

    output(&report, flags.format)
}

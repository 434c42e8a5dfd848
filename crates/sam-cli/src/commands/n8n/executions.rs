use anyhow::Context;
use sam_api::n8n::ExecutionFilter;
use sam_ops::service::ExecutionListing;

use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::verdict::Verdict;
use crate::context::AppContext;
use crate::output::output_with;
use crate::output::table::{Table, TableOptions};
use crate::progress::Progress;

pub async fn run(
    workflow: Option<&str>,
    status: Option<&str>,
    limit: Option<u32>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<Verdict> {
    let limit = effective_limit(limit, flags.limit, ctx.config().general.default_limit);
    let filter = ExecutionFilter {
        workflow_id: workflow.map(str::to_string),
        status: status.map(str::to_string),
        limit: usize::try_from(limit)?,
        include_data: true,
    };

    let progress = Progress::spinner("fetching N8N executions");
    let listing = ctx
        .service
        .n8n_executions(&filter)
        .await
        .context("failed to list N8N executions")?;
    progress.finish_clear();

    output_with(&listing, flags.format, |listing, options| Ok(render_listing(listing, options)))?;
    Ok(Verdict::Pass)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn render_listing(listing: &ExecutionListing, options: TableOptions) -> String {
    let summary = &listing.summary;
    let rate = (summary.failure_rate * 100.0).round() as u32;
    let by_status = summary
        .by_status
        .iter()
        .map(|(status, count)| format!("{status} {count}"))
        .collect::<Vec<_>>()
        .join(", ");
    let mut sections = vec![format!(
        "{} execution(s), {} failed ({rate}% of finished){}",
        summary.total,
        summary.failed,
        if by_status.is_empty() {
            String::new()
        } else {
            format!(": {by_status}")
        }
    )];

    if !listing.executions.is_empty() {
        let mut table = Table::new(["id", "workflow", "status", "started", "stopped"]);
        for execution in &listing.executions {
            table.row([
                execution.id.as_str(),
                execution.workflow_id.as_deref().unwrap_or("-"),
                execution.effective_status(),
                execution.started_at.as_deref().unwrap_or("-"),
                execution.stopped_at.as_deref().unwrap_or("-"),
            ]);
        }
        sections.push(table.render(options));
    }

    if !summary.recent_failures.is_empty() {
        let mut table = Table::new(["failed", "category", "error"]);
        for failure in &summary.recent_failures {
            table.row([
                failure.id.clone(),
                failure.category.map_or_else(|| "-".to_string(), |c| c.to_string()),
                failure.error.clone().unwrap_or_else(|| "-".into()),
            ]);
        }
        sections.push(table.render(options));
    }
    sections.join("\n\n")
}

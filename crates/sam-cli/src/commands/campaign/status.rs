use std::collections::BTreeMap;
use std::fmt::Display;

use anyhow::Context;
use sam_ops::checks::campaigns::CampaignHealth;

use crate::cli::GlobalFlags;
use crate::commands::shared::verdict::Verdict;
use crate::context::AppContext;
use crate::output::output_with;
use crate::output::table::{Table, TableOptions};
use crate::progress::Progress;

pub async fn run(campaign_id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<Verdict> {
    let progress = Progress::spinner("loading campaign");
    let health = ctx
        .service
        .campaign_status(campaign_id)
        .await
        .with_context(|| format!("failed to load status of campaign {campaign_id}"))?;
    progress.finish_clear();

    output_with(&health, flags.format, |health, options| Ok(render_health(health, options)))?;
    Ok(Verdict::Pass)
}

fn render_health(health: &CampaignHealth, options: TableOptions) -> String {
    let mut sections = vec![format!(
        "{} ({}) is {}: {} prospect(s), {} contacted",
        health.campaign_name,
        health.campaign_id,
        health.campaign_status,
        health.prospects_total,
        health.contacted()
    )];
    sections.push(counts_table("prospect status", &health.prospects_by_status, options));
    if !health.queue_by_status.is_empty() {
        sections.push(counts_table("queue status", &health.queue_by_status, options));
    }
    if !health.failures_by_category.is_empty() {
        sections.push(counts_table("failure", &health.failures_by_category, options));
    }
    if !health.stuck.is_empty() {
        sections.push(format!(
            "stuck in queued_in_n8n: {} (samops check stuck --campaign {} to reset)",
            health.stuck.join(", "),
            health.campaign_id
        ));
    }
    sections.join("\n\n")
}

fn counts_table<K: Display>(label: &str, counts: &BTreeMap<K, usize>, options: TableOptions) -> String {
    if counts.is_empty() {
        return format!("{label}: none");
    }
    let mut table = Table::new([label, "count"]);
    for (key, count) in counts {
        table.row([key.to_string(), count.to_string()]);
    }
    table.render(options)
}

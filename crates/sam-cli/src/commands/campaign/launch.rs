use std::time::Duration;

use anyhow::{Context, bail};
use sam_ops::launch::{LaunchEvent, LaunchPlan, LaunchReport, LaunchSettings};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::LaunchArgs;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::verdict::Verdict;
use crate::context::AppContext;
use crate::output::output_with;
use crate::output::table::{Table, TableOptions};
use crate::progress::Progress;

/// Prospect ids shown per batch in the table view.
const IDS_SHOWN: usize = 3;

#[derive(Debug, Serialize)]
struct LaunchResponse {
    report: LaunchReport,
    /// Full payloads, only for dry runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    plan: Option<LaunchPlan>,
}

pub async fn run(args: &LaunchArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<Verdict> {
    let service = &ctx.service;
    let settings = with_overrides(service.launch_settings()?, args, flags.limit);

    let progress = Progress::spinner("planning launch");
    let plan = service
        .plan_launch(&args.campaign_id, &settings)
        .await
        .with_context(|| format!("failed to plan launch of campaign {}", args.campaign_id))?;
    progress.finish_clear();

    let progress = Progress::bar(plan.batches.len() as u64, "sending batches");
    let report = service
        .launch_campaign(&plan, &settings, args.confirm, |event| match event {
            LaunchEvent::BatchQueued { number, total, prospects } => {
                progress.inc(1);
                progress.println(&format!("batch {number}/{total}: {prospects} prospect(s) queued"));
            }
            LaunchEvent::BatchFailed { number, total, error } => {
                progress.inc(1);
                progress.println(&format!("batch {number}/{total} failed: {error}"));
            }
            LaunchEvent::Waiting { seconds } => {
                progress.set_message(&format!("waiting {seconds}s before the next batch"));
            }
        })
        .await
        .context("campaign launch failed")?;
    progress.finish_clear();

    let failed = report.failed;
    let batches = report.batches;
    let response = LaunchResponse {
        plan: report.dry_run.then_some(plan),
        report,
    };
    output_with(&response, flags.format, |response, options| {
        Ok(render_launch(response, options))
    })?;

    if failed > 0 {
        bail!("{failed} of {batches} batch(es) failed, see the failures above");
    }
    Ok(Verdict::Pass)
}

/// Command-line flags win over configuration. `--limit` on the command wins
/// over the global one.
fn with_overrides(mut settings: LaunchSettings, args: &LaunchArgs, global_limit: Option<u32>) -> LaunchSettings {
    if let Some(size) = args.batch_size {
        settings.batch_size = size.max(1);
    }
    if let Some(secs) = args.batch_delay_secs {
        settings.batch_delay = Duration::from_secs(secs);
    }
    let configured = u32::try_from(settings.limit).unwrap_or(u32::MAX);
    let limit = effective_limit(args.limit, global_limit, configured);
    settings.limit = usize::try_from(limit).unwrap_or(usize::MAX);
    settings
}

fn render_launch(response: &LaunchResponse, options: TableOptions) -> String {
    let report = &response.report;
    let mut sections = Vec::new();

    if let Some(plan) = &response.plan {
        sections.push(format!(
            "{} ({}): {} prospect(s) in {} batch(es), daily budget {}/{} left, {} day",
            plan.campaign_name,
            plan.campaign_id,
            plan.prospect_count(),
            plan.batches.len(),
            plan.budget.remaining,
            plan.budget.limit,
            plan.pattern
        ));
        if !plan.batches.is_empty() {
            let mut table = Table::new(["batch", "prospects", "ids", "delays (min)"]);
            for (index, batch) in plan.batches.iter().enumerate() {
                let ids = batch.prospect_ids();
                let mut shown = ids.iter().take(IDS_SHOWN).copied().collect::<Vec<_>>().join(", ");
                if ids.len() > IDS_SHOWN {
                    shown.push_str(&format!(", +{}", ids.len() - IDS_SHOWN));
                }
                let delays = batch
                    .prospects
                    .iter()
                    .map(|p| p.send_delay_minutes.to_string())
                    .collect::<Vec<_>>()
                    .join(" ");
                table.row([(index + 1).to_string(), ids.len().to_string(), shown, delays]);
            }
            sections.push(table.render(options));
        }
        sections.push(String::from("dry run: nothing sent, rerun with --confirm to launch"));
    } else {
        sections.push(format!(
            "campaign {}: queued {} prospect(s), {}/{} batch(es) succeeded{}",
            report.campaign_id,
            report.queued,
            report.succeeded,
            report.batches,
            if report.campaign_activated {
                ", campaign set active"
            } else {
                ""
            }
        ));
    }

    if !report.failures.is_empty() {
        let mut table = Table::new(["batch", "prospects", "error"]);
        for failure in &report.failures {
            table.row([
                failure.batch.to_string(),
                failure.prospect_ids.join(", "),
                failure.error.clone(),
            ]);
        }
        sections.push(table.render(options));
    }
    if !report.skipped.is_empty() {
        let mut table = Table::new(["skipped", "reason"]);
        for skipped in &report.skipped {
            table.row([skipped.id.as_str(), skipped.reason.as_str()]);
        }
        sections.push(table.render(options));
    }
    if report.deferred > 0 {
        sections.push(format!(
            "{} prospect(s) deferred: daily message budget exhausted",
            report.deferred
        ));
    }
    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use sam_ops::launch::{BatchFailure, LaunchReport, LaunchSettings, SkippedProspect};

    use super::{LaunchResponse, render_launch, with_overrides};
    use crate::cli::subcommands::LaunchArgs;
    use crate::output::table::TableOptions;

    fn settings() -> LaunchSettings {
        LaunchSettings {
            batch_size: 5,
            batch_delay: Duration::from_secs(180),
            limit: 20,
            webhook: "connector-campaign".into(),
            timezone: "America/Los_Angeles".into(),
            default_daily_limit: 20,
        }
    }

    fn args() -> LaunchArgs {
        LaunchArgs {
            campaign_id: "cmp-1".into(),
            batch_size: None,
            batch_delay_secs: None,
            limit: None,
            confirm: false,
        }
    }

    #[test]
    fn config_values_stand_without_flags() {
        assert_eq!(with_overrides(settings(), &args(), None), settings());
    }

    #[test]
    fn flags_override_config() {
        let args = LaunchArgs {
            batch_size: Some(0),
            batch_delay_secs: Some(0),
            limit: Some(7),
            ..args()
        };
        let settings = with_overrides(settings(), &args, Some(50));
        assert_eq!(settings.batch_size, 1);
        assert_eq!(settings.batch_delay, Duration::ZERO);
        assert_eq!(settings.limit, 7);
    }

    #[test]
    fn global_limit_applies_when_local_missing() {
        assert_eq!(with_overrides(settings(), &args(), Some(50)).limit, 50);
    }

    #[test]
    fn confirmed_report_lists_failures_and_skips() {
        let response = LaunchResponse {
            report: LaunchReport {
                campaign_id: "cmp-1".into(),
                batches: 2,
                succeeded: 1,
                failed: 1,
                queued: 2,
                skipped: vec![SkippedProspect {
                    id: "p9".into(),
                    reason: "no LinkedIn profile URL or provider id".into(),
                }],
                deferred: 4,
                failures: vec![BatchFailure {
                    batch: 2,
                    prospect_ids: vec!["p3".into()],
                    error: "webhook rejected batch: 500".into(),
                }],
                campaign_activated: true,
                dry_run: false,
            },
            plan: None,
        };

        let out = render_launch(&response, TableOptions::default());
        let sections: Vec<&str> = out.split("\n\n").collect();
        assert_eq!(
            sections[0],
            "campaign cmp-1: queued 2 prospect(s), 1/2 batch(es) succeeded, campaign set active"
        );
        assert!(sections[1].contains("webhook rejected batch"));
        assert!(sections[2].contains("p9"));
        assert_eq!(sections[3], "4 prospect(s) deferred: daily message budget exhausted");
    }
}

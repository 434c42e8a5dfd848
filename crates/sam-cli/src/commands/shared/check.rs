use anyhow::{Context, bail};
use sam_core::issues::IssueReport;
use sam_ops::{ApplyOutcome, CheckOutcome, RepairPlan};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::commands::shared::verdict::Verdict;
use crate::context::AppContext;
use crate::output::output_with;
use crate::output::report::{apply_section, plan_section, report_section};
use crate::output::table::TableOptions;
use crate::progress::Progress;

/// Findings, the repair plan and what applying it did.
#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub report: IssueReport,
    pub plan: RepairPlan,
    pub outcome: ApplyOutcome,
    /// Journal file holding this run's mutations, when anything was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
}

/// Apply the plan of a finished check (a dry run unless `confirm`), print
/// everything, and fail when any patch could not be applied.
pub async fn finish(
    outcome: CheckOutcome,
    confirm: bool,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<Verdict> {
    let CheckOutcome { report, plan } = outcome;

    let progress = Progress::spinner(&format!("applying {} patch(es)", plan.len()));
    let applied = ctx
        .service
        .apply(&plan, confirm)
        .await
        .context("failed to apply repair plan")?;
    progress.finish_clear();

    let journal = if applied.dry_run {
        None
    } else {
        ctx.service
            .journal()
            .path()
            .map(|path| path.display().to_string())
    };
    let response = CheckResponse {
        report,
        plan,
        outcome: applied,
        journal,
    };
    output_with(&response, flags.format, |response, options| {
        Ok(render_check(response, options))
    })?;

    let failed = response.outcome.failed.len();
    if failed > 0 {
        bail!("{failed} of {} patch(es) failed to apply", response.plan.len());
    }
    Ok(Verdict::of(&response.report, flags))
}

fn render_check(response: &CheckResponse, options: TableOptions) -> String {
    let mut sections = vec![report_section(&response.report, options)];
    if !response.plan.is_empty() || !response.plan.notes.is_empty() {
        sections.push(plan_section(&response.plan, options));
    }
    sections.push(apply_section(&response.outcome, response.plan.len(), options));
    if let Some(journal) = &response.journal {
        sections.push(format!("journal: {journal}"));
    }
    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use sam_core::enums::Severity;
    use sam_core::issues::{Issue, IssueReport};
    use sam_ops::{ApplyOutcome, Patch, RepairPlan};

    use super::{CheckResponse, render_check};
    use crate::output::table::TableOptions;

    #[test]
    fn dry_run_view_has_report_plan_and_reminder() {
        let mut report = IssueReport::new("queue consistency");
        report.push(Issue::new(Severity::High, "queue_sent_prospect_not_contacted", "p1", "sent but pending"));
        let mut plan = RepairPlan::new("queue consistency");
        plan.push(Patch::new("campaign_prospects", "p1", "queue item sent").set("status", "connection_request_sent"));

        let out = render_check(
            &CheckResponse {
                report,
                plan,
                outcome: ApplyOutcome {
                    dry_run: true,
                    ..ApplyOutcome::default()
                },
                journal: None,
            },
            TableOptions::default(),
        );

        let sections: Vec<&str> = out.split("\n\n").collect();
        assert_eq!(sections.len(), 3);
        assert!(sections[0].starts_with("queue consistency: 1 issue(s)"));
        assert!(sections[1].starts_with("repair plan: 1 patch(es)"));
        assert!(sections[2].starts_with("dry run"));
    }

    #[test]
    fn applied_view_names_the_journal() {
        let out = render_check(
            &CheckResponse {
                report: IssueReport::new("stuck prospects"),
                plan: RepairPlan::new("stuck prospects"),
                outcome: ApplyOutcome::default(),
                journal: Some(".samops/journal/run-1.jsonl".into()),
            },
            TableOptions::default(),
        );
        assert!(out.starts_with("stuck prospects: no issues\n\napplied 0, failed 0"));
        assert!(out.ends_with("journal: .samops/journal/run-1.jsonl"));
    }
}

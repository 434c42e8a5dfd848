//! Table views for issue reports, repair plans and their outcomes.

use sam_core::issues::IssueReport;
use sam_ops::{ApplyOutcome, RepairPlan};

use super::cell;
use super::table::{Table, TableOptions};

/// Headline with per-severity counts, then one row per issue.
#[must_use]
pub fn report_section(report: &IssueReport, options: TableOptions) -> String {
    if report.is_clean() {
        return format!("{}: no issues", report.title);
    }

    let counts = report
        .count_by_severity()
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(severity, count)| format!("{severity} {count}"))
        .collect::<Vec<_>>()
        .join(", ");
    let mut table = Table::new(["severity", "code", "subject", "description"]);
    for issue in &report.issues {
        let mut description = issue.description.clone();
        if let Some(impact) = &issue.impact {
            description.push_str(" (");
            description.push_str(impact);
            description.push(')');
        }
        table.row([issue.severity.to_string(), issue.code.clone(), issue.subject.clone(), description]);
    }

    let mut out = format!(
        "{}: {} issue(s) ({counts})\n{}",
        report.title,
        report.issues.len(),
        table.render(options)
    );
    for issue in &report.issues {
        if let Some(sql) = &issue.fix_sql {
            out.push_str(&format!("\n\nfix for {} ({}):\n{sql}", issue.subject, issue.code));
        }
    }
    out
}

/// Planned patches and operator notes.
#[must_use]
pub fn plan_section(plan: &RepairPlan, options: TableOptions) -> String {
    let mut out = if plan.is_empty() {
        String::from("repair plan: nothing to change")
    } else {
        let mut table = Table::new(["table", "id", "changes", "reason"]);
        for patch in &plan.patches {
            let changes = patch
                .changes
                .iter()
                .map(|(column, value)| format!("{column}={}", cell(value)))
                .collect::<Vec<_>>()
                .join(", ");
            table.row([patch.table.clone(), patch.id.clone(), changes, patch.reason.clone()]);
        }
        format!("repair plan: {} patch(es)\n{}", plan.len(), table.render(options))
    };
    for note in &plan.notes {
        out.push_str("\nnote: ");
        out.push_str(note);
    }
    out
}

/// What applying a plan did, or the reminder that it was a dry run.
#[must_use]
pub fn apply_section(outcome: &ApplyOutcome, planned: usize, options: TableOptions) -> String {
    if outcome.dry_run {
        return if planned == 0 {
            String::from("dry run: nothing to apply")
        } else {
            format!("dry run: nothing written, rerun with --confirm to apply {planned} patch(es)")
        };
    }

    let mut out = format!("applied {}, failed {}", outcome.applied, outcome.failed.len());
    if !outcome.failed.is_empty() {
        let mut table = Table::new(["id", "error"]);
        for (id, error) in &outcome.failed {
            table.row([id.as_str(), error.as_str()]);
        }
        out.push('\n');
        out.push_str(&table.render(options));
    }
    out
}

#[cfg(test)]
mod tests {
    use sam_core::enums::Severity;
    use sam_core::issues::{Issue, IssueReport};
    use sam_ops::{ApplyOutcome, Patch, RepairPlan};

    use super::{apply_section, plan_section, report_section};
    use crate::output::table::TableOptions;

    #[test]
    fn clean_report_is_one_line() {
        let report = IssueReport::new("queue consistency");
        assert_eq!(report_section(&report, TableOptions::default()), "queue consistency: no issues");
    }

    #[test]
    fn report_lists_counts_issues_and_fix_sql() {
        let mut report = IssueReport::new("membership audit");
        report.push(
            Issue::new(Severity::Critical, "membership_missing", "tl@example.com", "no membership")
                .with_fix_sql("INSERT INTO workspace_members ..."),
        );
        report.push(Issue::new(Severity::Low, "user_without_membership", "u2", "no workspace"));

        let out = report_section(&report, TableOptions::default());
        assert!(out.starts_with("membership audit: 2 issue(s) (critical 1, low 1)"));
        assert!(out.contains("membership_missing"));
        assert!(out.contains("fix for tl@example.com (membership_missing):\nINSERT INTO workspace_members"));
    }

    #[test]
    fn plan_shows_changes_and_notes() {
        let mut plan = RepairPlan::new("stuck prospects");
        plan.push(Patch::new("campaign_prospects", "p1", "stuck for 30h").set("status", "pending"));
        plan.note("3 prospects left alone");

        let out = plan_section(&plan, TableOptions::default());
        assert!(out.starts_with("repair plan: 1 patch(es)"));
        assert!(out.contains("status=pending"));
        assert!(out.ends_with("note: 3 prospects left alone"));
    }

    #[test]
    fn dry_run_points_at_confirm() {
        let outcome = ApplyOutcome {
            dry_run: true,
            ..ApplyOutcome::default()
        };
        assert!(apply_section(&outcome, 2, TableOptions::default()).contains("--confirm to apply 2 patch(es)"));
        assert_eq!(apply_section(&outcome, 0, TableOptions::default()), "dry run: nothing to apply");
    }

    #[test]
    fn applied_outcome_lists_failures() {
        let outcome = ApplyOutcome {
            applied: 1,
            failed: vec![("p3".into(), "patch matched no rows".into())],
            dry_run: false,
        };
        let out = apply_section(&outcome, 2, TableOptions::default());
        assert!(out.starts_with("applied 1, failed 1"));
        assert!(out.contains("patch matched no rows"));
    }
}

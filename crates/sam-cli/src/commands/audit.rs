use anyhow::Context;
use sam_ops::checks::membership::MembershipTarget;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuditCommands;
use crate::commands::shared::verdict::Verdict;
use crate::context::AppContext;
use crate::output::output_with;
use crate::output::report::report_section;
use crate::progress::Progress;

/// Handle `samops audit`.
pub async fn handle(action: &AuditCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<Verdict> {
    match action {
        AuditCommands::Membership {
            user_email,
            workspace_id,
        } => {
            let target = MembershipTarget {
                user_email: user_email.clone(),
                workspace_id: workspace_id.clone(),
            };
            let progress = Progress::spinner("auditing workspace memberships");
            let report = ctx
                .service
                .audit_membership(&target)
                .await
                .context("membership audit failed")?;
            progress.finish_clear();

            output_with(&report, flags.format, |report, options| Ok(report_section(report, options)))?;
            Ok(Verdict::of(&report, flags))
        }
    }
}

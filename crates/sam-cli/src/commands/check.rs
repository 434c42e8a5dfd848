use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CheckCommands;
use crate::commands::shared::check::finish;
use crate::commands::shared::verdict::Verdict;
use crate::context::AppContext;
use crate::output::output_with;
use crate::output::report::report_section;
use crate::progress::Progress;

/// Handle `samops check`.
pub async fn handle(action: &CheckCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<Verdict> {
    let service = &ctx.service;
    let progress = Progress::spinner(spinner_message(action));

    let (outcome, confirm) = match action {
        CheckCommands::Queue { campaign, confirm } => (
            service.check_queue(campaign).await.context("send queue check failed")?,
            *confirm,
        ),
        CheckCommands::Approvals {
            workspace,
            stale_days,
            confirm,
        } => (
            service
                .check_approvals(workspace.as_deref(), *stale_days)
                .await
                .context("stale approval check failed")?,
            *confirm,
        ),
        CheckCommands::Sessions { workspace, confirm } => (
            service
                .check_sessions(workspace.as_deref())
                .await
                .context("approval session check failed")?,
            *confirm,
        ),
        CheckCommands::Accounts { workspace, confirm } => (
            service
                .check_accounts(workspace)
                .await
                .context("account assignment check failed")?,
            *confirm,
        ),
        CheckCommands::Stuck {
            campaign,
            hours,
            confirm,
        } => (
            service
                .check_stuck(campaign, *hours)
                .await
                .context("stuck prospect check failed")?,
            *confirm,
        ),
        CheckCommands::Drafts { workspace, hours } => {
            let report = service
                .check_drafts(workspace.as_deref(), *hours)
                .await
                .context("reply draft check failed")?;
            progress.finish_clear();
            output_with(&report, flags.format, |report, options| Ok(report_section(report, options)))?;
            return Ok(Verdict::of(&report, flags));
        }
    };
    progress.finish_clear();

    finish(outcome, confirm, ctx, flags).await
}

const fn spinner_message(action: &CheckCommands) -> &'static str {
    match action {
        CheckCommands::Queue { .. } => "checking send queue",
        CheckCommands::Approvals { .. } => "checking stale approvals",
        CheckCommands::Sessions { .. } => "checking approval sessions",
        CheckCommands::Accounts { .. } => "checking account assignment",
        CheckCommands::Stuck { .. } => "checking stuck prospects",
        CheckCommands::Drafts { .. } => "checking reply drafts",
    }
}

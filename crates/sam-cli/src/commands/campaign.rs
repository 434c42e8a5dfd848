mod launch;
mod status;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CampaignCommands;
use crate::commands::shared::verdict::Verdict;
use crate::context::AppContext;

/// Handle `samops campaign`.
pub async fn handle(action: &CampaignCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<Verdict> {
    match action {
        CampaignCommands::Status { campaign_id } => status::run(campaign_id, ctx, flags).await,
        CampaignCommands::Launch(args) => launch::run(args, ctx, flags).await,
    }
}

mod accounts;
mod diagnose;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::UnipileCommands;
use crate::commands::shared::verdict::Verdict;
use crate::context::AppContext;

/// Handle `samops unipile`.
pub async fn handle(action: &UnipileCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<Verdict> {
    match action {
        UnipileCommands::Accounts => accounts::run(ctx, flags).await,
        UnipileCommands::Diagnose { account_id, profiles } => diagnose::run(account_id, profiles, ctx, flags).await,
    }
}

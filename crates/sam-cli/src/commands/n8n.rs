mod executions;
mod set_param;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::N8nCommands;
use crate::commands::shared::verdict::Verdict;
use crate::context::AppContext;

/// Handle `samops n8n`.
pub async fn handle(action: &N8nCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<Verdict> {
    match action {
        N8nCommands::Executions {
            workflow,
            status,
            limit,
        } => executions::run(workflow.as_deref(), status.as_deref(), *limit, ctx, flags).await,
        N8nCommands::SetParam(args) => set_param::run(args, ctx, flags).await,
    }
}

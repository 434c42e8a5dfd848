use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::commands::shared::verdict::Verdict;
use crate::context::AppContext;

/// Dispatch a parsed command that needs the platform to its handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<Verdict> {
    match command {
        Commands::Audit { action } => commands::audit::handle(&action, ctx, flags).await,
        Commands::Check { action } => commands::check::handle(&action, ctx, flags).await,
        Commands::Campaign { action } => commands::campaign::handle(&action, ctx, flags).await,
        Commands::Unipile { action } => commands::unipile::handle(&action, ctx, flags).await,
        Commands::N8n { action } => commands::n8n::handle(&action, ctx, flags).await,
        Commands::Config { .. } | Commands::Linkedin { .. } | Commands::Classify(_) => {
            unreachable!("config/linkedin/classify are pre-dispatched in main")
        }
    }
}

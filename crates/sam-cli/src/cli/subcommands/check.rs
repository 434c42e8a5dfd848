use clap::Subcommand;

/// Consistency checks. Repairs run only with `--confirm`.
#[derive(Clone, Debug, Subcommand)]
pub enum CheckCommands {
    /// Send queue against campaign prospects.
    Queue {
        #[arg(long)]
        campaign: String,
        #[arg(long)]
        confirm: bool,
    },
    /// Prospects pending approval for too long.
    Approvals {
        #[arg(long)]
        workspace: Option<String>,
        #[arg(long)]
        stale_days: Option<u32>,
        #[arg(long)]
        confirm: bool,
    },
    /// Approval session counters.
    Sessions {
        #[arg(long)]
        workspace: Option<String>,
        #[arg(long)]
        confirm: bool,
    },
    /// LinkedIn account ownership.
    Accounts {
        #[arg(long)]
        workspace: String,
        #[arg(long)]
        confirm: bool,
    },
    /// Prospects stuck in the N8N queue.
    Stuck {
        #[arg(long)]
        campaign: String,
        #[arg(long)]
        hours: Option<u32>,
        #[arg(long)]
        confirm: bool,
    },
    /// Reply drafts waiting for review.
    Drafts {
        #[arg(long)]
        workspace: Option<String>,
        #[arg(long)]
        hours: Option<u32>,
    },
}

use clap::{Args, Subcommand};

/// Campaign commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CampaignCommands {
    /// Prospect and queue counts.
    Status { campaign_id: String },
    /// Send pending prospects to N8N in batches.
    Launch(LaunchArgs),
}

/// Arguments for `samops campaign launch`.
#[derive(Clone, Debug, Args)]
pub struct LaunchArgs {
    pub campaign_id: String,
    #[arg(long)]
    pub batch_size: Option<usize>,
    #[arg(long)]
    pub batch_delay_secs: Option<u64>,
    /// Most pending prospects to load.
    #[arg(long)]
    pub limit: Option<u32>,
    #[arg(long)]
    pub confirm: bool,
}

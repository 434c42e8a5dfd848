use clap::{Args, Subcommand};

use crate::cli::subcommands::{
    AuditCommands, CampaignCommands, CheckCommands, ConfigCommands, LinkedinCommands, N8nCommands,
    UnipileCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Inspect the loaded configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
    /// LinkedIn URL helpers (offline).
    Linkedin {
        #[command(subcommand)]
        action: LinkedinCommands,
    },
    /// Classify provider error messages (offline).
    Classify(ClassifyArgs),
    /// Read-only audits.
    Audit {
        #[command(subcommand)]
        action: AuditCommands,
    },
    /// Consistency checks with optional repairs.
    Check {
        #[command(subcommand)]
        action: CheckCommands,
    },
    /// Campaign status and launch.
    Campaign {
        #[command(subcommand)]
        action: CampaignCommands,
    },
    /// Unipile accounts and diagnostics.
    Unipile {
        #[command(subcommand)]
        action: UnipileCommands,
    },
    /// N8N executions and workflow edits.
    N8n {
        #[command(subcommand)]
        action: N8nCommands,
    },
}

/// Arguments for `samops classify`.
#[derive(Clone, Debug, Args)]
pub struct ClassifyArgs {
    /// Error messages to classify.
    #[arg(required = true)]
    pub messages: Vec<String>,
}

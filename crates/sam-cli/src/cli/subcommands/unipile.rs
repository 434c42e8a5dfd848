use clap::Subcommand;

/// Unipile commands.
#[derive(Clone, Debug, Subcommand)]
pub enum UnipileCommands {
    /// List connected accounts.
    Accounts,
    /// Account state, pending invitations and profile lookups.
    Diagnose {
        account_id: String,
        /// Profile URL, slug or provider id to look up. Repeatable.
        #[arg(long = "profile")]
        profiles: Vec<String>,
    },
}

use clap::Subcommand;

/// Audit commands. Report only.
#[derive(Clone, Debug, Subcommand)]
pub enum AuditCommands {
    /// Workspace memberships against auth users.
    Membership {
        /// Email of a user whose access should be verified.
        #[arg(long = "user")]
        user_email: Option<String>,
        /// Workspace the user should belong to.
        #[arg(long = "workspace")]
        workspace_id: Option<String>,
    },
}

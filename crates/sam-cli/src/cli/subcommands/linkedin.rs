use clap::Subcommand;

/// LinkedIn URL commands.
#[derive(Clone, Debug, Subcommand)]
pub enum LinkedinCommands {
    /// Extract the vanity slug from profile URLs.
    Slug {
        #[arg(required = true)]
        urls: Vec<String>,
    },
}

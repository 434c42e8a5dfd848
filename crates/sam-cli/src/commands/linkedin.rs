use sam_core::linkedin::{profile_url, vanity_slug};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::LinkedinCommands;
use crate::commands::shared::verdict::Verdict;
use crate::output::output;

#[derive(Debug, Serialize)]
struct SlugRow {
    input: String,
    slug: Option<String>,
    profile_url: Option<String>,
}

/// Handle `samops linkedin`.
pub fn handle(action: &LinkedinCommands, flags: &GlobalFlags) -> anyhow::Result<Verdict> {
    match action {
        LinkedinCommands::Slug { urls } => {
            output(&slug_rows(urls), flags.format)?;
            Ok(Verdict::Pass)
        }
    }
}

fn slug_rows(inputs: &[String]) -> Vec<SlugRow> {
    inputs
        .iter()
        .map(|input| {
            let slug = vanity_slug(input);
            SlugRow {
                input: input.clone(),
                profile_url: slug.as_deref().map(profile_url),
                slug,
            }
        })
        .collect()
}

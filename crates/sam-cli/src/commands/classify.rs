use chrono::{DateTime, Utc};
use sam_core::classify::{ErrorCategory, classify};
use sam_core::enums::ProspectStatus;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ClassifyArgs;
use crate::commands::shared::verdict::Verdict;
use crate::output::output;

#[derive(Debug, Serialize)]
struct Classification {
    message: String,
    category: ErrorCategory,
    retryable: bool,
    account_wide: bool,
    prospect_status: ProspectStatus,
    resume_after: Option<DateTime<Utc>>,
}

/// Handle `samops classify`.
pub fn handle(args: &ClassifyArgs, flags: &GlobalFlags) -> anyhow::Result<Verdict> {
    output(&classify_all(&args.messages, Utc::now()), flags.format)?;
    Ok(Verdict::Pass)
}

fn classify_all(messages: &[String], now: DateTime<Utc>) -> Vec<Classification> {
    messages
        .iter()
        .map(|message| {
            let category = classify(message);
            Classification {
                message: message.clone(),
                category,
                retryable: category.is_retryable(),
                account_wide: category.is_account_wide(),
                prospect_status: category.suggested_prospect_status(),
                resume_after: category.resume_after(now),
            }
        })
        .collect()
}

use anyhow::Context;
use sam_ops::diagnose::{AccountDiagnosis, ProfileOutcome};

use crate::cli::GlobalFlags;
use crate::commands::shared::verdict::Verdict;
use crate::context::AppContext;
use crate::output::output_with;
use crate::output::report::report_section;
use crate::output::table::{Table, TableOptions};
use crate::progress::Progress;

pub async fn run(account_id: &str, profiles: &[String], ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<Verdict> {
    let progress = Progress::spinner(&format!("diagnosing {account_id}"));
    let diagnosis = ctx
        .service
        .diagnose_account(account_id, profiles)
        .await
        .with_context(|| format!("failed to diagnose Unipile account {account_id}"))?;
    progress.finish_clear();

    output_with(&diagnosis, flags.format, |diagnosis, options| {
        Ok(render_diagnosis(diagnosis, options))
    })?;
    Ok(Verdict::of(&diagnosis.report, flags))
}

fn render_diagnosis(diagnosis: &AccountDiagnosis, options: TableOptions) -> String {
    let pending = diagnosis
        .pending_invitations
        .map_or_else(|| String::from("unknown"), |count| count.to_string());
    let mut sections = vec![format!(
        "{} ({}): type {}, status {}, pending invitations {pending}",
        diagnosis.name,
        diagnosis.account_id,
        diagnosis.kind.as_deref().unwrap_or("unknown"),
        diagnosis.status.as_deref().unwrap_or("unknown"),
    )];

    if !diagnosis.profiles.is_empty() {
        let mut table = Table::new(["profile", "result", "name", "distance", "detail"]);
        for check in &diagnosis.profiles {
            let row = match &check.outcome {
                ProfileOutcome::Found(profile) => [
                    check.input.clone(),
                    String::from("found"),
                    profile.name.clone(),
                    profile.network_distance.clone().unwrap_or_else(|| "-".into()),
                    profile.provider_id.clone().unwrap_or_else(|| "-".into()),
                ],
                ProfileOutcome::Error { message, category } => [
                    check.input.clone(),
                    String::from("error"),
                    category.to_string(),
                    String::from("-"),
                    message.clone(),
                ],
            };
            table.row(row);
        }
        sections.push(table.render(options));
    }

    sections.push(report_section(&diagnosis.report, options));
    sections.join("\n\n")
}

use anyhow::Context;
use sam_api::unipile::UnipileAccount;

use crate::cli::GlobalFlags;
use crate::commands::shared::verdict::Verdict;
use crate::context::AppContext;
use crate::output::output_with;
use crate::output::table::{Table, TableOptions};
use crate::progress::Progress;

pub async fn run(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<Verdict> {
    let progress = Progress::spinner("listing Unipile accounts");
    let accounts = ctx
        .service
        .unipile_accounts()
        .await
        .context("failed to list Unipile accounts")?;
    progress.finish_clear();

    output_with(&accounts, flags.format, |accounts, options| Ok(accounts_table(accounts, options)))?;
    Ok(Verdict::Pass)
}

fn accounts_table(accounts: &[UnipileAccount], options: TableOptions) -> String {
    if accounts.is_empty() {
        return String::from("(no accounts)");
    }
    let mut table = Table::new(["id", "name", "type", "status", "created"]);
    for account in accounts {
        table.row([
            account.id.as_str(),
            account.display_name(),
            account.kind.as_deref().unwrap_or("-"),
            account.effective_status().unwrap_or("-"),
            account.created_at.as_deref().unwrap_or("-"),
        ]);
    }
    table.render(options)
}

#[cfg(test)]
mod tests {
    use sam_api::unipile::UnipileAccount;
    use serde_json::json;

    use super::accounts_table;
    use crate::output::table::TableOptions;

    #[test]
    fn falls_back_to_source_status_and_id() {
        let accounts: Vec<UnipileAccount> = serde_json::from_value(json!([
            {"id": "acc-1", "name": "Ada Lovelace", "type": "LINKEDIN", "sources": [{"id": "acc-1_MESSAGING", "status": "OK"}]},
            {"id": "acc-2", "type": "LINKEDIN", "status": "CREDENTIALS"}
        ]))
        .unwrap();

        let out = accounts_table(&accounts, TableOptions::default());
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[2].contains("Ada Lovelace") && lines[2].contains("OK"));
        assert!(lines[3].starts_with("acc-2  acc-2") && lines[3].contains("CREDENTIALS"));
    }
}

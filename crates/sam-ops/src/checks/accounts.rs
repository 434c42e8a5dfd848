//! LinkedIn account assignment.
//!
//! Each `workspace_accounts` row should belong to the member whose name the
//! connected LinkedIn profile carries, and campaigns should send from an
//! account the workspace actually has.

use std::collections::{HashMap, HashSet};

use sam_api::unipile::UnipileAccount;
use sam_core::entities::{AuthUser, Campaign, WorkspaceAccount};
use sam_core::enums::Severity;
use sam_core::issues::Issue;
use sam_core::names::{OwnerRule, match_owner};

use super::CheckOutcome;
use crate::plan::Patch;

pub const ACCOUNTS_TABLE: &str = "workspace_accounts";

/// Rows and remote state for one workspace.
#[derive(Debug, Clone, Copy)]
pub struct AccountInput<'a> {
    pub unipile_accounts: &'a [UnipileAccount],
    pub workspace_accounts: &'a [WorkspaceAccount],
    /// Auth users that are members of the workspace.
    pub member_users: &'a [AuthUser],
    pub campaigns: &'a [Campaign],
    pub owners: &'a [OwnerRule],
}

#[must_use]
pub fn check_accounts(input: AccountInput<'_>) -> CheckOutcome {
    let mut out = CheckOutcome::new("LinkedIn account assignment");
    let unipile: HashMap<&str, &UnipileAccount> = input
        .unipile_accounts
        .iter()
        .filter(|a| a.is_linkedin())
        .map(|a| (a.id.as_str(), a))
        .collect();

    for account in input.workspace_accounts.iter().filter(|a| a.is_linkedin()) {
        check_assignment(account, &unipile, input, &mut out);
    }

    let known: HashSet<&str> = input
        .workspace_accounts
        .iter()
        .filter_map(|a| a.unipile_account_id.as_deref())
        .collect();
    for campaign in input.campaigns {
        if !campaign.status.is_launchable() {
            continue;
        }
        match campaign.linkedin_account_id.as_deref() {
            Some(id) if !known.contains(id) => out.report.push(
                Issue::new(
                    Severity::High,
                    "campaign_account_mismatch",
                    &campaign.id,
                    format!(
                        "Campaign '{}' sends from {id}, which is not a workspace account",
                        campaign.display_name()
                    ),
                )
                .with_impact("Connection requests fail or go out from the wrong profile"),
            ),
            None => out.report.push(Issue::new(
                Severity::Low,
                "campaign_without_account",
                &campaign.id,
                format!("Campaign '{}' has no LinkedIn account", campaign.display_name()),
            )),
            Some(_) => {}
        }
    }

    out.finish()
}

fn check_assignment(
    account: &WorkspaceAccount,
    unipile: &HashMap<&str, &UnipileAccount>,
    input: AccountInput<'_>,
    out: &mut CheckOutcome,
) {
    if account.is_disconnected() && account.is_active == Some(true) {
        out.report.push(Issue::new(
            Severity::Medium,
            "disconnected_account_active",
            &account.id,
            "Account is marked disconnected but still active",
        ));
    }

    let Some(unipile_id) = account.unipile_account_id.as_deref() else {
        out.report.push(Issue::new(
            Severity::High,
            "account_without_unipile_id",
            &account.id,
            "LinkedIn workspace account has no Unipile account id",
        ));
        return;
    };
    let Some(remote) = unipile.get(unipile_id) else {
        out.report.push(Issue::new(
            Severity::High,
            "account_not_in_unipile",
            unipile_id,
            format!("Workspace account {} not found in Unipile", account.id),
        ));
        return;
    };

    if !remote.is_ok() {
        out.report.push(Issue::new(
            Severity::Medium,
            "unipile_account_not_ok",
            unipile_id,
            format!(
                "Unipile reports '{}' for {}",
                remote.effective_status().unwrap_or("no status"),
                remote.display_name()
            ),
        ));
    }

    let name = remote
        .name
        .as_deref()
        .or(account.account_name.as_deref())
        .unwrap_or(&remote.id);
    let Some(rule) = match_owner(name, input.owners) else {
        out.report.push(Issue::new(
            Severity::Medium,
            "owner_unmatched",
            unipile_id,
            format!("No owner rule matches account name '{name}'"),
        ));
        return;
    };
    let Some(owner) = input.member_users.iter().find(|u| u.has_email(&rule.email)) else {
        out.report.push(Issue::new(
            Severity::Medium,
            "owner_not_member",
            unipile_id,
            format!("Matched owner {} is not a member of the workspace", rule.email),
        ));
        return;
    };

    if account.user_id.as_deref() == Some(owner.id.as_str()) {
        out.plan.note(format!("{name} already assigned to {}", rule.email));
        return;
    }
    out.report.push(Issue::new(
        Severity::High,
        "account_misassigned",
        unipile_id,
        format!(
            "'{name}' is assigned to {} but belongs to {}",
            account.user_id.as_deref().unwrap_or("nobody"),
            rule.email
        ),
    ));
    out.plan.push(
        Patch::new(ACCOUNTS_TABLE, &account.id, format!("{name} belongs to {}", rule.email))
            .set("user_id", owner.id.as_str()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{account, campaign};
    use pretty_assertions::assert_eq;
    use sam_core::enums::CampaignStatus;
    use serde_json::json;

    fn remote(id: &str, name: &str, status: &str) -> UnipileAccount {
        serde_json::from_value(json!({"id": id, "name": name, "type": "LINKEDIN", "status": status}))
            .unwrap()
    }

    fn user(id: &str, email: &str) -> AuthUser {
        AuthUser {
            id: id.into(),
            email: Some(email.into()),
            email_confirmed_at: None,
            created_at: None,
            last_sign_in_at: None,
        }
    }

    fn rules() -> Vec<OwnerRule> {
        vec![
            OwnerRule {
                tokens: vec!["charissa".into(), "saniel".into()],
                email: "cs@example.com".into(),
                name: None,
            },
            OwnerRule {
                tokens: vec!["thorsten".into()],
                email: "tl@example.com".into(),
                name: None,
            },
        ]
    }

    #[test]
    fn reassigns_by_folded_display_name() {
        let remotes = [
            remote("uni-1", "\u{1D402}\u{1D421}\u{1D41A}\u{1D42B}\u{1D422}\u{1D42C}\u{1D42C}\u{1D41A} S.", "OK"),
            remote("uni-2", "Thorsten Linz", "OK"),
        ];
        let accounts = [
            account("wa-1", "uni-1", Some("u-tl")),
            account("wa-2", "uni-2", Some("u-tl")),
        ];
        let users = [user("u-cs", "cs@example.com"), user("u-tl", "tl@example.com")];
        let owners = rules();

        let out = check_accounts(AccountInput {
            unipile_accounts: &remotes,
            workspace_accounts: &accounts,
            member_users: &users,
            campaigns: &[],
            owners: &owners,
        });

        assert_eq!(out.plan.len(), 1);
        assert_eq!(out.plan.patches[0].id, "wa-1");
        assert_eq!(out.plan.patches[0].get("user_id"), Some(&json!("u-cs")));
        assert_eq!(out.plan.notes, vec!["Thorsten Linz already assigned to tl@example.com".to_string()]);
        assert_eq!(out.report.issues[0].code, "account_misassigned");
    }

    #[test]
    fn reports_missing_and_unmatched_accounts() {
        let remotes = [remote("uni-2", "Jane Doe", "CREDENTIALS")];
        let accounts = [account("wa-1", "uni-1", None), account("wa-2", "uni-2", None)];
        let owners = rules();

        let out = check_accounts(AccountInput {
            unipile_accounts: &remotes,
            workspace_accounts: &accounts,
            member_users: &[],
            campaigns: &[],
            owners: &owners,
        });

        let codes: Vec<_> = out.report.issues.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, vec!["account_not_in_unipile", "unipile_account_not_ok", "owner_unmatched"]);
        assert!(out.plan.is_empty());
    }

    #[test]
    fn matched_owner_must_be_member() {
        let remotes = [remote("uni-1", "Thorsten Linz", "OK")];
        let accounts = [account("wa-1", "uni-1", None)];
        let owners = rules();
        let out = check_accounts(AccountInput {
            unipile_accounts: &remotes,
            workspace_accounts: &accounts,
            member_users: &[user("u-cs", "cs@example.com")],
            campaigns: &[],
            owners: &owners,
        });
        assert_eq!(out.report.issues[0].code, "owner_not_member");
    }

    #[test]
    fn flags_campaigns_on_foreign_accounts() {
        let accounts = [account("wa-1", "uni-1", None)];
        let mut foreign = campaign("c-foreign", CampaignStatus::Active);
        foreign.linkedin_account_id = Some("uni-other".into());
        let mut archived = campaign("c-archived", CampaignStatus::Archived);
        archived.linkedin_account_id = Some("uni-other".into());
        let fine = campaign("c-fine", CampaignStatus::Draft);

        let out = check_accounts(AccountInput {
            unipile_accounts: &[],
            workspace_accounts: &accounts,
            member_users: &[],
            campaigns: &[foreign, archived, fine],
            owners: &[],
        });
        let mismatches: Vec<_> = out
            .report
            .issues
            .iter()
            .filter(|i| i.code == "campaign_account_mismatch")
            .map(|i| i.subject.as_str())
            .collect();
        assert_eq!(mismatches, vec!["c-foreign"]);
    }

    #[test]
    fn disconnected_but_active_is_reported() {
        let mut wa = account("wa-1", "uni-1", None);
        wa.connection_status = Some("disconnected".into());
        let out = check_accounts(AccountInput {
            unipile_accounts: &[remote("uni-1", "Nobody", "OK")],
            workspace_accounts: &[wa],
            member_users: &[],
            campaigns: &[],
            owners: &[],
        });
        assert!(out.report.issues.iter().any(|i| i.code == "disconnected_account_active"));
    }
}

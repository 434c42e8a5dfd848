//! Why is this LinkedIn account not sending?
//!
//! Combines the Unipile account state, the outstanding invitation count, and
//! profile lookups for specific prospects into one report. The lookups are
//! done by [`crate::OpsService::diagnose_account`]; everything here is pure.

use serde::Serialize;

use sam_api::ApiError;
use sam_api::unipile::{UnipileAccount, UnipileProfile};
use sam_core::classify::{ErrorCategory, classify};
use sam_core::enums::Severity;
use sam_core::issues::{Issue, IssueReport};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSummary {
    pub name: String,
    pub provider_id: Option<String>,
    pub public_identifier: Option<String>,
    pub network_distance: Option<String>,
    pub first_degree: bool,
    pub invitation_pending: bool,
}

impl From<&UnipileProfile> for ProfileSummary {
    fn from(profile: &UnipileProfile) -> Self {
        Self {
            name: profile.display_name(),
            provider_id: profile.provider_id.clone(),
            public_identifier: profile.public_identifier.clone(),
            network_distance: profile.network_distance.clone(),
            first_degree: profile.is_first_degree(),
            invitation_pending: profile.pending_invitation(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ProfileOutcome {
    Found(ProfileSummary),
    Error { message: String, category: ErrorCategory },
}

/// One looked-up profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileCheck {
    /// URL, slug or provider id as given.
    pub input: String,
    pub outcome: ProfileOutcome,
}

impl ProfileCheck {
    #[must_use]
    pub fn from_lookup(input: &str, lookup: Result<UnipileProfile, ApiError>) -> Self {
        let outcome = match lookup {
            Ok(profile) => ProfileOutcome::Found(ProfileSummary::from(&profile)),
            Err(err) => {
                let message = err.provider_message();
                ProfileOutcome::Error {
                    category: classify(&message),
                    message,
                }
            }
        };
        Self {
            input: input.to_string(),
            outcome,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountDiagnosis {
    pub account_id: String,
    pub name: String,
    pub kind: Option<String>,
    pub status: Option<String>,
    /// `None` when the invitation listing failed.
    pub pending_invitations: Option<usize>,
    pub profiles: Vec<ProfileCheck>,
    pub report: IssueReport,
}

fn profile_issue(check: &ProfileCheck) -> Option<Issue> {
    match &check.outcome {
        ProfileOutcome::Found(profile) if profile.first_degree => Some(Issue::new(
            Severity::Info,
            "already_connected",
            &check.input,
            format!("{} is already a first-degree connection", profile.name),
        )),
        ProfileOutcome::Found(profile) if profile.invitation_pending => Some(Issue::new(
            Severity::Info,
            "invitation_pending",
            &check.input,
            format!("An invitation to {} is already pending", profile.name),
        )),
        ProfileOutcome::Found(_) => None,
        ProfileOutcome::Error { message, category } => {
            let (severity, code) = match category {
                ErrorCategory::InvitationCooldown
                | ErrorCategory::DailyLimit
                | ErrorCategory::WeeklyLimit => (Severity::High, "account_limited"),
                ErrorCategory::AccountDisconnected => (Severity::Critical, "account_disconnected"),
                ErrorCategory::ProfileNotFound => (Severity::Medium, "profile_not_found"),
                _ => (Severity::Low, "profile_lookup_failed"),
            };
            let mut issue = Issue::new(severity, code, &check.input, format!("{category}: {message}"));
            if category.is_account_wide() || *category == ErrorCategory::InvitationCooldown {
                issue = issue.with_impact("Connection requests from this account will keep failing");
            }
            Some(issue)
        }
    }
}

/// Build the diagnosis report.
#[must_use]
pub fn diagnose(
    account: &UnipileAccount,
    pending_invitations: Option<usize>,
    profiles: Vec<ProfileCheck>,
) -> AccountDiagnosis {
    let mut report = IssueReport::new(format!("Unipile diagnosis for {}", account.display_name()));

    if !account.is_ok() {
        report.push(
            Issue::new(
                Severity::Critical,
                "unipile_account_not_ok",
                &account.id,
                format!(
                    "Account status is '{}'",
                    account.effective_status().unwrap_or("unknown")
                ),
            )
            .with_impact("Nothing can be sent until the account is reconnected"),
        );
    }
    if !account.is_linkedin() {
        report.push(Issue::new(
            Severity::Medium,
            "account_not_linkedin",
            &account.id,
            format!(
                "Account type is '{}', not LINKEDIN",
                account.kind.as_deref().unwrap_or("unknown")
            ),
        ));
    }
    if pending_invitations.is_none() {
        report.push(Issue::new(
            Severity::Low,
            "invitations_unavailable",
            &account.id,
            "Could not list sent invitations",
        ));
    }
    report.extend(profiles.iter().filter_map(profile_issue));
    report.sort();

    AccountDiagnosis {
        account_id: account.id.clone(),
        name: account.display_name().to_string(),
        kind: account.kind.clone(),
        status: account.effective_status().map(str::to_string),
        pending_invitations,
        profiles,
        report,
    }
}

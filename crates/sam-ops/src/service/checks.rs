//! Audits and consistency checks.

use std::collections::{BTreeSet, HashSet};

use chrono::Utc;

use sam_api::Query;
use sam_core::entities::{
    ApprovalProspect, ApprovalSession, AuthUser, Campaign, CampaignProspect, ReplyDraft,
    SendQueueItem, WorkspaceAccount, WorkspaceMember,
};
use sam_core::enums::ProspectStatus;
use sam_core::issues::IssueReport;

use super::{APPROVAL_ROWS_TABLE, DRAFTS_TABLE, LEGACY_MEMBERS_TABLE, MEMBERS_TABLE, OpsService, QUEUE_TABLE};
use crate::checks::CheckOutcome;
use crate::checks::accounts::{ACCOUNTS_TABLE, AccountInput, check_accounts};
use crate::checks::approvals::{SESSIONS_TABLE, check_session_counters, check_stale_pending};
use crate::checks::campaigns::check_stuck;
use crate::checks::drafts::check_stale_drafts;
use crate::checks::membership::{MembershipInput, MembershipTarget, audit_membership};
use crate::checks::queue::{PROSPECTS_TABLE, check_queue};
use crate::error::OpsError;
use crate::launch::CAMPAIGNS_TABLE;

impl OpsService {
    /// Membership audit over every auth user and membership row.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::Api`] if a read fails.
    pub async fn audit_membership(&self, target: &MembershipTarget) -> Result<IssueReport, OpsError> {
        let users = self.db().list_auth_users().await?;
        let members: Vec<WorkspaceMember> = self.db().select_all(MEMBERS_TABLE, &Query::new()).await?;
        let legacy_table_present = self.db().table_exists(LEGACY_MEMBERS_TABLE).await?;
        tracing::debug!(
            users = users.len(),
            members = members.len(),
            legacy_table_present,
            "membership audit loaded"
        );
        Ok(audit_membership(
            MembershipInput {
                users: &users,
                members: &members,
                legacy_table_present,
            },
            target,
        ))
    }

    /// Send-queue consistency for one campaign.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::Core`] when the campaign does not exist, or
    /// [`OpsError::Api`] if a read fails.
    pub async fn check_queue(&self, campaign_id: &str) -> Result<CheckOutcome, OpsError> {
        let campaign = self.campaign(campaign_id).await?;
        let prospects = self.campaign_prospects(&campaign.id, None).await?;
        let queue: Vec<SendQueueItem> = self
            .db()
            .select_all(QUEUE_TABLE, &Query::new().eq("campaign_id", &campaign.id))
            .await?;
        Ok(check_queue(&campaign.id, &prospects, &queue))
    }

    /// Prospects stuck in `pending`, optionally within one workspace.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::Api`] if a read fails.
    pub async fn check_approvals(
        &self,
        workspace_id: Option<&str>,
        stale_days: Option<u32>,
    ) -> Result<CheckOutcome, OpsError> {
        let mut query = Query::new().eq("status", ProspectStatus::Pending.as_str());
        if let Some(workspace_id) = workspace_id {
            query = query.eq("workspace_id", workspace_id);
        }
        let prospects: Vec<CampaignProspect> = self.db().select_all(PROSPECTS_TABLE, &query).await?;

        let campaign_ids: Vec<&str> = prospects
            .iter()
            .map(|p| p.campaign_id.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let campaigns: Vec<Campaign> = self
            .db()
            .select_all_in(CAMPAIGNS_TABLE, &Query::new(), "id", campaign_ids.as_slice())
            .await?;

        let stale_days = stale_days.unwrap_or(self.config().general.stale_pending_days);
        Ok(check_stale_pending(&prospects, &campaigns, Utc::now(), stale_days))
    }

    /// Approval session counters against their rows.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::Api`] if a read fails.
    pub async fn check_sessions(&self, workspace_id: Option<&str>) -> Result<CheckOutcome, OpsError> {
        let mut query = Query::new();
        if let Some(workspace_id) = workspace_id {
            query = query.eq("workspace_id", workspace_id);
        }
        let sessions: Vec<ApprovalSession> = self.db().select_all(SESSIONS_TABLE, &query).await?;
        let ids: Vec<&str> = sessions.iter().map(|s| s.id.as_str()).collect();
        let rows: Vec<ApprovalProspect> = self
            .db()
            .select_all_in(APPROVAL_ROWS_TABLE, &Query::new(), "session_id", ids.as_slice())
            .await?;
        Ok(check_session_counters(&sessions, &rows))
    }

    /// LinkedIn account ownership for one workspace.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::Api`] if Unipile is not configured or a read
    /// fails.
    pub async fn check_accounts(&self, workspace_id: &str) -> Result<CheckOutcome, OpsError> {
        let unipile_accounts = self.clients().unipile()?.list_accounts().await?;
        let by_workspace = Query::new().eq("workspace_id", workspace_id);
        let workspace_accounts: Vec<WorkspaceAccount> =
            self.db().select_all(ACCOUNTS_TABLE, &by_workspace).await?;
        let members: Vec<WorkspaceMember> = self.db().select_all(MEMBERS_TABLE, &by_workspace).await?;
        let campaigns: Vec<Campaign> = self.db().select_all(CAMPAIGNS_TABLE, &by_workspace).await?;

        let member_ids: HashSet<&str> = members.iter().filter_map(|m| m.user_id.as_deref()).collect();
        let member_users: Vec<AuthUser> = self
            .db()
            .list_auth_users()
            .await?
            .into_iter()
            .filter(|user| member_ids.contains(user.id.as_str()))
            .collect();

        Ok(check_accounts(AccountInput {
            unipile_accounts: &unipile_accounts,
            workspace_accounts: &workspace_accounts,
            member_users: &member_users,
            campaigns: &campaigns,
            owners: &self.config().owners,
        }))
    }

    /// Prospects stuck in `queued_in_n8n` for one campaign.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::Core`] when the campaign does not exist, or
    /// [`OpsError::Api`] if a read fails.
    pub async fn check_stuck(&self, campaign_id: &str, hours: Option<u32>) -> Result<CheckOutcome, OpsError> {
        let campaign = self.campaign(campaign_id).await?;
        let prospects = self
            .campaign_prospects(&campaign.id, Some(ProspectStatus::QueuedInN8n))
            .await?;
        let hours = hours.unwrap_or(self.config().general.stuck_queue_hours);
        Ok(check_stuck(&campaign, &prospects, Utc::now(), hours))
    }

    /// Reply drafts waiting for review.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::Api`] if the read fails.
    pub async fn check_drafts(&self, workspace_id: Option<&str>, hours: Option<u32>) -> Result<IssueReport, OpsError> {
        let mut query = Query::new().in_list("status", ["pending_approval", "draft", "pending"]);
        if let Some(workspace_id) = workspace_id {
            query = query.eq("workspace_id", workspace_id);
        }
        let drafts: Vec<ReplyDraft> = self.db().select_all(DRAFTS_TABLE, &query).await?;
        let hours = hours.unwrap_or(self.config().general.stale_draft_hours);
        Ok(check_stale_drafts(&drafts, Utc::now(), hours))
    }

    pub(crate) async fn campaign_prospects(
        &self,
        campaign_id: &str,
        status: Option<ProspectStatus>,
    ) -> Result<Vec<CampaignProspect>, OpsError> {
        let mut query = Query::new().eq("campaign_id", campaign_id);
        if let Some(status) = status {
            query = query.eq("status", status.as_str());
        }
        Ok(self.db().select_all(PROSPECTS_TABLE, &query).await?)
    }
}

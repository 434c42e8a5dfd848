//! Campaign status and batched launch.

use chrono::Utc;

use sam_api::Query;
use sam_core::entities::{Campaign, CampaignProspect, SendQueueItem, WorkspaceAccount};
use sam_core::enums::ProspectStatus;
use sam_core::errors::CoreError;

use super::{OpsService, QUEUE_TABLE};
use crate::checks::accounts::ACCOUNTS_TABLE;
use crate::checks::campaigns::{CampaignHealth, campaign_health};
use crate::checks::queue::PROSPECTS_TABLE;
use crate::error::OpsError;
use crate::launch::{self, CAMPAIGNS_TABLE, LaunchEvent, LaunchPlan, LaunchReport, LaunchSettings};

impl OpsService {
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] (as [`OpsError::Core`]) when no
    /// campaign has `id`.
    pub async fn campaign(&self, id: &str) -> Result<Campaign, OpsError> {
        self.db()
            .select_one(CAMPAIGNS_TABLE, &Query::by_id(id))
            .await?
            .ok_or_else(|| CoreError::not_found("campaign", id).into())
    }

    /// Prospect and queue counts for one campaign.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::Core`] when the campaign does not exist, or
    /// [`OpsError::Api`] if a read fails.
    pub async fn campaign_status(&self, id: &str) -> Result<CampaignHealth, OpsError> {
        let campaign = self.campaign(id).await?;
        let prospects = self.campaign_prospects(&campaign.id, None).await?;
        let queue: Vec<SendQueueItem> = self
            .db()
            .select_all(QUEUE_TABLE, &Query::new().eq("campaign_id", &campaign.id))
            .await?;
        Ok(campaign_health(
            &campaign,
            &prospects,
            &queue,
            Utc::now(),
            self.config().general.stuck_queue_hours,
        ))
    }

    /// Launch settings from configuration, before command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::Config`] when no campaign webhook is configured.
    pub fn launch_settings(&self) -> Result<LaunchSettings, OpsError> {
        Ok(LaunchSettings::from_config(self.config())?)
    }

    /// Load a campaign, its sending account and up to `settings.limit`
    /// pending prospects (oldest first), and plan the batches.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::Core`] when the campaign is missing or cannot be
    /// launched, or [`OpsError::Api`] if a read fails.
    pub async fn plan_launch(&self, campaign_id: &str, settings: &LaunchSettings) -> Result<LaunchPlan, OpsError> {
        let campaign = self.campaign(campaign_id).await?;
        let account: Option<WorkspaceAccount> = match campaign.linkedin_account_id.as_deref() {
            Some(unipile_id) => {
                self.db()
                    .select_one(
                        ACCOUNTS_TABLE,
                        &Query::new()
                            .eq("workspace_id", &campaign.workspace_id)
                            .eq("unipile_account_id", unipile_id),
                    )
                    .await?
            }
            None => None,
        };
        let prospects: Vec<CampaignProspect> = self
            .db()
            .select(
                PROSPECTS_TABLE,
                &Query::new()
                    .eq("campaign_id", &campaign.id)
                    .eq("status", ProspectStatus::Pending.as_str())
                    .order("created_at", true)
                    .limit(settings.limit.max(1)),
            )
            .await?;
        tracing::info!(
            campaign = %campaign.id,
            prospects = prospects.len(),
            account = account.is_some(),
            "launch inputs loaded"
        );
        Ok(launch::plan_launch(
            &campaign,
            account.as_ref(),
            &prospects,
            settings,
            Utc::now().date_naive(),
        )?)
    }

    /// Send a planned launch. A dry run unless `confirm`.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::Api`] when N8N is not configured, or
    /// [`OpsError::Journal`] if the journal cannot be written.
    pub async fn launch_campaign<F>(
        &self,
        plan: &LaunchPlan,
        settings: &LaunchSettings,
        confirm: bool,
        progress: F,
    ) -> Result<LaunchReport, OpsError>
    where
        F: FnMut(&LaunchEvent),
    {
        let n8n = self.clients().n8n()?;
        launch::execute(plan, self.db(), n8n, self.journal(), settings, confirm, progress).await
    }
}

//! Batched campaign launch through the N8N connector webhook.
//!
//! Pending prospects are split into small batches so the workflow engine's
//! concurrent-execution limit is never hit. Each batch is one webhook call
//! carrying the prospects, the campaign's message sequence, follow-up timing,
//! schedule settings and the sending account's remaining daily budget. The
//! sender personalizes and paces on its side; samops only decides who goes
//! out and records that they were handed over.
//!
//! Planning is pure ([`plan_launch`]); [`execute`] performs the calls.

use std::time::Duration;

use chrono::NaiveDate;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{Value, json};

use sam_api::{N8nClient, PostgrestClient, Query};
use sam_config::{ConfigError, SamConfig};
use sam_core::entities::{Campaign, CampaignProspect, MessageTemplates, WorkspaceAccount};
use sam_core::enums::{CampaignStatus, ProspectStatus};
use sam_core::errors::CoreError;
use sam_core::limits::{DailyBudget, daily_budget};
use sam_core::pacing::{DayPattern, Pacer};
use sam_core::personalize::{is_sendable, personalize, unresolved_placeholders};

use crate::checks::queue::PROSPECTS_TABLE;
use crate::error::OpsError;
use crate::journal::{JournalWriter, Outcome};

pub const CAMPAIGNS_TABLE: &str = "campaigns";

/// Knobs for one launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSettings {
    pub batch_size: usize,
    pub batch_delay: Duration,
    /// Most prospects to load.
    pub limit: usize,
    /// Webhook URL or path under the N8N webhook base.
    pub webhook: String,
    pub timezone: String,
    pub default_daily_limit: u32,
}

impl LaunchSettings {
    /// Settings from `[general]` and the N8N campaign webhook.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] when no campaign webhook can be
    /// derived.
    pub fn from_config(config: &SamConfig) -> Result<Self, ConfigError> {
        let webhook = config
            .n8n
            .campaign_webhook()
            .ok_or_else(|| ConfigError::NotConfigured {
                section: "n8n".into(),
                hint: "N8N_CAMPAIGN_WEBHOOK_URL, N8N_WEBHOOK_BASE_URL or N8N_INSTANCE_URL".into(),
            })?;
        Ok(Self {
            batch_size: config.general.batch_size.max(1),
            batch_delay: Duration::from_secs(config.general.batch_delay_secs),
            limit: usize::try_from(config.general.default_limit).unwrap_or(usize::MAX),
            webhook,
            timezone: config.general.timezone.clone(),
            default_daily_limit: config.general.daily_message_limit,
        })
    }
}

// ── Payload ────────────────────────────────────────────────────────

/// One prospect as the connector workflow expects it. Serialized with both
/// camelCase and snake_case keys because workflow nodes read either.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchProspect {
    pub id: String,
    pub campaign_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub linkedin_url: Option<String>,
    pub linkedin_username: Option<String>,
    pub linkedin_user_id: Option<String>,
    pub company_name: Option<String>,
    pub title: Option<String>,
    pub send_delay_minutes: u32,
}

fn entry_pair<M, T>(map: &mut M, camel: &'static str, snake: &'static str, value: &T) -> Result<(), M::Error>
where
    M: SerializeMap,
    T: Serialize + ?Sized,
{
    map.serialize_entry(camel, value)?;
    map.serialize_entry(snake, value)
}

impl Serialize for LaunchProspect {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("prospectId", &self.id)?;
        map.serialize_entry("campaignId", &self.campaign_id)?;
        entry_pair(&mut map, "firstName", "first_name", &self.first_name)?;
        entry_pair(&mut map, "lastName", "last_name", &self.last_name)?;
        entry_pair(&mut map, "linkedinUrl", "linkedin_url", &self.linkedin_url)?;
        entry_pair(&mut map, "linkedinUsername", "linkedin_username", &self.linkedin_username)?;
        entry_pair(&mut map, "linkedinUserId", "linkedin_user_id", &self.linkedin_user_id)?;
        entry_pair(&mut map, "companyName", "company_name", &self.company_name)?;
        map.serialize_entry("title", &self.title)?;
        entry_pair(&mut map, "sendDelayMinutes", "send_delay_minutes", &self.send_delay_minutes)?;
        map.end()
    }
}

/// The campaign's message sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchMessages {
    pub connection_request: String,
    pub follow_ups: [String; 4],
    pub goodbye: String,
    pub alternative: String,
}

impl LaunchMessages {
    #[must_use]
    pub fn from_templates(connection_request: &str, templates: &MessageTemplates) -> Self {
        Self {
            connection_request: connection_request.to_string(),
            follow_ups: [0, 1, 2, 3].map(|n| templates.follow_up(n).to_string()),
            goodbye: templates.follow_up(4).to_string(),
            alternative: templates.alternative().to_string(),
        }
    }
}

impl Serialize for LaunchMessages {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        entry_pair(&mut map, "connectionRequest", "connection_request", &self.connection_request)?;
        map.serialize_entry("cr", &self.connection_request)?;
        for (key, text) in ["follow_up_1", "follow_up_2", "follow_up_3", "follow_up_4"]
            .into_iter()
            .zip(&self.follow_ups)
        {
            map.serialize_entry(key, text)?;
        }
        map.serialize_entry("goodbye_message", &self.goodbye)?;
        map.serialize_entry("alternative_message", &self.alternative)?;
        map.end()
    }
}

/// Days between the steps of the follow-up sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timing {
    pub fu1_delay_days: u32,
    pub fu2_delay_days: u32,
    pub fu3_delay_days: u32,
    pub fu4_delay_days: u32,
    pub gb_delay_days: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            fu1_delay_days: 2,
            fu2_delay_days: 5,
            fu3_delay_days: 7,
            fu4_delay_days: 5,
            gb_delay_days: 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSettings {
    pub timezone: String,
    pub working_hours_start: u8,
    pub working_hours_end: u8,
    pub skip_weekends: bool,
    pub skip_holidays: bool,
}

impl ScheduleSettings {
    #[must_use]
    pub fn new(timezone: &str) -> Self {
        Self {
            timezone: timezone.to_string(),
            working_hours_start: 5,
            working_hours_end: 18,
            skip_weekends: false,
            skip_holidays: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountTracking {
    pub daily_message_limit: u32,
    pub messages_sent_today: u32,
    pub last_message_date: Option<String>,
    pub remaining_today: u32,
}

/// Body of one webhook call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchPayload {
    pub workspace_id: String,
    pub campaign_id: String,
    pub channel: String,
    pub campaign_type: String,
    pub unipile_account_id: String,
    #[serde(rename = "unipile_account_id")]
    pub unipile_account_id_snake: String,
    pub account_tracking: AccountTracking,
    pub schedule_settings: ScheduleSettings,
    pub prospects: Vec<LaunchProspect>,
    pub messages: LaunchMessages,
    pub timing: Timing,
}

impl LaunchPayload {
    #[must_use]
    pub fn prospect_ids(&self) -> Vec<&str> {
        self.prospects.iter().map(|p| p.id.as_str()).collect()
    }
}

// ── Planning ───────────────────────────────────────────────────────

/// A prospect left out of the launch and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedProspect {
    pub id: String,
    pub reason: String,
}

/// Batches ready to post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchPlan {
    pub campaign_id: String,
    pub campaign_name: String,
    pub batches: Vec<LaunchPayload>,
    pub skipped: Vec<SkippedProspect>,
    /// Sendable prospects held back because the daily budget ran out.
    pub deferred: usize,
    pub budget: DailyBudget,
    pub pattern: DayPattern,
}

impl LaunchPlan {
    #[must_use]
    pub fn prospect_count(&self) -> usize {
        self.batches.iter().map(|b| b.prospects.len()).sum()
    }
}

/// Why a prospect cannot be sent, if it cannot.
fn skip_reason(prospect: &CampaignProspect, connection_request: &str) -> Option<String> {
    if prospect.status != ProspectStatus::Pending {
        return Some(format!("status is '{}', not pending", prospect.status));
    }
    if !prospect.has_linkedin_identity() {
        return Some("no LinkedIn profile URL or provider id".into());
    }
    let message = personalize(connection_request, prospect);
    if is_sendable(&message) {
        return None;
    }
    let unresolved = unresolved_placeholders(&message);
    Some(if unresolved.is_empty() {
        "connection request is blank or contains undefined/null".into()
    } else {
        format!("unresolved placeholders: {}", unresolved.join(", "))
    })
}

/// Split sendable prospects into webhook payloads.
///
/// # Errors
///
/// Returns [`CoreError::Validation`] for a campaign that is archived,
/// completed, or has no sending account, and
/// [`CoreError::InvalidTemplate`] when it has no connection request.
pub fn plan_launch(
    campaign: &Campaign,
    account: Option<&WorkspaceAccount>,
    prospects: &[CampaignProspect],
    settings: &LaunchSettings,
    today: NaiveDate,
) -> Result<LaunchPlan, CoreError> {
    if !campaign.status.is_launchable() {
        return Err(CoreError::Validation(format!(
            "campaign {} is {} and cannot be launched",
            campaign.id, campaign.status
        )));
    }
    let unipile_account_id = campaign
        .linkedin_account_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            CoreError::Validation(format!("campaign {} has no LinkedIn account", campaign.id))
        })?;
    let templates = campaign.message_templates.clone().unwrap_or_default();
    let connection_request = templates
        .connection_request()
        .ok_or_else(|| CoreError::InvalidTemplate {
            campaign_id: campaign.id.clone(),
            reason: "message_templates has no connection_request".into(),
        })?
        .to_string();

    let budget = account.map_or(
        DailyBudget {
            limit: settings.default_daily_limit,
            sent_today: 0,
            remaining: settings.default_daily_limit,
        },
        |account| daily_budget(account, today, settings.default_daily_limit),
    );

    let mut skipped = Vec::new();
    let mut sendable = Vec::new();
    for prospect in prospects {
        match skip_reason(prospect, &connection_request) {
            Some(reason) => skipped.push(SkippedProspect {
                id: prospect.id.clone(),
                reason,
            }),
            None => sendable.push(prospect),
        }
    }
    let budget_cap = usize::try_from(budget.remaining).unwrap_or(usize::MAX);
    let deferred = sendable.len().saturating_sub(budget_cap);
    sendable.truncate(budget_cap);

    let pacer = Pacer::new(today, unipile_account_id);
    let messages = LaunchMessages::from_templates(&connection_request, &templates);
    let mut remaining = budget.remaining;
    let batches = sendable
        .chunks(settings.batch_size.max(1))
        .map(|chunk| {
            let payload = LaunchPayload {
                workspace_id: campaign.workspace_id.clone(),
                campaign_id: campaign.id.clone(),
                channel: "linkedin".into(),
                campaign_type: campaign
                    .campaign_type
                    .clone()
                    .unwrap_or_else(|| "connector".into()),
                unipile_account_id: unipile_account_id.to_string(),
                unipile_account_id_snake: unipile_account_id.to_string(),
                account_tracking: AccountTracking {
                    daily_message_limit: budget.limit,
                    messages_sent_today: budget.limit.saturating_sub(remaining),
                    last_message_date: account.and_then(|a| a.last_message_date.clone()),
                    remaining_today: remaining,
                },
                schedule_settings: ScheduleSettings::new(&settings.timezone),
                prospects: chunk
                    .iter()
                    .enumerate()
                    .map(|(index, prospect)| LaunchProspect {
                        id: prospect.id.clone(),
                        campaign_id: campaign.id.clone(),
                        first_name: prospect.first_name.clone(),
                        last_name: prospect.last_name.clone(),
                        linkedin_url: prospect.linkedin_url.clone(),
                        linkedin_username: prospect.linkedin_slug(),
                        linkedin_user_id: prospect.linkedin_user_id.clone(),
                        company_name: prospect.company_name.clone(),
                        title: prospect.title.clone(),
                        send_delay_minutes: pacer.delay_minutes(index),
                    })
                    .collect(),
                messages: messages.clone(),
                timing: Timing::default(),
            };
            remaining = remaining.saturating_sub(u32::try_from(chunk.len()).unwrap_or(u32::MAX));
            payload
        })
        .collect();

    Ok(LaunchPlan {
        campaign_id: campaign.id.clone(),
        campaign_name: campaign.display_name().to_string(),
        batches,
        skipped,
        deferred,
        budget,
        pattern: pacer.pattern(),
    })
}

// ── Execution ──────────────────────────────────────────────────────

/// Per-batch progress notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchEvent {
    BatchQueued { number: usize, total: usize, prospects: usize },
    BatchFailed { number: usize, total: usize, error: String },
    Waiting { seconds: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    pub batch: usize,
    pub prospect_ids: Vec<String>,
    pub error: String,
}

/// What a launch did (or would do, when `dry_run`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LaunchReport {
    pub campaign_id: String,
    pub batches: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub queued: usize,
    pub skipped: Vec<SkippedProspect>,
    pub deferred: usize,
    pub failures: Vec<BatchFailure>,
    pub campaign_activated: bool,
    pub dry_run: bool,
}

/// Post every batch of `plan`, marking each accepted batch `queued_in_n8n`.
///
/// A batch fails when the webhook rejects it or when the status update does
/// not return exactly one row per prospect; later batches still run. The
/// campaign is set `active` once at least one batch is queued. Without
/// `confirm` nothing is sent.
///
/// # Errors
///
/// Only journal write failures abort the launch.
pub async fn execute<F>(
    plan: &LaunchPlan,
    db: &PostgrestClient,
    n8n: &N8nClient,
    journal: &JournalWriter,
    settings: &LaunchSettings,
    confirm: bool,
    mut progress: F,
) -> Result<LaunchReport, OpsError>
where
    F: FnMut(&LaunchEvent),
{
    let mut report = LaunchReport {
        campaign_id: plan.campaign_id.clone(),
        batches: plan.batches.len(),
        skipped: plan.skipped.clone(),
        deferred: plan.deferred,
        dry_run: !confirm,
        ..LaunchReport::default()
    };
    if !confirm {
        tracing::info!(
            campaign = %plan.campaign_id,
            batches = plan.batches.len(),
            prospects = plan.prospect_count(),
            "dry run, no batches sent"
        );
        return Ok(report);
    }

    let total = plan.batches.len();
    for (index, batch) in plan.batches.iter().enumerate() {
        let number = index + 1;
        match send_batch(batch, number, db, n8n, journal, &settings.webhook).await? {
            Ok(queued) => {
                report.succeeded += 1;
                report.queued += queued;
                progress(&LaunchEvent::BatchQueued {
                    number,
                    total,
                    prospects: queued,
                });
            }
            Err(error) => {
                tracing::warn!(campaign = %plan.campaign_id, batch = number, %error, "batch failed");
                report.failed += 1;
                progress(&LaunchEvent::BatchFailed {
                    number,
                    total,
                    error: error.clone(),
                });
                report.failures.push(BatchFailure {
                    batch: number,
                    prospect_ids: batch.prospect_ids().into_iter().map(str::to_string).collect(),
                    error,
                });
            }
        }
        if number < total && !settings.batch_delay.is_zero() {
            progress(&LaunchEvent::Waiting {
                seconds: settings.batch_delay.as_secs(),
            });
            tokio::time::sleep(settings.batch_delay).await;
        }
    }

    if report.succeeded > 0 {
        report.campaign_activated = activate_campaign(&plan.campaign_id, db, journal).await?;
    }
    Ok(report)
}

/// Post one batch and mark it queued. The outer result carries journal
/// failures; the inner one the batch outcome.
async fn send_batch(
    batch: &LaunchPayload,
    number: usize,
    db: &PostgrestClient,
    n8n: &N8nClient,
    journal: &JournalWriter,
    webhook: &str,
) -> Result<Result<usize, String>, OpsError> {
    let ids = batch.prospect_ids();
    let target = format!("batch-{number}");
    let summary = json!({ "prospect_ids": ids });

    if let Err(err) = n8n.trigger_webhook(webhook, batch).await {
        let error = format!("webhook rejected batch: {err}");
        journal.record("webhook", "n8n", &target, summary, Outcome::Failed { error: error.clone() })?;
        return Ok(Err(error));
    }
    journal.record("webhook", "n8n", &target, summary, Outcome::Applied { rows: ids.len() })?;

    let changes = json!({ "status": ProspectStatus::QueuedInN8n.as_str() });
    let query = Query::new().in_list("id", &ids);
    let result = db
        .update::<Value, _>(PROSPECTS_TABLE, &query.select("id"), &changes)
        .await;
    let recorded = json!({ "status": ProspectStatus::QueuedInN8n.as_str(), "ids": ids });
    let outcome = match result {
        Ok(rows) if rows.len() == ids.len() => {
            tracing::info!(table = PROSPECTS_TABLE, batch = number, rows = rows.len(), "batch marked queued_in_n8n");
            Ok(rows.len())
        }
        Ok(rows) => Err(format!(
            "sent to N8N but only {} of {} prospects marked queued",
            rows.len(),
            ids.len()
        )),
        Err(err) => Err(format!("sent to N8N but status update failed: {err}")),
    };
    let journal_outcome = match &outcome {
        Ok(rows) => Outcome::Applied { rows: *rows },
        Err(error) => Outcome::Failed { error: error.clone() },
    };
    journal.record("update", PROSPECTS_TABLE, &target, recorded, journal_outcome)?;
    Ok(outcome)
}

async fn activate_campaign(
    campaign_id: &str,
    db: &PostgrestClient,
    journal: &JournalWriter,
) -> Result<bool, OpsError> {
    let changes = json!({ "status": CampaignStatus::Active.as_str() });
    let result = db
        .update::<Value, _>(CAMPAIGNS_TABLE, &Query::by_id(campaign_id), &changes)
        .await;
    let (activated, outcome) = match result {
        Ok(rows) if !rows.is_empty() => {
            tracing::info!(table = CAMPAIGNS_TABLE, id = campaign_id, "campaign activated");
            (true, Outcome::Applied { rows: rows.len() })
        }
        Ok(_) => (
            false,
            Outcome::Failed {
                error: crate::plan::NO_ROWS_MATCHED.into(),
            },
        ),
        Err(err) => {
            tracing::warn!(campaign = campaign_id, error = %err, "could not activate campaign");
            (false, Outcome::Failed { error: err.to_string() })
        }
    };
    journal.record("update", CAMPAIGNS_TABLE, campaign_id, changes, outcome)?;
    Ok(activated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{account, campaign, prospect};
    use pretty_assertions::assert_eq;

    fn settings(batch_size: usize) -> LaunchSettings {
        LaunchSettings {
            batch_size,
            batch_delay: Duration::ZERO,
            limit: 50,
            webhook: "connector-campaign".into(),
            timezone: "America/Los_Angeles".into(),
            default_daily_limit: 20,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 14).unwrap()
    }

    #[test]
    fn splits_into_batches_with_paced_delays() {
        let c = campaign("cmp-1", CampaignStatus::Draft);
        let prospects: Vec<_> = (1..=5)
            .map(|n| prospect(&format!("p{n}"), ProspectStatus::Pending))
            .collect();
        let plan = plan_launch(&c, None, &prospects, &settings(2), today()).unwrap();

        assert_eq!(plan.batches.len(), 3);
        assert_eq!(plan.prospect_count(), 5);
        assert_eq!(plan.batches[2].prospect_ids(), vec!["p5"]);
        for batch in &plan.batches {
            assert_eq!(batch.prospects[0].send_delay_minutes, 0);
            for p in &batch.prospects[1..] {
                assert!((2..=20).contains(&p.send_delay_minutes));
            }
        }
        assert_eq!(plan.batches[0].account_tracking.remaining_today, 20);
        assert_eq!(plan.batches[1].account_tracking.remaining_today, 18);
        assert_eq!(plan.batches[1].account_tracking.messages_sent_today, 2);
    }

    #[test]
    fn payload_carries_both_key_styles_and_no_credentials() {
        let c = campaign("cmp-1", CampaignStatus::Active);
        let plan = plan_launch(
            &c,
            None,
            &[prospect("ada-l", ProspectStatus::Pending)],
            &settings(5),
            today(),
        )
        .unwrap();
        let value = serde_json::to_value(&plan.batches[0]).unwrap();

        assert_eq!(value["unipileAccountId"], "uni-1");
        assert_eq!(value["unipile_account_id"], "uni-1");
        assert_eq!(value["channel"], "linkedin");
        let p = &value["prospects"][0];
        assert_eq!(p["prospectId"], "ada-l");
        assert_eq!(p["first_name"], "Ada");
        assert_eq!(p["firstName"], "Ada");
        assert_eq!(p["linkedin_username"], "ada-l");
        assert_eq!(p["send_delay_minutes"], 0);
        assert_eq!(value["messages"]["cr"], "Hi {first_name}, saw {company_name}.");
        assert_eq!(value["messages"]["follow_up_2"], "fu2");
        assert_eq!(value["messages"]["follow_up_3"], "");
        assert_eq!(value["messages"]["alternative_message"], "fu1");
        assert_eq!(value["timing"]["fu3DelayDays"], 7);
        assert_eq!(value["timing"]["gbDelayDays"], 7);
        assert_eq!(value["scheduleSettings"]["workingHoursEnd"], 18);

        let raw = value.to_string();
        for secret in ["supabase", "service_key", "api_key", "unipile_dsn"] {
            assert!(!raw.to_lowercase().contains(secret), "payload leaks {secret}");
        }
    }

    #[test]
    fn skips_unsendable_prospects() {
        let mut c = campaign("cmp-1", CampaignStatus::Active);
        c.message_templates.as_mut().unwrap().connection_request =
            Some("Hi {first_name}, loved {product_name}".into());
        let mut no_profile = prospect("nolink", ProspectStatus::Pending);
        no_profile.linkedin_url = None;
        let sent = prospect("sent", ProspectStatus::ConnectionRequestSent);

        let plan = plan_launch(
            &c,
            None,
            &[prospect("p1", ProspectStatus::Pending), no_profile, sent],
            &settings(5),
            today(),
        )
        .unwrap();

        assert!(plan.batches.is_empty());
        let reasons: Vec<_> = plan.skipped.iter().map(|s| s.reason.as_str()).collect();
        assert_eq!(
            reasons,
            vec![
                "unresolved placeholders: product_name",
                "no LinkedIn profile URL or provider id",
                "status is 'connection_request_sent', not pending"
            ]
        );
    }

    #[test]
    fn budget_defers_extra_prospects() {
        let c = campaign("cmp-1", CampaignStatus::Active);
        let mut wa = account("wa-1", "uni-1", None);
        wa.daily_message_limit = Some(10);
        wa.messages_sent_today = Some(8);
        wa.last_message_date = Some("2025-10-14".into());
        let prospects: Vec<_> = (1..=5)
            .map(|n| prospect(&format!("p{n}"), ProspectStatus::Pending))
            .collect();

        let plan = plan_launch(&c, Some(&wa), &prospects, &settings(5), today()).unwrap();
        assert_eq!(plan.prospect_count(), 2);
        assert_eq!(plan.deferred, 3);
        let tracking = &plan.batches[0].account_tracking;
        assert_eq!(tracking.daily_message_limit, 10);
        assert_eq!(tracking.messages_sent_today, 8);
        assert_eq!(tracking.remaining_today, 2);
    }

    #[test]
    fn refuses_archived_or_templateless_campaigns() {
        let archived = campaign("cmp-1", CampaignStatus::Archived);
        assert!(matches!(
            plan_launch(&archived, None, &[], &settings(5), today()),
            Err(CoreError::Validation(_))
        ));

        let mut bare = campaign("cmp-2", CampaignStatus::Active);
        bare.message_templates = None;
        assert!(matches!(
            plan_launch(&bare, None, &[], &settings(5), today()),
            Err(CoreError::InvalidTemplate { .. })
        ));

        let mut no_account = campaign("cmp-3", CampaignStatus::Active);
        no_account.linkedin_account_id = None;
        assert!(matches!(
            plan_launch(&no_account, None, &[], &settings(5), today()),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn settings_require_a_webhook() {
        let mut config = SamConfig::default();
        assert!(LaunchSettings::from_config(&config).is_err());
        config.n8n.instance_url = "https://wf.example.com".into();
        let settings = LaunchSettings::from_config(&config).unwrap();
        assert_eq!(settings.webhook, "https://wf.example.com/webhook/connector-campaign");
        assert_eq!(settings.batch_delay, Duration::from_secs(180));
        assert_eq!(settings.batch_size, 5);
    }
}

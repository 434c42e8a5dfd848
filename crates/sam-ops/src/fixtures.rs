//! Row builders shared by the unit tests.

use chrono::{DateTime, Utc};

use sam_core::entities::{
    Campaign, CampaignProspect, MessageTemplates, SendQueueItem, WorkspaceAccount,
};
use sam_core::enums::{CampaignStatus, ProspectStatus, QueueStatus};

pub fn ts(raw: &str) -> DateTime<Utc> {
    sam_core::entities::timestamp::parse(raw).unwrap()
}

pub fn prospect(id: &str, status: ProspectStatus) -> CampaignProspect {
    CampaignProspect {
        id: id.to_string(),
        campaign_id: "cmp-1".to_string(),
        workspace_id: Some("ws-1".to_string()),
        first_name: Some("Ada".to_string()),
        last_name: Some("Lovelace".to_string()),
        email: None,
        company_name: Some("Analytical Engines".to_string()),
        title: Some("Founder".to_string()),
        linkedin_url: Some(format!("https://www.linkedin.com/in/{id}/")),
        linkedin_user_id: None,
        status,
        error_message: None,
        contacted_at: None,
        created_at: Some(ts("2025-10-01T08:00:00Z")),
        updated_at: None,
    }
}

pub fn queue_item(id: &str, prospect_id: &str, status: QueueStatus) -> SendQueueItem {
    SendQueueItem {
        id: id.to_string(),
        campaign_id: "cmp-1".to_string(),
        prospect_id: prospect_id.to_string(),
        status,
        scheduled_for: None,
        sent_at: None,
        error_message: None,
        created_at: None,
    }
}

pub fn campaign(id: &str, status: CampaignStatus) -> Campaign {
    Campaign {
        id: id.to_string(),
        workspace_id: "ws-1".to_string(),
        name: Some(format!("Campaign {id}")),
        status,
        campaign_type: Some("connector".to_string()),
        linkedin_account_id: Some("uni-1".to_string()),
        message_templates: Some(MessageTemplates {
            connection_request: Some("Hi {first_name}, saw {company_name}.".to_string()),
            follow_up_messages: vec!["fu1".into(), "fu2".into()],
            alternative_message: None,
        }),
        created_at: None,
    }
}

pub fn account(id: &str, unipile_id: &str, user_id: Option<&str>) -> WorkspaceAccount {
    WorkspaceAccount {
        id: id.to_string(),
        workspace_id: "ws-1".to_string(),
        user_id: user_id.map(str::to_string),
        account_type: Some("linkedin".to_string()),
        unipile_account_id: Some(unipile_id.to_string()),
        account_name: None,
        connection_status: Some("connected".to_string()),
        is_active: Some(true),
        daily_message_limit: None,
        messages_sent_today: None,
        last_message_date: None,
    }
}

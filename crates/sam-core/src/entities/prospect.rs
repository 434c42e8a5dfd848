use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;
use crate::enums::ProspectStatus;
use crate::linkedin;

/// A `campaign_prospects` row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CampaignProspect {
    pub id: String,
    pub campaign_id: String,
    pub workspace_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub company_name: Option<String>,
    pub title: Option<String>,
    pub linkedin_url: Option<String>,
    /// LinkedIn provider id (member URN), filled in after the first lookup.
    pub linkedin_user_id: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub status: ProspectStatus,
    pub error_message: Option<String>,
    #[serde(default, deserialize_with = "timestamp::option")]
    pub contacted_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CampaignProspect {
    #[must_use]
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Vanity slug parsed from `linkedin_url`.
    #[must_use]
    pub fn linkedin_slug(&self) -> Option<String> {
        self.linkedin_url.as_deref().and_then(linkedin::vanity_slug)
    }

    /// Whether the sender can address this prospect at all.
    #[must_use]
    pub fn has_linkedin_identity(&self) -> bool {
        self.linkedin_user_id
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty())
            || self.linkedin_slug().is_some()
    }

    /// Most recent activity timestamp (`updated_at`, else `created_at`).
    #[must_use]
    pub fn last_touched(&self) -> Option<DateTime<Utc>> {
        self.updated_at.or(self.created_at)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

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
            created_at: None,
            updated_at: None,
        }
    }
}

//! Unipile messaging API client (LinkedIn accounts, invitations, chats,
//! profiles).

use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::ApiError;
use crate::http::check_response;

const SERVICE: &str = "unipile";

/// Unipile's source status for a healthy connected account.
pub const STATUS_OK: &str = "OK";

// ── Types ──────────────────────────────────────────────────────────

/// A connected provider account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnipileAccount {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Provider, e.g. `LINKEDIN`.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Older payloads report status at the top level.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub sources: Vec<AccountSource>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSource {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl UnipileAccount {
    #[must_use]
    pub fn is_linkedin(&self) -> bool {
        self.kind
            .as_deref()
            .is_some_and(|kind| kind.eq_ignore_ascii_case("linkedin"))
    }

    /// Top-level status, else the first source's status.
    #[must_use]
    pub fn effective_status(&self) -> Option<&str> {
        self.status
            .as_deref()
            .or_else(|| self.sources.iter().find_map(|s| s.status.as_deref()))
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.effective_status()
            .is_some_and(|status| status.eq_ignore_ascii_case(STATUS_OK))
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// A connection request the account has sent and that is still pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentInvitation {
    pub id: String,
    #[serde(default)]
    pub invited_user: Option<String>,
    #[serde(default)]
    pub invited_user_id: Option<String>,
    #[serde(default)]
    pub invited_user_public_id: Option<String>,
    #[serde(default, alias = "sent_at")]
    pub date: Option<String>,
    #[serde(default, alias = "message")]
    pub invitation_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub unread_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    #[serde(default)]
    pub chat_id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub sender_id: Option<String>,
    /// 1 when the connected account sent the message.
    #[serde(default)]
    pub is_sender: Option<u8>,
}

/// A LinkedIn profile as seen from the connected account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnipileProfile {
    #[serde(default)]
    pub provider_id: Option<String>,
    #[serde(default)]
    pub public_identifier: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    /// `FIRST_DEGREE`, `SECOND_DEGREE`, `THIRD_DEGREE`, `OUT_OF_NETWORK`.
    #[serde(default)]
    pub network_distance: Option<String>,
    /// `PENDING` when an invitation is already outstanding.
    #[serde(default)]
    pub invitation_status: Option<String>,
    #[serde(default)]
    pub invitation: Option<ProfileInvitation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileInvitation {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl UnipileProfile {
    #[must_use]
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.trim().to_string();
        }
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[must_use]
    pub fn is_first_degree(&self) -> bool {
        self.network_distance
            .as_deref()
            .is_some_and(|d| d.eq_ignore_ascii_case("FIRST_DEGREE") || d.eq_ignore_ascii_case("DISTANCE_1"))
    }

    /// Invitation status from either payload shape.
    #[must_use]
    pub fn pending_invitation(&self) -> bool {
        self.invitation_status
            .as_deref()
            .or_else(|| self.invitation.as_ref().and_then(|i| i.status.as_deref()))
            .is_some_and(|status| status.eq_ignore_ascii_case("PENDING"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationSent {
    #[serde(default)]
    pub invitation_id: Option<String>,
    #[serde(default)]
    pub object: Option<String>,
}

/// List payloads come as a bare array, `{items: [...]}`, or `{accounts: [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Bare(Vec<T>),
    Items { items: Vec<T> },
    Accounts { accounts: Vec<T> },
}

impl<T> Listing<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Items { items } | Self::Accounts { accounts: items } => items,
        }
    }
}

#[derive(Serialize)]
struct InviteRequest<'a> {
    account_id: &'a str,
    provider_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

// ── Client ─────────────────────────────────────────────────────────

/// HTTP client for one Unipile tenant.
#[derive(Debug, Clone)]
pub struct UnipileClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl UnipileClient {
    /// `base_url` is the API root such as `https://api8.unipile.com:13851/api/v1`.
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&self.api_key)
            .map_err(|_| ApiError::NotConfigured("Unipile API key is not a valid header value".into()))?;
        headers.insert("X-API-KEY", key);
        headers.insert(reqwest::header::ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    async fn get<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T, ApiError> {
        let url = format!("{}/{path_and_query}", self.base_url);
        tracing::debug!(%url, "unipile get");
        let resp = self.http.get(&url).headers(self.headers()?).send().await?;
        let resp = check_response(SERVICE, resp).await?;
        resp.json()
            .await
            .map_err(|e| ApiError::Decode(format!("unipile {path_and_query}: {e}")))
    }

    /// All accounts connected to the tenant.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status, or decode failure.
    pub async fn list_accounts(&self) -> Result<Vec<UnipileAccount>, ApiError> {
        let listing: Listing<UnipileAccount> = self.get("accounts").await?;
        Ok(listing.into_vec())
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Api`] with status 404 for unknown accounts.
    pub async fn get_account(&self, account_id: &str) -> Result<UnipileAccount, ApiError> {
        self.get(&format!("accounts/{}", urlencoding::encode(account_id)))
            .await
    }

    /// Pending connection requests sent from the account.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status, or decode failure.
    pub async fn list_sent_invitations(
        &self,
        account_id: &str,
        limit: usize,
    ) -> Result<Vec<SentInvitation>, ApiError> {
        let listing: Listing<SentInvitation> = self
            .get(&format!(
                "users/invite/sent?account_id={}&limit={limit}",
                urlencoding::encode(account_id)
            ))
            .await?;
        Ok(listing.into_vec())
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status, or decode failure.
    pub async fn list_chats(&self, account_id: &str, limit: usize) -> Result<Vec<Chat>, ApiError> {
        let listing: Listing<Chat> = self
            .get(&format!(
                "chats?account_id={}&limit={limit}",
                urlencoding::encode(account_id)
            ))
            .await?;
        Ok(listing.into_vec())
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status, or decode failure.
    pub async fn list_chat_messages(
        &self,
        chat_id: &str,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, ApiError> {
        let listing: Listing<ChatMessage> = self
            .get(&format!(
                "chats/{}/messages?limit={limit}",
                urlencoding::encode(chat_id)
            ))
            .await?;
        Ok(listing.into_vec())
    }

    /// Look up a profile by vanity slug, provider id, or profile URL.
    ///
    /// Profile URLs are reduced to their vanity slug first.
    ///
    /// # Errors
    ///
    /// Provider errors (not found, cooldowns, limits) come back as
    /// [`ApiError::Api`] with the provider's message.
    pub async fn get_profile(
        &self,
        account_id: &str,
        identifier: &str,
    ) -> Result<UnipileProfile, ApiError> {
        let identifier = if sam_core::linkedin::is_provider_id(identifier) {
            sam_core::linkedin::provider_id_from_urn(identifier)
                .unwrap_or(identifier)
                .trim()
                .to_string()
        } else {
            sam_core::linkedin::vanity_slug(identifier)
                .unwrap_or_else(|| identifier.trim().to_string())
        };
        self.get(&format!(
            "users/{}?account_id={}",
            urlencoding::encode(&identifier),
            urlencoding::encode(account_id)
        ))
        .await
    }

    /// Send a connection request.
    ///
    /// # Errors
    ///
    /// Provider errors come back as [`ApiError::Api`]; classify the message
    /// with [`sam_core::classify::classify`].
    pub async fn send_invitation(
        &self,
        account_id: &str,
        provider_id: &str,
        message: Option<&str>,
    ) -> Result<InvitationSent, ApiError> {
        let url = format!("{}/users/invite", self.base_url);
        tracing::info!(account_id, provider_id, "unipile send invitation");
        let body = InviteRequest {
            account_id,
            provider_id,
            message: message.filter(|m| !m.trim().is_empty()),
        };
        let resp = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await?;
        let resp = check_response(SERVICE, resp).await?;
        resp.json()
            .await
            .map_err(|e| ApiError::Decode(format!("unipile invite: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn listing_accepts_all_shapes() {
        let bare: Listing<Chat> = serde_json::from_str(r#"[{"id":"c1"}]"#).unwrap();
        let items: Listing<Chat> =
            serde_json::from_str(r#"{"object":"ChatList","items":[{"id":"c1"},{"id":"c2"}],"cursor":null}"#)
                .unwrap();
        let accounts: Listing<Chat> = serde_json::from_str(r#"{"accounts":[]}"#).unwrap();
        assert_eq!(bare.into_vec().len(), 1);
        assert_eq!(items.into_vec().len(), 2);
        assert!(accounts.into_vec().is_empty());
    }

    #[test]
    fn account_status_from_sources() {
        let account: UnipileAccount = serde_json::from_str(
            r#"{"id":"a1","name":"𝐂𝐡𝐚𝐫𝐢𝐬𝐬𝐚 Saniel","type":"LINKEDIN","sources":[{"id":"a1_MESSAGING","status":"OK"}]}"#,
        )
        .unwrap();
        assert!(account.is_linkedin());
        assert!(account.is_ok());

        let stale: UnipileAccount =
            serde_json::from_str(r#"{"id":"a2","type":"LINKEDIN","status":"CREDENTIALS"}"#).unwrap();
        assert_eq!(stale.effective_status(), Some("CREDENTIALS"));
        assert!(!stale.is_ok());
        assert_eq!(stale.display_name(), "a2");
    }

    #[test]
    fn profile_flags() {
        let profile: UnipileProfile = serde_json::from_str(
            r#"{"provider_id":"ACoAAB","first_name":"Adam","last_name":"Fry","network_distance":"FIRST_DEGREE","invitation":{"type":"SENT","status":"PENDING"}}"#,
        )
        .unwrap();
        assert_eq!(profile.display_name(), "Adam Fry");
        assert!(profile.is_first_degree());
        assert!(profile.pending_invitation());
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;
use crate::enums::{MemberRole, MemberStatus};

/// A tenant boundary owning campaigns, connected accounts and prospects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Workspace {
    pub id: String,
    pub name: Option<String>,
    pub subdomain: Option<String>,
    #[serde(default, deserialize_with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    pub settings: Option<serde_json::Value>,
}

/// A `workspace_members` row: the primary access-control record.
///
/// Foreign keys are optional because null keys are one of the conditions the
/// membership audit looks for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkspaceMember {
    pub id: String,
    pub workspace_id: Option<String>,
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub role: MemberRole,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub status: MemberStatus,
    #[serde(default, deserialize_with = "timestamp::option")]
    pub joined_at: Option<DateTime<Utc>>,
    pub linkedin_unipile_account_id: Option<String>,
}

/// A user from the auth admin API (`/auth/v1/admin/users`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "timestamp::option")]
    pub email_confirmed_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::option")]
    pub last_sign_in_at: Option<DateTime<Utc>>,
}

impl AuthUser {
    /// Case-insensitive email comparison.
    #[must_use]
    pub fn has_email(&self, email: &str) -> bool {
        self.email
            .as_deref()
            .is_some_and(|own| own.trim().eq_ignore_ascii_case(email.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_with_null_role_and_keys_parses() {
        let member: WorkspaceMember = serde_json::from_str(
            r#"{"id":"m1","workspace_id":null,"user_id":"u1","role":null,"status":"active","joined_at":"2025-10-01T10:00:00+00:00"}"#,
        )
        .unwrap();
        assert!(member.workspace_id.is_none());
        assert!(member.role.is_unknown());
        assert_eq!(member.status, MemberStatus::Active);
        assert!(member.joined_at.is_some());
    }

    #[test]
    fn auth_user_email_match_ignores_case() {
        let user = AuthUser {
            id: "u1".into(),
            email: Some("TL@Example.com".into()),
            email_confirmed_at: None,
            created_at: None,
            last_sign_in_at: None,
        };
        assert!(user.has_email("tl@example.com"));
        assert!(!user.has_email("cl@example.com"));
    }
}

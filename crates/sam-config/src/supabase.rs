//! Supabase (hosted Postgres + PostgREST) configuration.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, mask_secret};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://abcd.supabase.co`.
    #[serde(default)]
    pub url: String,

    /// Service-role key. Bypasses row-level security, so it never leaves this
    /// process except as the `apikey`/`Authorization` headers.
    #[serde(default)]
    pub service_role_key: String,
}

impl SupabaseConfig {
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty() && !self.service_role_key.trim().is_empty()
    }

    /// Fail with a hint naming the variables to set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] when the URL or key is missing.
    pub fn require(&self) -> Result<&Self, ConfigError> {
        if self.is_configured() {
            Ok(self)
        } else {
            Err(ConfigError::not_configured(
                "supabase",
                "SAMOPS_SUPABASE__URL and SAMOPS_SUPABASE__SERVICE_ROLE_KEY, or NEXT_PUBLIC_SUPABASE_URL and SUPABASE_SERVICE_ROLE_KEY",
            ))
        }
    }

    /// Base URL of the PostgREST endpoint, with a trailing slash.
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1/", self.url.trim().trim_end_matches('/'))
    }

    /// Base URL of the GoTrue admin endpoint, with a trailing slash.
    pub fn auth_admin_url(&self) -> String {
        format!("{}/auth/v1/admin/", self.url.trim().trim_end_matches('/'))
    }

    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            url: self.url.clone(),
            service_role_key: mask_secret(&self.service_role_key),
        }
    }
}

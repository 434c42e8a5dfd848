//! N8N workflow engine configuration.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, mask_secret};

fn default_campaign_webhook_path() -> String {
    "connector-campaign".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct N8nConfig {
    /// Instance root, e.g. `https://workflows.example.com`. Used to derive the
    /// API and webhook URLs when those are not set explicitly.
    #[serde(default)]
    pub instance_url: String,

    /// REST API base, e.g. `https://workflows.example.com/api/v1`.
    #[serde(default)]
    pub api_url: String,

    #[serde(default)]
    pub api_key: String,

    /// Webhook base, e.g. `https://workflows.example.com/webhook`.
    #[serde(default)]
    pub webhook_base_url: String,

    /// Path of the connection-request campaign webhook under the webhook base.
    #[serde(default = "default_campaign_webhook_path")]
    pub campaign_webhook_path: String,

    /// Full campaign webhook URL; overrides base + path when set.
    #[serde(default)]
    pub campaign_webhook_url: String,
}

impl Default for N8nConfig {
    fn default() -> Self {
        Self {
            instance_url: String::new(),
            api_url: String::new(),
            api_key: String::new(),
            webhook_base_url: String::new(),
            campaign_webhook_path: default_campaign_webhook_path(),
            campaign_webhook_url: String::new(),
        }
    }
}

fn trimmed(value: &str) -> &str {
    value.trim().trim_end_matches('/')
}

impl N8nConfig {
    /// REST API credentials are present.
    pub fn is_configured(&self) -> bool {
        self.api_base().is_some() && !self.api_key.trim().is_empty()
    }

    /// A campaign webhook can be resolved.
    pub fn has_webhook(&self) -> bool {
        self.campaign_webhook().is_some()
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] when no API URL or key is set.
    pub fn require(&self) -> Result<&Self, ConfigError> {
        if self.is_configured() {
            Ok(self)
        } else {
            Err(ConfigError::not_configured(
                "n8n",
                "SAMOPS_N8N__API_URL and SAMOPS_N8N__API_KEY, or N8N_API_URL and N8N_API_KEY",
            ))
        }
    }

    /// REST API base without a trailing slash.
    pub fn api_base(&self) -> Option<String> {
        let explicit = trimmed(&self.api_url);
        if !explicit.is_empty() {
            return Some(explicit.to_string());
        }
        let instance = trimmed(&self.instance_url);
        (!instance.is_empty()).then(|| format!("{instance}/api/v1"))
    }

    /// Webhook base without a trailing slash.
    pub fn webhook_base(&self) -> Option<String> {
        let explicit = trimmed(&self.webhook_base_url);
        if !explicit.is_empty() {
            return Some(explicit.to_string());
        }
        let instance = trimmed(&self.instance_url);
        if !instance.is_empty() {
            return Some(format!("{instance}/webhook"));
        }
        // Fall back to the API host: `https://host/api/v1` -> `https://host/webhook`.
        let api = trimmed(&self.api_url);
        api.strip_suffix("/api/v1")
            .filter(|host| !host.is_empty())
            .map(|host| format!("{host}/webhook"))
    }

    /// Webhook URL for an arbitrary path.
    pub fn webhook_url(&self, path: &str) -> Option<String> {
        self.webhook_base()
            .map(|base| format!("{base}/{}", path.trim().trim_start_matches('/')))
    }

    /// URL the batched launcher posts to.
    pub fn campaign_webhook(&self) -> Option<String> {
        let explicit = trimmed(&self.campaign_webhook_url);
        if explicit.is_empty() {
            self.webhook_url(&self.campaign_webhook_path)
        } else {
            Some(explicit.to_string())
        }
    }

    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            api_key: mask_secret(&self.api_key),
            ..self.clone()
        }
    }
}

//! # sam-config
//!
//! Layered configuration loading for samops using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SAMOPS_*` prefix, `__` as separator)
//! 2. The environment variables the platform's own scripts use
//!    (`NEXT_PUBLIC_SUPABASE_URL`, `UNIPILE_DSN`, `N8N_API_KEY`, ...)
//! 3. Project-level `.samops/config.toml`
//! 4. User-level `~/.config/samops/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `SAMOPS_SUPABASE__URL` -> `supabase.url`,
//! `SAMOPS_GENERAL__BATCH_SIZE` -> `general.batch_size`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use sam_config::SamConfig;
//!
//! let config = SamConfig::load_with_dotenv().expect("config");
//! if config.supabase.is_configured() {
//!     println!("Supabase: {}", config.supabase.url);
//! }
//! ```

mod error;
mod general;
mod n8n;
mod supabase;
mod unipile;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use n8n::N8nConfig;
pub use sam_core::names::OwnerRule;
pub use supabase::SupabaseConfig;
pub use unipile::UnipileConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project-local config file, relative to the working directory.
pub const PROJECT_CONFIG_PATH: &str = ".samops/config.toml";

/// Script-era variable names and the config keys they feed.
const LEGACY_ENV: &[(&str, &str)] = &[
    ("NEXT_PUBLIC_SUPABASE_URL", "supabase.url"),
    ("SUPABASE_URL", "supabase.url"),
    ("SUPABASE_SERVICE_ROLE_KEY", "supabase.service_role_key"),
    ("UNIPILE_DSN", "unipile.dsn"),
    ("UNIPILE_API_KEY", "unipile.api_key"),
    ("N8N_API_URL", "n8n.api_url"),
    ("N8N_API_BASE_URL", "n8n.api_url"),
    ("N8N_INSTANCE_URL", "n8n.instance_url"),
    ("N8N_BASE_URL", "n8n.instance_url"),
    ("N8N_API_KEY", "n8n.api_key"),
    ("N8N_WEBHOOK_BASE_URL", "n8n.webhook_base_url"),
    ("N8N_CAMPAIGN_WEBHOOK_URL", "n8n.campaign_webhook_url"),
];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SamConfig {
    #[serde(default)]
    pub supabase: SupabaseConfig,
    #[serde(default)]
    pub unipile: UnipileConfig,
    #[serde(default)]
    pub n8n: N8nConfig,
    #[serde(default)]
    pub general: GeneralConfig,
    /// Rules mapping LinkedIn account display names to workspace members.
    #[serde(default)]
    pub owners: Vec<OwnerRule>,
}

impl SamConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT read `.env` files; use [`Self::load_with_dotenv`] for that.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when a source fails to parse or a value
    /// has the wrong type, and [`ConfigError::InvalidValue`] when validation
    /// fails.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load `.env.local` and `.env` from the working directory, then
    /// [`Self::load`]. Variables already set in the process win, and
    /// `.env.local` wins over `.env`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Dotenv`] for an unreadable or malformed dotenv
    /// file, otherwise see [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        load_dotenv_files(Path::new("."))?;
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on
    /// top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(PROJECT_CONFIG_PATH);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment
            .merge(legacy_env())
            .merge(Env::prefixed("SAMOPS_").split("__"))
    }

    /// Path to the user-global config file.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("samops").join("config.toml"))
    }

    /// Reject values no command can work with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.general.batch_size == 0 {
            return Err(ConfigError::invalid("general.batch_size", "must be at least 1"));
        }
        if self.general.timezone.trim().is_empty() {
            return Err(ConfigError::invalid("general.timezone", "must not be empty"));
        }
        check_url("supabase.url", &self.supabase.url)?;
        check_url("n8n.api_url", &self.n8n.api_url)?;
        check_url("n8n.instance_url", &self.n8n.instance_url)?;
        check_url("n8n.webhook_base_url", &self.n8n.webhook_base_url)?;
        for (index, rule) in self.owners.iter().enumerate() {
            if rule.email.trim().is_empty() || rule.tokens.iter().all(|t| t.trim().is_empty()) {
                return Err(ConfigError::invalid(
                    &format!("owners[{index}]"),
                    "needs an email and at least one token",
                ));
            }
        }
        Ok(())
    }

    /// Copy with every secret masked, for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            supabase: self.supabase.redacted(),
            unipile: self.unipile.redacted(),
            n8n: self.n8n.redacted(),
            general: self.general.clone(),
            owners: self.owners.clone(),
        }
    }
}

/// Map the platform scripts' variable names onto config keys.
fn legacy_env() -> Env {
    let names = LEGACY_ENV.iter().map(|(name, _)| *name).collect::<Vec<_>>();
    Env::raw().only(&names).map(|key| {
        LEGACY_ENV
            .iter()
            .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
            .map_or_else(|| key.into(), |(_, target)| (*target).into())
    })
}

/// Load `.env.local` then `.env` from `dir`. Missing files are ignored.
///
/// # Errors
///
/// Returns [`ConfigError::Dotenv`] when a present file cannot be read or
/// parsed.
pub fn load_dotenv_files(dir: &Path) -> Result<(), ConfigError> {
    for name in [".env.local", ".env"] {
        let path = dir.join(name);
        if path.exists() {
            dotenvy::from_path(&path).map_err(|source| ConfigError::Dotenv {
                path: path.display().to_string(),
                source,
            })?;
        }
    }
    Ok(())
}

fn check_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let value = value.trim();
    if value.is_empty() || value.starts_with("https://") || value.starts_with("http://") {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("'{value}' is not an http(s) URL")))
    }
}

/// Mask a secret, keeping the last four characters of long values.
pub fn mask_secret(secret: &str) -> String {
    let chars = secret.chars().count();
    match chars {
        0 => String::new(),
        1..=8 => "****".to_string(),
        _ => {
            let tail = secret.chars().skip(chars - 4).collect::<String>();
            format!("****{tail}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_is_unconfigured_but_valid() {
        let config = SamConfig::default();
        assert!(!config.supabase.is_configured());
        assert!(!config.unipile.is_configured());
        assert!(!config.n8n.is_configured());
        assert!(config.owners.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn masks_secrets() {
        assert_eq!(mask_secret(""), "");
        assert_eq!(mask_secret("short"), "****");
        assert_eq!(mask_secret("eyJhbGciOiJIUzI1NiJ9.abcd"), "****abcd");
    }

    #[test]
    fn redacted_hides_keys_only() {
        let mut config = SamConfig::default();
        config.supabase.url = "https://x.supabase.co".into();
        config.supabase.service_role_key = "service-role-secret".into();
        config.n8n.api_key = "n8n-api-key-123".into();

        let redacted = config.redacted();
        assert_eq!(redacted.supabase.url, "https://x.supabase.co");
        assert_eq!(redacted.supabase.service_role_key, "****cret");
        assert_eq!(redacted.n8n.api_key, "****-123");
    }

    #[test]
    fn validation_rejects_zero_batch_and_bad_urls() {
        let mut config = SamConfig::default();
        config.general.batch_size = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "general.batch_size"
        ));

        let mut config = SamConfig::default();
        config.supabase.url = "abcd.supabase.co".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_rejects_empty_owner_rules() {
        let mut config = SamConfig::default();
        config.owners.push(OwnerRule {
            tokens: vec![String::new()],
            email: "x@example.com".into(),
            name: None,
        });
        assert!(config.validate().is_err());
    }
}

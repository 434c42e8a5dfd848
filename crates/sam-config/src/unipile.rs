//! Unipile messaging API configuration.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, mask_secret};

const API_PATH: &str = "/api/v1";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UnipileConfig {
    /// Host and port of the tenant, e.g. `api8.unipile.com:13851`. A value
    /// with a scheme is used as-is.
    #[serde(default)]
    pub dsn: String,

    #[serde(default)]
    pub api_key: String,
}

impl UnipileConfig {
    pub fn is_configured(&self) -> bool {
        !self.dsn.trim().is_empty() && !self.api_key.trim().is_empty()
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] when the DSN or key is missing.
    pub fn require(&self) -> Result<&Self, ConfigError> {
        if self.is_configured() {
            Ok(self)
        } else {
            Err(ConfigError::not_configured(
                "unipile",
                "SAMOPS_UNIPILE__DSN and SAMOPS_UNIPILE__API_KEY, or UNIPILE_DSN and UNIPILE_API_KEY",
            ))
        }
    }

    /// API base such as `https://api8.unipile.com:13851/api/v1`.
    pub fn base_url(&self) -> String {
        let dsn = self.dsn.trim().trim_end_matches('/');
        let with_scheme = if dsn.contains("://") {
            dsn.to_string()
        } else {
            format!("https://{dsn}")
        };
        if with_scheme.ends_with(API_PATH) {
            with_scheme
        } else {
            format!("{with_scheme}{API_PATH}")
        }
    }

    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            dsn: self.dsn.clone(),
            api_key: mask_secret(&self.api_key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn with_dsn(dsn: &str) -> UnipileConfig {
        UnipileConfig {
            dsn: dsn.into(),
            api_key: "k".into(),
        }
    }

    #[test]
    fn bare_dsn_gets_https() {
        assert_eq!(
            with_dsn("api8.unipile.com:13851").base_url(),
            "https://api8.unipile.com:13851/api/v1"
        );
    }

    #[test]
    fn dsn_with_scheme_is_kept() {
        assert_eq!(
            with_dsn("http://127.0.0.1:4010/").base_url(),
            "http://127.0.0.1:4010/api/v1"
        );
        assert_eq!(
            with_dsn("https://api8.unipile.com:13851/api/v1").base_url(),
            "https://api8.unipile.com:13851/api/v1"
        );
    }
}

//! # sam-api
//!
//! HTTP clients for the three services the SAM platform is built on:
//! - the hosted Postgres REST API (PostgREST), plus the auth admin listing
//! - Unipile (LinkedIn accounts, invitations, chats, profiles)
//! - N8N (executions, workflow definitions, webhooks)
//!
//! All clients share one `reqwest::Client` (30 s timeout, `samops/<version>`
//! user agent) and map failures to [`ApiError`].

pub mod n8n;
pub mod postgrest;
pub mod query;
pub mod unipile;

mod error;
mod http;

pub use error::{ApiError, PG_UNDEFINED_TABLE, PGRST_MISSING_TABLE, PGRST_NO_ROWS};
pub use n8n::N8nClient;
pub use postgrest::PostgrestClient;
pub use query::Query;
pub use unipile::UnipileClient;

use sam_config::SamConfig;

/// The set of clients a command may need. Unipile and N8N are optional so
/// database-only commands work without their credentials.
#[derive(Debug, Clone)]
pub struct ApiClients {
    pub db: PostgrestClient,
    unipile: Option<UnipileClient>,
    n8n: Option<N8nClient>,
}

impl ApiClients {
    /// Build clients from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotConfigured`] when Supabase credentials are
    /// missing, or [`ApiError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &SamConfig) -> Result<Self, ApiError> {
        let supabase = config
            .supabase
            .require()
            .map_err(|e| ApiError::NotConfigured(e.to_string()))?;
        let http = http::build_client()?;

        let db = PostgrestClient::new(
            http.clone(),
            supabase.rest_url(),
            supabase.auth_admin_url(),
            supabase.service_role_key.trim(),
        );

        let unipile = config.unipile.is_configured().then(|| {
            UnipileClient::new(
                http.clone(),
                config.unipile.base_url(),
                config.unipile.api_key.trim(),
            )
        });

        let n8n = (config.n8n.is_configured() || config.n8n.has_webhook()).then(|| {
            N8nClient::new(
                http.clone(),
                config.n8n.api_base(),
                config.n8n.api_key.trim(),
                config.n8n.webhook_base(),
            )
        });

        tracing::debug!(
            unipile = unipile.is_some(),
            n8n = n8n.is_some(),
            "api clients ready"
        );
        Ok(Self { db, unipile, n8n })
    }

    /// Assemble from prebuilt clients.
    #[must_use]
    pub const fn new(db: PostgrestClient, unipile: Option<UnipileClient>, n8n: Option<N8nClient>) -> Self {
        Self { db, unipile, n8n }
    }

    /// # Errors
    ///
    /// Returns [`ApiError::NotConfigured`] when Unipile has no credentials.
    pub fn unipile(&self) -> Result<&UnipileClient, ApiError> {
        self.unipile.as_ref().ok_or_else(|| {
            ApiError::NotConfigured(
                "Unipile is not configured (set UNIPILE_DSN and UNIPILE_API_KEY)".into(),
            )
        })
    }

    /// # Errors
    ///
    /// Returns [`ApiError::NotConfigured`] when N8N has neither API nor
    /// webhook settings.
    pub fn n8n(&self) -> Result<&N8nClient, ApiError> {
        self.n8n.as_ref().ok_or_else(|| {
            ApiError::NotConfigured(
                "N8N is not configured (set N8N_API_URL and N8N_API_KEY, or N8N_INSTANCE_URL)".into(),
            )
        })
    }
}

/// Shared HTTP client with the standard timeout and user agent.
///
/// # Errors
///
/// Returns [`ApiError::Http`] if the TLS backend cannot be initialized.
pub fn http_client() -> Result<reqwest::Client, ApiError> {
    http::build_client()
}

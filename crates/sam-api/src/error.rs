//! API error types.

use thiserror::Error;

/// PostgREST error code for "JSON object requested, multiple (or no) rows
/// returned".
pub const PGRST_NO_ROWS: &str = "PGRST116";
/// PostgREST error code for a table missing from the schema cache.
pub const PGRST_MISSING_TABLE: &str = "PGRST205";
/// Postgres `undefined_table`.
pub const PG_UNDEFINED_TABLE: &str = "42P01";

/// Errors that can occur when talking to the platform's services.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A service returned a non-success status code.
    #[error("{service} API error ({status}): {message}")]
    Api {
        service: &'static str,
        status: u16,
        /// Provider message, or the raw body when it was not JSON.
        message: String,
    },

    /// PostgREST returned a structured error body.
    #[error("PostgREST error {code} ({status}): {message}")]
    Postgrest {
        status: u16,
        code: String,
        message: String,
        details: Option<String>,
        hint: Option<String>,
    },

    /// The service returned 429 Too Many Requests.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Failed to decode a response body.
    #[error("decode error: {0}")]
    Decode(String),

    /// The client for a service was requested but the service has no
    /// credentials configured.
    #[error("{0}")]
    NotConfigured(String),

    /// An update or delete was attempted without any row filter.
    #[error("refusing unfiltered {operation} on '{table}'")]
    UnfilteredMutation {
        operation: &'static str,
        table: String,
    },

    /// A configured base URL cannot be used.
    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// HTTP status, when the error came from a response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Postgrest { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            _ => None,
        }
    }

    /// PostgREST/Postgres error code, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Postgrest { code, .. } => Some(code.as_str()),
            _ => None,
        }
    }

    /// A single-row request matched no rows.
    #[must_use]
    pub fn is_no_rows(&self) -> bool {
        self.code() == Some(PGRST_NO_ROWS)
    }

    /// The table does not exist (or is not exposed).
    #[must_use]
    pub fn is_missing_table(&self) -> bool {
        matches!(self.code(), Some(PG_UNDEFINED_TABLE | PGRST_MISSING_TABLE))
    }

    /// Text suitable for [`sam_core::classify::classify`].
    #[must_use]
    pub fn provider_message(&self) -> String {
        match self {
            Self::Api { message, .. } | Self::Postgrest { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

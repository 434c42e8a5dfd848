//! Cross-cutting error types for samops.
//!
//! Service-specific errors (`ApiError`, `ConfigError`, `OpsError`) live in their
//! own crates. Errors all converge into `anyhow` in `sam-cli`.

use thiserror::Error;

/// Errors that can be raised by core rules.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Row lookup returned no result.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Input failed validation (format, range, unknown value).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Campaign message templates cannot be used to send.
    #[error("Invalid message template for campaign {campaign_id}: {reason}")]
    InvalidTemplate { campaign_id: String, reason: String },
}

impl CoreError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

//! Error types for sam-ops.

use thiserror::Error;

use sam_api::ApiError;
use sam_config::ConfigError;
use sam_core::errors::CoreError;

/// Errors from checks, repairs, and launches.
#[derive(Debug, Error)]
pub enum OpsError {
    /// A remote call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A core rule rejected the input (missing row, bad template).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A required service is not configured.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The mutation journal could not be written.
    #[error("Journal write failed: {0}")]
    Journal(#[from] std::io::Error),

    /// A workflow definition could not be edited as requested.
    #[error("Workflow edit failed: {0}")]
    Workflow(String),
}

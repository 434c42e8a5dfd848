//! Service layer wiring the pure checks to the platform's services.
//!
//! `OpsService` owns the API clients, the loaded configuration and the run's
//! [`JournalWriter`]. Command methods are spread over the submodules as
//! further `impl OpsService` blocks:
//! - `checks`: audits and consistency checks
//! - `campaigns`: campaign status and batched launch
//! - `remote`: Unipile and N8N operations

mod campaigns;
mod checks;
mod remote;

pub use remote::ExecutionListing;

use sam_api::{ApiClients, PostgrestClient};
use sam_config::SamConfig;

use crate::error::OpsError;
use crate::journal::JournalWriter;
use crate::plan::{ApplyOutcome, RepairPlan, apply};

pub(crate) const QUEUE_TABLE: &str = "send_queue";
pub(crate) const MEMBERS_TABLE: &str = "workspace_members";
pub(crate) const LEGACY_MEMBERS_TABLE: &str = "workspace_users";
pub(crate) const APPROVAL_ROWS_TABLE: &str = "prospect_approval_data";
pub(crate) const DRAFTS_TABLE: &str = "reply_agent_drafts";

/// Runs operations against one platform deployment.
///
/// Reads go straight to the clients. Writes go through [`Self::apply`] or the
/// launch, both of which are dry runs unless confirmed and journal every row
/// they touch.
#[derive(Debug, Clone)]
pub struct OpsService {
    clients: ApiClients,
    config: SamConfig,
    journal: JournalWriter,
}

impl OpsService {
    #[must_use]
    pub const fn new(clients: ApiClients, config: SamConfig, journal: JournalWriter) -> Self {
        Self {
            clients,
            config,
            journal,
        }
    }

    /// Build clients from `config` and open a journal under
    /// `general.journal_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::Api`] when Supabase is not configured, or
    /// [`OpsError::Journal`] when the journal directory cannot be created.
    pub fn from_config(config: SamConfig) -> Result<Self, OpsError> {
        let clients = ApiClients::from_config(&config)?;
        let journal = JournalWriter::new(&config.general.journal_dir)?;
        tracing::debug!(run_id = journal.run_id(), "ops service ready");
        Ok(Self::new(clients, config, journal))
    }

    #[must_use]
    pub const fn clients(&self) -> &ApiClients {
        &self.clients
    }

    #[must_use]
    pub const fn db(&self) -> &PostgrestClient {
        &self.clients.db
    }

    #[must_use]
    pub const fn config(&self) -> &SamConfig {
        &self.config
    }

    #[must_use]
    pub const fn journal(&self) -> &JournalWriter {
        &self.journal
    }

    /// Apply a repair plan produced by one of the checks.
    ///
    /// # Errors
    ///
    /// See [`crate::plan::apply`].
    pub async fn apply(&self, plan: &RepairPlan, confirm: bool) -> Result<ApplyOutcome, OpsError> {
        apply(plan, self.db(), &self.journal, confirm).await
    }
}

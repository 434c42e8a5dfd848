use anyhow::Context;
use sam_config::SamConfig;
use sam_ops::OpsService;

/// Shared resources for one invocation.
pub struct AppContext {
    pub service: OpsService,
}

impl AppContext {
    /// Build the API clients and open this run's mutation journal.
    pub fn init(config: SamConfig) -> anyhow::Result<Self> {
        let service = OpsService::from_config(config)
            .context("failed to connect samops to the platform (check supabase.url and supabase.service_role_key)")?;
        tracing::debug!(
            run_id = service.journal().run_id(),
            journal = %service.journal().dir().display(),
            "context ready"
        );
        Ok(Self { service })
    }

    #[must_use]
    pub fn config(&self) -> &SamConfig {
        self.service.config()
    }
}

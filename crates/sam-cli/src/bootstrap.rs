use anyhow::Context;
use sam_config::SamConfig;

/// Load `.env.local`/`.env` from the working directory, then the layered
/// configuration.
pub fn load_config() -> anyhow::Result<SamConfig> {
    SamConfig::load_with_dotenv().context("failed to load samops configuration")
}

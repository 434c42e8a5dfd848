use sam_config::SamConfig;

/// Emit warnings for env vars that look meant for a section that still fell
/// back to defaults.
pub fn warn_unconfigured(config: &SamConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &SamConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();
    let sections = [
        ("Supabase", config.supabase.is_configured(), "SAMOPS_SUPABASE", "SAMOPS_SUPABASE__URL"),
        ("Unipile", config.unipile.is_configured(), "SAMOPS_UNIPILE", "SAMOPS_UNIPILE__DSN"),
        ("N8N", config.n8n.is_configured(), "SAMOPS_N8N", "SAMOPS_N8N__API_KEY"),
    ];

    sections
        .into_iter()
        .filter(|(_, configured, prefix, _)| !configured && has_env_prefix(&env_keys, prefix))
        .map(|(name, _, prefix, example)| {
            format!(
                "{name} config appears default while {prefix}* env vars exist. Use double underscores (example: {example})."
            )
        })
        .collect()
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}

//! Environment precedence tests.
//!
//! Uses `figment::Jail` so env vars and the working directory are sandboxed.

use figment::Jail;
use sam_config::SamConfig;

fn isolate_user_config(jail: &mut Jail) {
    let dir = jail.directory().join("xdg");
    jail.set_env("XDG_CONFIG_HOME", dir.display());
}

#[test]
fn prefixed_env_sets_nested_values() {
    Jail::expect_with(|jail| {
        isolate_user_config(jail);
        jail.set_env("SAMOPS_SUPABASE__URL", "https://env.supabase.co");
        jail.set_env("SAMOPS_SUPABASE__SERVICE_ROLE_KEY", "srk");
        jail.set_env("SAMOPS_GENERAL__BATCH_SIZE", "8");

        let config = SamConfig::load().expect("config loads");
        assert_eq!(config.supabase.url, "https://env.supabase.co");
        assert!(config.supabase.is_configured());
        assert_eq!(config.general.batch_size, 8);
        Ok(())
    });
}

#[test]
fn script_variables_are_understood() {
    Jail::expect_with(|jail| {
        isolate_user_config(jail);
        jail.set_env("NEXT_PUBLIC_SUPABASE_URL", "https://legacy.supabase.co");
        jail.set_env("SUPABASE_SERVICE_ROLE_KEY", "legacy-key");
        jail.set_env("UNIPILE_DSN", "api8.unipile.com:13851");
        jail.set_env("UNIPILE_API_KEY", "uni-key");
        jail.set_env("N8N_API_KEY", "n8n-key");
        jail.set_env("N8N_INSTANCE_URL", "https://workflows.example.com");

        let config = SamConfig::load().expect("config loads");
        assert_eq!(config.supabase.url, "https://legacy.supabase.co");
        assert_eq!(config.supabase.service_role_key, "legacy-key");
        assert_eq!(config.unipile.base_url(), "https://api8.unipile.com:13851/api/v1");
        assert!(config.n8n.is_configured());
        assert_eq!(
            config.n8n.campaign_webhook().as_deref(),
            Some("https://workflows.example.com/webhook/connector-campaign")
        );
        Ok(())
    });
}

#[test]
fn prefixed_env_beats_script_variables() {
    Jail::expect_with(|jail| {
        isolate_user_config(jail);
        jail.set_env("UNIPILE_API_KEY", "from-script-env");
        jail.set_env("SAMOPS_UNIPILE__API_KEY", "from-samops-env");

        let config = SamConfig::load().expect("config loads");
        assert_eq!(config.unipile.api_key, "from-samops-env");
        Ok(())
    });
}

#[test]
fn env_beats_project_file() {
    Jail::expect_with(|jail| {
        isolate_user_config(jail);
        std::fs::create_dir_all(jail.directory().join(".samops")).expect("create dir");
        jail.create_file(
            ".samops/config.toml",
            r#"
[general]
stale_pending_days = 5
stuck_queue_hours = 12
"#,
        )?;
        jail.set_env("SAMOPS_GENERAL__STALE_PENDING_DAYS", "9");

        let config = SamConfig::load().expect("config loads");
        assert_eq!(config.general.stale_pending_days, 9);
        assert_eq!(config.general.stuck_queue_hours, 12);
        Ok(())
    });
}

#[test]
fn invalid_env_value_is_reported() {
    Jail::expect_with(|jail| {
        isolate_user_config(jail);
        jail.set_env("SAMOPS_GENERAL__BATCH_SIZE", "0");
        let err = SamConfig::load().expect_err("zero batch size is invalid");
        assert!(err.to_string().contains("general.batch_size"));
        Ok(())
    });
}

use sam_config::SamConfig;
use serde_json::Value;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ConfigCommands;
use crate::commands::shared::verdict::Verdict;
use crate::output::table::Table;
use crate::output::{cell, output_with};

/// Handle `samops config`.
pub fn handle(action: &ConfigCommands, config: &SamConfig, flags: &GlobalFlags) -> anyhow::Result<Verdict> {
    match action {
        ConfigCommands::Show => {
            let redacted = config.redacted();
            output_with(&redacted, flags.format, |redacted, options| {
                let mut table = Table::new(["key", "value"]);
                for (key, value) in flatten(&serde_json::to_value(redacted)?) {
                    table.row([key, value]);
                }
                Ok(table.render(options))
            })?;
            Ok(Verdict::Pass)
        }
    }
}

/// Dotted keys for every leaf. Arrays stay whole.
fn flatten(value: &Value) -> Vec<(String, String)> {
    let mut out = Vec::new();
    flatten_into(value, String::new(), &mut out);
    out
}

fn flatten_into(value: &Value, prefix: String, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_into(child, path, out);
            }
        }
        Value::String(text) if text.is_empty() => out.push((prefix, String::from("(unset)"))),
        leaf => out.push((prefix, cell(leaf))),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::flatten;

    #[test]
    fn flattens_sections_into_dotted_keys() {
        let rows = flatten(&json!({
            "general": {"batch_size": 5, "timezone": "America/Los_Angeles"},
            "owners": [{"email": "tl@example.com"}],
            "supabase": {"url": "", "service_role_key": "****abcd"}
        }));

        assert_eq!(
            rows,
            vec![
                ("general.batch_size".to_string(), "5".to_string()),
                ("general.timezone".to_string(), "America/Los_Angeles".to_string()),
                ("owners".to_string(), r#"[{"email":"tl@example.com"}]"#.to_string()),
                ("supabase.service_role_key".to_string(), "****abcd".to_string()),
                ("supabase.url".to_string(), "(unset)".to_string()),
            ]
        );
    }
}

use serde_json::Value;

/// Parse a `--value` argument as JSON, falling back to a plain string so
/// `--value webhook` does not need shell-quoted quotes.
#[must_use]
pub fn parse_json_or_string(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod report;
pub mod table;

use table::{Table, TableOptions};

/// Render `value` in the requested format, using the generic table view.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    render_with(value, format, generic_table::<T>)
}

/// Render `value`, with a command-specific view for table output.
pub fn render_with<T, F>(value: &T, format: OutputFormat, table_view: F) -> anyhow::Result<String>
where
    T: Serialize,
    F: FnOnce(&T, TableOptions) -> anyhow::Result<String>,
{
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
        OutputFormat::Table => table_view(value, table_options()),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", render(value, format)?);
    Ok(())
}

/// Print with a command-specific table view.
pub fn output_with<T, F>(value: &T, format: OutputFormat, table_view: F) -> anyhow::Result<()>
where
    T: Serialize,
    F: FnOnce(&T, TableOptions) -> anyhow::Result<String>,
{
    println!("{}", render_with(value, format, table_view)?);
    Ok(())
}

fn table_options() -> TableOptions {
    let prefs = ui::prefs();
    TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

/// Arrays of objects become one column per key (first-seen order), objects
/// become key/value rows, anything else a single cell.
pub fn generic_table<T: Serialize>(value: &T, options: TableOptions) -> anyhow::Result<String> {
    match serde_json::to_value(value)? {
        Value::Array(items) if items.is_empty() => Ok(String::from("(no rows)")),
        Value::Array(items) if items.iter().all(Value::is_object) => {
            let mut headers: Vec<String> = Vec::new();
            for key in items.iter().filter_map(Value::as_object).flat_map(|map| map.keys()) {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
            let mut table = Table::new(headers.iter().map(String::as_str));
            for map in items.iter().filter_map(Value::as_object) {
                table.row(headers.iter().map(|key| map.get(key).map_or_else(|| "-".to_string(), cell)));
            }
            Ok(table.render(options))
        }
        Value::Array(items) => {
            let mut table = Table::new(["value"]);
            for item in &items {
                table.row([cell(item)]);
            }
            Ok(table.render(options))
        }
        Value::Object(map) => {
            let mut table = Table::new(["key", "value"]);
            for (key, value) in &map {
                table.row([key.clone(), cell(value)]);
            }
            Ok(table.render(options))
        }
        scalar => Ok(cell(&scalar)),
    }
}

/// One table cell for a JSON value.
#[must_use]
pub fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

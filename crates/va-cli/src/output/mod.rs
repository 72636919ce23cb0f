use serde::Serialize;
use serde_json::{Map, Value};

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(value, table_options()),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn table_options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

fn render_table<T: Serialize>(value: &T, options: table::TableOptions) -> anyhow::Result<String> {
    let value = serde_json::to_value(value)?;
    Ok(match value {
        Value::Array(items) => render_array_table(&items, options),
        Value::Object(map) => match listing(&map) {
            Some(key) => render_listing(&map, key, options),
            None => render_object_table(map, options),
        },
        scalar => table::render_entity_table(&["value"], &[vec![value_to_cell(&scalar)]], options),
    })
}

/// The single field holding a list of records, as in report and source
/// listings. Responses with zero or several such fields render as key/value.
fn listing(map: &Map<String, Value>) -> Option<&str> {
    let mut lists = map.iter().filter(|(_, value)| {
        value
            .as_array()
            .is_some_and(|items| !items.is_empty() && items.iter().all(Value::is_object))
    });
    let (key, _) = lists.next()?;
    lists.next().is_none().then_some(key.as_str())
}

/// The records as rows, followed by the response's scalar fields.
fn render_listing(map: &Map<String, Value>, key: &str, options: table::TableOptions) -> String {
    let items = map.get(key).and_then(Value::as_array).map_or(&[][..], Vec::as_slice);
    let mut out = render_array_table(items, options);

    let mut footer: Vec<String> = map
        .iter()
        .filter(|(name, value)| name.as_str() != key && !value.is_array() && !value.is_object())
        .map(|(name, value)| format!("{name}: {}", value_to_cell(value)))
        .collect();
    footer.sort();
    if !footer.is_empty() {
        out.push_str("\n\n");
        out.push_str(&footer.join("  "));
    }
    out
}

fn render_object_table(map: Map<String, Value>, options: table::TableOptions) -> String {
    let mut entries = map.into_iter().collect::<Vec<_>>();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    let rows = entries
        .into_iter()
        .map(|(key, value)| vec![key, value_to_cell(&value)])
        .collect::<Vec<_>>();
    table::render_entity_table(&["key", "value"], &rows, options)
}

fn render_array_table(items: &[Value], options: table::TableOptions) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }

    if !items.iter().all(Value::is_object) {
        let rows = items
            .iter()
            .map(|item| vec![value_to_cell(item)])
            .collect::<Vec<_>>();
        return table::render_entity_table(&["value"], &rows, options);
    }

    let mut headers = Vec::<String>::new();
    for map in items.iter().filter_map(Value::as_object) {
        for (key, value) in map {
            // Nested records and long bodies stay in JSON output.
            if value.is_object() || value.is_array() || key == "content" {
                continue;
            }
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    if headers.is_empty() {
        return String::from("(no columns)");
    }

    headers.sort_by_key(|header| (header != "id", header.clone()));

    let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| map.get(header).map_or_else(|| String::from("-"), value_to_cell))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    table::render_entity_table(&header_refs, &rows, options)
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.split_whitespace().collect::<Vec<_>>().join(" "),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

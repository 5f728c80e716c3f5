pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// A result object split into scalar fields and row sets.
///
/// Nested objects are flattened into dotted keys (`shares.consumption`);
/// arrays of objects such as a payment schedule become their own row set.
pub struct Flattened {
    pub fields: Vec<(String, Value)>,
    pub row_sets: Vec<(String, Vec<Value>)>,
}

pub fn flatten(result: &Map<String, Value>) -> Flattened {
    let mut flat = Flattened {
        fields: Vec::new(),
        row_sets: Vec::new(),
    };
    flatten_into("", result, &mut flat);
    flat
}

fn flatten_into(prefix: &str, map: &Map<String, Value>, flat: &mut Flattened) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => flatten_into(&name, inner, flat),
            Value::Array(rows) if rows.first().is_some_and(Value::is_object) => {
                flat.row_sets.push((name, rows.clone()));
            }
            other => flat.fields.push((name, other.clone())),
        }
    }
}

/// Render a scalar for a table cell or CSV field.
pub fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(items) => items.iter().map(cell).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

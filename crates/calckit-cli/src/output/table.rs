use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{cell, flatten};

/// Print the result as a field/value table, followed by one table per
/// row set (schedules, projections) and the envelope's warnings.
pub fn print_table(value: &Value) {
    let envelope = value.as_object();
    match envelope.and_then(|m| m.get("result")) {
        Some(Value::Object(result)) => print_result(result),
        Some(Value::Array(rows)) => print_rows(rows),
        Some(other) => println!("{}", cell(other)),
        None => println!("{}", cell(value)),
    }

    let Some(envelope) = envelope else {
        return;
    };
    print_footer(envelope);
}

fn print_result(result: &Map<String, Value>) {
    let flat = flatten(result);

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in &flat.fields {
        builder.push_record([key.as_str(), &cell(val)]);
    }
    println!("{}", Table::from(builder));

    for (name, rows) in &flat.row_sets {
        println!("\n{}:", name);
        print_rows(rows);
    }
}

fn print_rows(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        for row in rows {
            println!("{}", cell(row));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);
    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(cell).unwrap_or_default())
                .collect();
            builder.push_record(record);
        }
    }
    println!("{}", Table::from(builder));
}

fn print_footer(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

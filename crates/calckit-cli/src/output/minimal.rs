use serde_json::Value;

use super::cell;

/// Headline figure of each calculator, in priority order.
const HEADLINE_KEYS: [&str; 16] = [
    "total_monthly_payment",
    "monthly_payment",
    "monthly_cash_flow",
    "present_value",
    "future_value",
    "roi_percent",
    "answer",
    "final_price",
    "remaining",
    "result",
    "volume",
    "cidr",
    "gdp",
    "mean",
    "numbers",
    "projection",
];

/// Print just the key answer of the output.
///
/// Travel results name their own headline through `solved_for`; otherwise
/// the first present headline key wins, then the first field.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let Value::Object(map) = result else {
        println!("{}", cell(result));
        return;
    };

    if let Some(solved) = map.get("solved_for").and_then(Value::as_str) {
        if let Some(val) = map.get(solved) {
            println!("{}", cell(val));
            return;
        }
    }

    let headline = HEADLINE_KEYS
        .iter()
        .filter_map(|k| map.get(*k))
        .find(|v| !v.is_null());
    match headline {
        Some(Value::Array(rows)) if rows.first().is_some_and(Value::is_object) => {
            // Projections: the last row is the answer
            if let Some(last) = rows.last() {
                println!("{}", cell(last));
            }
        }
        Some(val) => println!("{}", cell(val)),
        None => {
            if let Some((key, val)) = map.iter().next() {
                println!("{}: {}", key, cell(val));
            }
        }
    }
}

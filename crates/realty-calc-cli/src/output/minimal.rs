use serde_json::Value;

use super::render;

/// Key output fields, most specific first.
const PRIORITY_KEYS: [&str; 12] = [
    "balloon_balance",
    "monthly_payment",
    "preferred_offer",
    "preferred_exit_price",
    "monthly_cash_flow",
    "all_met",
    "net_operating_income",
    "best_strategy",
    "estimated_tax",
    "best_cash_on_cash",
    "deleted",
    "exported",
];

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields in priority order, then falls back
/// to the first field of the result object.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_answer(value));
}

fn minimal_answer(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key) {
                if !val.is_null() {
                    return render(val);
                }
            }
        }
        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, render(val));
        }
    }

    render(result_obj)
}

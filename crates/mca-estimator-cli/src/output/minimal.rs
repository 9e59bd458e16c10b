use serde_json::Value;

use super::format_scalar;

/// Key answer fields, searched in the result and then in its `plan`.
const PRIORITY_KEYS: [&str; 4] = ["payment_amount", "factor_rate", "total_payback", "valid"];

/// Print just the headline value from the output.
///
/// For a quote this is the per-period payment with its frequency
/// (e.g. `1411 weekly`); otherwise the first priority field found, then the
/// first field of the result.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(plan) = result_obj.get("plan") {
        if let (Some(amount), Some(freq)) = (plan.get("payment_amount"), plan.get("payment_frequency")) {
            println!("{} {}", format_scalar(amount, "null"), format_scalar(freq, "null"));
            return;
        }
    }

    for scope in [Some(result_obj), result_obj.get("plan")].into_iter().flatten() {
        if let Value::Object(map) = scope {
            for key in PRIORITY_KEYS {
                if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                    println!("{}", format_scalar(val, "null"));
                    return;
                }
            }
        }
    }

    if let Value::Object(map) = result_obj {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_scalar(val, "null"));
            return;
        }
    }

    println!("{}", format_scalar(result_obj, "null"));
}

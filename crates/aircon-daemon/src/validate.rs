//! Command validation and normalization
//!
//! Every rejection here is a `400` with the returned message as `detail`.

use aircon_core::CommandValue;
use serde_json::{json, Value};

use crate::config::LimitsConfig;
use crate::store::Row;

pub const ACTIONS: [&str; 3] = ["set_temp", "set_status", "set_mode"];

/// Trim and lowercase the action, accepting only the three known ones
pub fn validate_action(action: &str) -> Result<&'static str, String> {
    let action = action.trim().to_lowercase();
    ACTIONS
        .iter()
        .find(|a| **a == action)
        .copied()
        .ok_or_else(|| "Invalid action. Use: set_temp | set_status | set_mode".to_string())
}

/// Normalize a value for `action`: temperatures rounded to one decimal
/// inside the limits, status uppercased, mode capitalized.
pub fn normalize_value(
    action: &str,
    value: &CommandValue,
    limits: &LimitsConfig,
) -> Result<CommandValue, String> {
    match action {
        "set_temp" => {
            let v = match value {
                CommandValue::Number(n) => Some(*n),
                CommandValue::Text(s) => s.trim().parse::<f64>().ok(),
            }
            .filter(|v| v.is_finite())
            .ok_or_else(|| "set_temp value must be a number".to_string())?;

            if v < limits.min_set_temp || v > limits.max_set_temp {
                return Err(format!(
                    "Temperature out of allowed range ({}–{})",
                    limits.min_set_temp, limits.max_set_temp
                ));
            }
            Ok(CommandValue::Number((v * 10.0).round() / 10.0))
        }
        "set_status" => {
            let v = value.to_string().trim().to_uppercase();
            if v == "ON" || v == "OFF" {
                Ok(CommandValue::Text(v))
            } else {
                Err("set_status value must be ON or OFF".to_string())
            }
        }
        "set_mode" => {
            let v = capitalize(value.to_string().trim());
            if ["Cooling", "Heating", "Fan"].contains(&v.as_str()) {
                Ok(CommandValue::Text(v))
            } else {
                Err("set_mode value must be Cooling/Heating/Fan".to_string())
            }
        }
        _ => Ok(value.clone()),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Row column an action writes to
pub fn field_for(action: &str) -> &'static str {
    match action {
        "set_temp" => "set_temp",
        "set_status" => "status",
        _ => "mode",
    }
}

pub fn to_json(value: &CommandValue) -> Value {
    match value {
        CommandValue::Number(n) => json!(n),
        CommandValue::Text(s) => json!(s),
    }
}

/// Write the new value and timestamp into `row`, returning the previous value
pub fn apply_to_row(row: &mut Row, action: &str, value: &CommandValue, timestamp: &str) -> Value {
    let field = field_for(action);
    let old = row.get(field).cloned().unwrap_or(Value::String(String::new()));
    row.insert(field.to_string(), to_json(value));
    row.insert("timestamp".to_string(), json!(timestamp));
    old
}

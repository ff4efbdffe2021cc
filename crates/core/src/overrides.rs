//! Caller-supplied parameter overrides for a single job.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::error::CoreError;

/// Parameter name to value. Sorted so serialized records are deterministic.
pub type Overrides = BTreeMap<String, Value>;

/// Clean up overrides coming from a form or API body.
///
/// - String values are trimmed; empty strings are dropped.
/// - Arrays have their string elements trimmed and empty strings removed;
///   an array left empty is dropped.
/// - Null values are dropped.
/// - Everything else is kept as-is.
pub fn normalize(overrides: Overrides) -> Overrides {
    overrides
        .into_iter()
        .filter_map(|(key, value)| normalize_value(value).map(|v| (key, v)))
        .collect()
}

fn normalize_value(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| Value::String(trimmed.to_string()))
        }
        Value::Array(items) => {
            let cleaned: Vec<Value> = items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(_) | Value::Null => normalize_value(item),
                    other => Some(other),
                })
                .collect();
            (!cleaned.is_empty()).then_some(Value::Array(cleaned))
        }
        other => Some(other),
    }
}

/// Environment variable name for an override key: `AGENT_` + the key in
/// upper case with every non-alphanumeric character replaced by `_`.
pub fn env_var_name(key: &str) -> String {
    let mut name = String::with_capacity(key.len() + 6);
    name.push_str("AGENT_");
    for c in key.chars() {
        if c.is_ascii_alphanumeric() {
            name.push(c.to_ascii_uppercase());
        } else {
            name.push('_');
        }
    }
    name
}

/// Reject keys that cannot be exported unambiguously: empty keys, and
/// distinct keys sharing one environment variable name (`max-usd` and
/// `max_usd` are both `AGENT_MAX_USD`).
pub fn check_keys(overrides: &Overrides) -> Result<(), CoreError> {
    let mut names: HashMap<String, &str> = HashMap::with_capacity(overrides.len());
    for key in overrides.keys() {
        if key.trim().is_empty() {
            return Err(CoreError::Validation(
                "Override keys must not be empty".to_string(),
            ));
        }
        if let Some(previous) = names.insert(env_var_name(key), key) {
            return Err(CoreError::Validation(format!(
                "Override keys \"{previous}\" and \"{key}\" both map to {}",
                env_var_name(key)
            )));
        }
    }
    Ok(())
}

/// Environment variable value for an override: strings verbatim, anything
/// else as compact JSON.
pub fn env_var_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

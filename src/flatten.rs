use crate::error::{BleboxError, Result};
use serde_json::Value;
use std::collections::BTreeMap;

/// Flattened device response: dotted key to leaf value, e.g. `device.ip = "192.168.1.2"`
pub type FlatState = BTreeMap<String, Value>;

/// Flatten a JSON object into single-level dotted keys
///
/// Nested objects are joined with `.`, array elements use bracket notation
/// (`relays[0].state`). Empty objects and arrays are kept as leaves.
pub fn flatten(value: &Value) -> Result<FlatState> {
    let obj = value.as_object().ok_or_else(|| {
        BleboxError::InvalidResponse(format!("expected JSON object, got {}", kind(value)))
    })?;

    let mut out = FlatState::new();
    for (key, child) in obj {
        flatten_into(key.clone(), child, &mut out);
    }
    Ok(out)
}

fn flatten_into(path: String, value: &Value, out: &mut FlatState) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                flatten_into(format!("{}.{}", path, key), child, out);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(format!("{}[{}]", path, index), child, out);
            }
        }
        leaf => {
            out.insert(path, leaf.clone());
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

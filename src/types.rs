use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Host object type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    State,
}

/// Value type advertised in an object's common attributes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Number,
    Boolean,
    Mixed,
}

impl ValueType {
    /// Infer the value type from a reported leaf value
    pub fn of(value: &Value) -> Self {
        match value {
            Value::String(_) => ValueType::String,
            Value::Number(_) => ValueType::Number,
            Value::Bool(_) => ValueType::Boolean,
            Value::Null | Value::Array(_) | Value::Object(_) => ValueType::Mixed,
        }
    }
}

/// Common attributes of a host object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommonAttributes {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    pub role: String,
    pub read: bool,
    pub write: bool,
}

/// Object definition written before a state is set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObjectDefinition {
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    pub common: CommonAttributes,
}

/// State value with its acknowledge flag
///
/// `ack = true` marks a value reported by the device, `ack = false` a value
/// written by a user that still has to be applied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct State {
    #[serde(rename = "val")]
    pub value: Value,
    pub ack: bool,
}

/// Notification about a changed or deleted state
#[derive(Debug, Clone, PartialEq)]
pub struct StateChange {
    /// Fully qualified id, e.g. `blebox.0.command.shutterbox.move`
    pub id: String,
    /// New state, `None` if the state was deleted
    pub state: Option<State>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_type_inference() {
        assert_eq!(ValueType::of(&json!("x")), ValueType::String);
        assert_eq!(ValueType::of(&json!(12)), ValueType::Number);
        assert_eq!(ValueType::of(&json!(1.5)), ValueType::Number);
        assert_eq!(ValueType::of(&json!(false)), ValueType::Boolean);
        assert_eq!(ValueType::of(&Value::Null), ValueType::Mixed);
        assert_eq!(ValueType::of(&json!([])), ValueType::Mixed);
    }

    #[test]
    fn test_object_definition_wire_shape() {
        let obj = ObjectDefinition {
            kind: ObjectKind::State,
            common: CommonAttributes {
                name: "IP-Address".to_string(),
                value_type: ValueType::String,
                role: "text".to_string(),
                read: true,
                write: false,
            },
        };
        assert_eq!(
            serde_json::to_value(&obj).unwrap(),
            json!({
                "type": "state",
                "common": {
                    "name": "IP-Address",
                    "type": "string",
                    "role": "text",
                    "read": true,
                    "write": false
                }
            })
        );
    }
}

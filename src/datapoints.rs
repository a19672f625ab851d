//! Static metadata for every state key the device API reports or accepts.

use crate::types::{CommonAttributes, ObjectDefinition, ObjectKind, ValueType};
use serde_json::Value;

/// Metadata of a single state key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Datapoint {
    pub name: &'static str,
    pub role: &'static str,
    pub read: bool,
    pub write: bool,
}

/// Owned metadata returned for keys that may not be in the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Described {
    pub name: String,
    pub role: String,
    pub read: bool,
    pub write: bool,
}

impl Described {
    /// Build the host object definition for a value of this datapoint
    pub fn object_definition(&self, value: &Value) -> ObjectDefinition {
        ObjectDefinition {
            kind: ObjectKind::State,
            common: CommonAttributes {
                name: self.name.clone(),
                value_type: ValueType::of(value),
                role: self.role.clone(),
                read: self.read,
                write: self.write,
            },
        }
    }
}

const fn ro(name: &'static str) -> Datapoint {
    Datapoint {
        name,
        role: "text",
        read: true,
        write: false,
    }
}

const fn rw(name: &'static str) -> Datapoint {
    Datapoint {
        name,
        role: "text",
        read: true,
        write: true,
    }
}

const RELAY_COMMAND: &str = "switch on (on) or off (off) or toggle (tog)";

/// Key to metadata table
pub static DATAPOINTS: &[(&str, Datapoint)] = &[
    ("command.shutterbox.move", rw("move up (u) or down (d) or stop (s)")),
    ("command.shutterbox.favorite", rw("move to favorite-position 1-4")),
    ("command.shutterbox.position", rw("move to position 0-100")),
    ("command.shutterbox.tilt", rw("tilt to 0-100")),
    ("command.switchbox.relay", rw(RELAY_COMMAND)),
    ("command.switchboxD.relays.relay1", rw(RELAY_COMMAND)),
    ("command.switchboxD.relays.relay2", rw(RELAY_COMMAND)),
    ("device.deviceName", ro("Devicename")),
    ("device.type", ro("Type")),
    ("device.fv", ro("Firmwareversion")),
    ("device.hv", ro("Hardwareversion")),
    ("device.apiLevel", ro("ApiLevel")),
    ("device.id", ro("ID")),
    ("device.ip", ro("IP-Address")),
    ("uptimeS", rw("Uptime in seconds")),
    ("settings.deviceName", ro("Device name.")),
    ("settings.statusLed.enabled", ro("Status led enabled (0 - disabled, 1 - enabled)")),
    ("settings.tunnel.enabled", ro("Tunnel enabled (0 - disabled, 1 - enabled)")),
    (
        "settings.shutter.controlType",
        ro("Type of controlled appliance. Where: 1 - segmented shutter, \
            2 - appliance without positioning, 3 - tilt shutter, 4 - window opener, \
            5 - material shutter, 6 - awning, 7 - screen."),
    ),
    (
        "settings.shutter.moveTimeoutMs",
        ro("Max time moving shutter in any direction in milliseconds."),
    ),
    ("settings.shutter.moveDirectionSwap", ro("Move direction swap. Where: 0 - false, 1 - true.")),
    ("settings.shutter.inputsSwap", ro("Inputs swap. Where: 0 - false, 1 - true.")),
    (
        "settings.shutter.calibrationParameters.isCalibrated",
        ro("Information about shutter calibration. Where: 0 - not calibrated, 1 - calibrated."),
    ),
    (
        "settings.shutter.calibrationParameters.maxTiltTimeDownMs",
        ro("Max tilt time down in milliseconds."),
    ),
    (
        "settings.shutter.calibrationParameters.maxTiltTimeUpMs",
        ro("Max tilt time up in milliseconds."),
    ),
    (
        "shutter.state",
        ro("Current shutter state. Where: 0 - Moving down, 1 - Moving up, \
            2 - Manually stopped, 3 - Lower limit, 4 - Upper limit."),
    ),
    (
        "shutter.currentPos.position",
        ro("Current shutter position. Value from 0 to 100 or -1 - unknown."),
    ),
    ("shutter.currentPos.tilt", ro("Current tilt. Value from 0 to 100 or -1 - unknown.")),
    (
        "shutter.desiredPos.position",
        rw("Desired shutter position. Value from 0 to 100 or -1 - unknown."),
    ),
    ("shutter.desiredPos.tilt", ro("Desired tilt. Value from 0 to 100 or -1 - unknown.")),
    (
        "shutter.favPos.position",
        ro("Favorite shutter position. Value from 0 to 100 or -1 - unknown."),
    ),
    ("shutter.favPos.tilt", ro("Favorite tilt. Value from 0 to 100 or -1 - unknown.")),
    ("relays.relay", ro("Relay number")),
    ("relays.state", ro("Relay state (0 - off, 1 - on)")),
];

/// Look up the metadata of a key
///
/// Array indices are ignored, so `relays[1].state` resolves to `relays.state`.
pub fn lookup(key: &str) -> Option<&'static Datapoint> {
    let normalized = strip_indices(key);
    DATAPOINTS
        .iter()
        .find(|(k, _)| *k == normalized)
        .map(|(_, dp)| dp)
}

/// Metadata of a key, falling back to a read-only text datapoint for unknown keys
pub fn describe(key: &str) -> Described {
    match lookup(key) {
        Some(dp) => Described {
            name: dp.name.to_string(),
            role: dp.role.to_string(),
            read: dp.read,
            write: dp.write,
        },
        None => {
            tracing::warn!("No datapoint metadata for {}, registering as read-only text", key);
            Described {
                name: key.to_string(),
                role: "text".to_string(),
                read: true,
                write: false,
            }
        }
    }
}

/// Keys of all command datapoints
pub fn command_keys() -> impl Iterator<Item = &'static str> {
    DATAPOINTS
        .iter()
        .map(|(k, _)| *k)
        .filter(|k| k.starts_with("command."))
}

fn strip_indices(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut in_index = false;
    for c in key.chars() {
        match c {
            '[' => in_index = true,
            ']' => in_index = false,
            _ if !in_index => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keys_unique() {
        let mut keys: Vec<&str> = DATAPOINTS.iter().map(|(k, _)| *k).collect();
        keys.sort_unstable();
        let before = keys.len();
        keys.dedup();
        assert_eq!(before, keys.len());
    }

    #[test]
    fn test_lookup_known() {
        let dp = lookup("device.ip").unwrap();
        assert_eq!(dp.name, "IP-Address");
        assert!(dp.read);
        assert!(!dp.write);

        assert!(lookup("command.shutterbox.move").unwrap().write);
        assert!(lookup("shutter.desiredPos.position").unwrap().write);
    }

    #[test]
    fn test_lookup_ignores_array_indices() {
        assert_eq!(lookup("relays[0].state"), lookup("relays.state"));
        assert!(lookup("relays[12].relay").is_some());
    }

    #[test]
    fn test_describe_unknown_falls_back() {
        let described = describe("device.productFamily");
        assert_eq!(described.name, "device.productFamily");
        assert!(described.read);
        assert!(!described.write);
    }

    #[test]
    fn test_object_definition_uses_value_type() {
        let obj = describe("uptimeS").object_definition(&json!(42));
        assert_eq!(obj.common.value_type, ValueType::Number);
        assert_eq!(obj.common.name, "Uptime in seconds");
        assert!(obj.common.write);
    }

    #[test]
    fn test_command_keys() {
        let keys: Vec<&str> = command_keys().collect();
        assert_eq!(keys.len(), 7);
        assert!(keys.contains(&"command.switchboxD.relays.relay2"));
    }
}

use crate::error::{BleboxError, Result};
use crate::protocol::Endpoint;
use serde_json::Value;

/// Shutter movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Stop,
}

/// Relay action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayAction {
    On,
    Off,
    Toggle,
}

impl RelayAction {
    /// Numeric state used in relay command paths
    fn code(self) -> u8 {
        match self {
            RelayAction::Off => 0,
            RelayAction::On => 1,
            RelayAction::Toggle => 2,
        }
    }
}

/// Command written by a user to one of the `command.*` states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Move the shutter up, down or stop it
    Move(Direction),
    /// Move to favorite position 1-4
    Favorite(u8),
    /// Move to position 0-100
    Position(u8),
    /// Tilt to 0-100
    Tilt(u8),
    /// Switch a relay; `channel` is `None` on single-relay switchBox devices
    Relay {
        channel: Option<u8>,
        action: RelayAction,
    },
}

impl Command {
    /// Parse a command from a namespace-relative state key and its new value
    ///
    /// Returns `Ok(None)` for keys that are not commands and for the empty
    /// placeholder value written at start-up.
    pub fn parse(key: &str, value: &Value) -> Result<Option<Command>> {
        let Some(text) = value_text(value) else {
            return Ok(None);
        };

        let command = match key {
            "command.shutterbox.move" => match text.as_str() {
                "u" => Command::Move(Direction::Up),
                "d" => Command::Move(Direction::Down),
                "s" => Command::Move(Direction::Stop),
                _ => return Err(invalid(key, &text)),
            },
            "command.shutterbox.favorite" => Command::Favorite(ranged(key, &text, 1, 4)?),
            "command.shutterbox.position" => Command::Position(ranged(key, &text, 0, 100)?),
            "command.shutterbox.tilt" => Command::Tilt(ranged(key, &text, 0, 100)?),
            "command.switchbox.relay" => Command::Relay {
                channel: None,
                action: relay_action(key, &text)?,
            },
            "command.switchboxD.relays.relay1" => Command::Relay {
                channel: Some(0),
                action: relay_action(key, &text)?,
            },
            "command.switchboxD.relays.relay2" => Command::Relay {
                channel: Some(1),
                action: relay_action(key, &text)?,
            },
            _ => {
                tracing::warn!("Ignoring write to unknown command state {}", key);
                return Ok(None);
            }
        };

        Ok(Some(command))
    }

    /// Device path this command is sent to
    pub fn path(&self) -> String {
        match self {
            Command::Move(Direction::Up) => Endpoint::SendUp.path().to_string(),
            Command::Move(Direction::Down) => Endpoint::SendDown.path().to_string(),
            Command::Move(Direction::Stop) => Endpoint::SendStop.path().to_string(),
            Command::Favorite(n) => format!("/s/f/{}", n),
            Command::Position(p) => format!("/s/p/{}", p),
            Command::Tilt(t) => format!("/s/t/{}", t),
            Command::Relay { channel: None, action } => format!("/s/{}", action.code()),
            Command::Relay {
                channel: Some(c),
                action,
            } => format!("/s/{}/{}", c, action.code()),
        }
    }
}

/// Textual form of a command value, `None` for null or empty
fn value_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn ranged(key: &str, text: &str, min: i64, max: i64) -> Result<u8> {
    let value: i64 = match text.parse::<i64>() {
        Ok(v) => v,
        // JSON numbers such as 50.0 arrive as floats
        Err(_) => match text.parse::<f64>() {
            Ok(f) if f.fract() == 0.0 => f as i64,
            _ => return Err(invalid(key, text)),
        },
    };
    if value < min || value > max {
        return Err(BleboxError::ValueOutOfRange {
            key: key.to_string(),
            value,
            min,
            max,
        });
    }
    u8::try_from(value).map_err(|_| invalid(key, text))
}

fn relay_action(key: &str, text: &str) -> Result<RelayAction> {
    match text {
        "on" => Ok(RelayAction::On),
        "off" => Ok(RelayAction::Off),
        "tog" => Ok(RelayAction::Toggle),
        _ => Err(invalid(key, text)),
    }
}

fn invalid(key: &str, text: &str) -> BleboxError {
    BleboxError::InvalidCommand {
        key: key.to_string(),
        value: text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(key: &str, value: Value) -> Result<Option<Command>> {
        Command::parse(key, &value)
    }

    #[test]
    fn test_move_commands() {
        assert_eq!(
            parse("command.shutterbox.move", json!("u")).unwrap(),
            Some(Command::Move(Direction::Up))
        );
        assert_eq!(
            parse("command.shutterbox.move", json!("d")).unwrap(),
            Some(Command::Move(Direction::Down))
        );
        assert_eq!(Command::Move(Direction::Up).path(), "/s/u");
        assert_eq!(Command::Move(Direction::Down).path(), "/s/d");
        assert_eq!(Command::Move(Direction::Stop).path(), "/s/s");
    }

    #[test]
    fn test_invalid_move() {
        let err = parse("command.shutterbox.move", json!("x")).unwrap_err();
        assert!(matches!(err, BleboxError::InvalidCommand { value, .. } if value == "x"));
    }

    #[test]
    fn test_placeholder_ignored() {
        assert_eq!(parse("command.shutterbox.move", json!("")).unwrap(), None);
        assert_eq!(parse("command.shutterbox.tilt", Value::Null).unwrap(), None);
    }

    #[test]
    fn test_unknown_key_ignored() {
        assert_eq!(parse("command.shutterbox.spin", json!("u")).unwrap(), None);
    }

    #[test]
    fn test_favorite_range() {
        assert_eq!(
            parse("command.shutterbox.favorite", json!(4)).unwrap(),
            Some(Command::Favorite(4))
        );
        assert!(matches!(
            parse("command.shutterbox.favorite", json!(0)).unwrap_err(),
            BleboxError::ValueOutOfRange { min: 1, max: 4, value: 0, .. }
        ));
        assert!(matches!(
            parse("command.shutterbox.favorite", json!("5")).unwrap_err(),
            BleboxError::ValueOutOfRange { value: 5, .. }
        ));
        assert_eq!(Command::Favorite(2).path(), "/s/f/2");
    }

    #[test]
    fn test_position_and_tilt() {
        assert_eq!(
            parse("command.shutterbox.position", json!("75")).unwrap(),
            Some(Command::Position(75))
        );
        assert_eq!(
            parse("command.shutterbox.tilt", json!(50.0)).unwrap(),
            Some(Command::Tilt(50))
        );
        assert!(parse("command.shutterbox.position", json!(101)).is_err());
        assert!(parse("command.shutterbox.tilt", json!(-1)).is_err());
        assert!(parse("command.shutterbox.tilt", json!("half")).is_err());
        assert!(parse("command.shutterbox.tilt", json!(12.5)).is_err());
        assert_eq!(Command::Position(0).path(), "/s/p/0");
        assert_eq!(Command::Tilt(100).path(), "/s/t/100");
    }

    #[test]
    fn test_relay_commands() {
        assert_eq!(
            parse("command.switchbox.relay", json!("on")).unwrap(),
            Some(Command::Relay { channel: None, action: RelayAction::On })
        );
        let cmd = parse("command.switchboxD.relays.relay2", json!("tog"))
            .unwrap()
            .unwrap();
        assert_eq!(cmd.path(), "/s/1/2");

        let cmd = parse("command.switchboxD.relays.relay1", json!("off"))
            .unwrap()
            .unwrap();
        assert_eq!(cmd.path(), "/s/0/0");

        assert_eq!(
            Command::Relay { channel: None, action: RelayAction::On }.path(),
            "/s/1"
        );
        assert!(parse("command.switchbox.relay", json!("dim")).is_err());
    }
}

use serde::{Deserialize, Serialize};

/// Device API endpoints with a fixed path
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Endpoint {
    DeviceState,
    DeviceUptime,
    SettingsState,
    RelaysState,
    ShutterState,
    SendUp,
    SendDown,
    SendStop,
}

impl Endpoint {
    /// All known endpoints
    pub const ALL: [Endpoint; 8] = [
        Endpoint::DeviceState,
        Endpoint::DeviceUptime,
        Endpoint::SettingsState,
        Endpoint::RelaysState,
        Endpoint::ShutterState,
        Endpoint::SendUp,
        Endpoint::SendDown,
        Endpoint::SendStop,
    ];

    /// Stable endpoint name, e.g. `deviceState`
    pub fn name(self) -> &'static str {
        match self {
            Endpoint::DeviceState => "deviceState",
            Endpoint::DeviceUptime => "deviceUptime",
            Endpoint::SettingsState => "settingsState",
            Endpoint::RelaysState => "relaysState",
            Endpoint::ShutterState => "shutterState",
            Endpoint::SendUp => "sendUp",
            Endpoint::SendDown => "sendDown",
            Endpoint::SendStop => "sendStop",
        }
    }

    /// Look up an endpoint by its name
    pub fn from_name(name: &str) -> Option<Endpoint> {
        Self::ALL.into_iter().find(|e| e.name() == name)
    }

    /// Path on the device, relative to `http://host:port`
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::DeviceState => "/api/device/state",
            Endpoint::DeviceUptime => "/api/device/uptime",
            Endpoint::SettingsState => "/api/settings/state",
            Endpoint::RelaysState => "/api/relay/state",
            Endpoint::ShutterState => "/api/shutter/state",
            Endpoint::SendUp => "/s/u",
            Endpoint::SendDown => "/s/d",
            Endpoint::SendStop => "/s/s",
        }
    }

    /// Whether this endpoint triggers an action instead of reporting state
    pub fn is_command(self) -> bool {
        matches!(
            self,
            Endpoint::SendUp | Endpoint::SendDown | Endpoint::SendStop
        )
    }

    /// State tree prefix for keys reported by this endpoint
    ///
    /// `None` for command endpoints. Uptime keys live at the root, hence `Some("")`.
    pub fn key_prefix(self) -> Option<&'static str> {
        match self {
            Endpoint::DeviceState => Some("device."),
            Endpoint::DeviceUptime => Some(""),
            Endpoint::SettingsState => Some("settings."),
            Endpoint::RelaysState => Some("relays."),
            Endpoint::ShutterState => Some("shutter."),
            Endpoint::SendUp | Endpoint::SendDown | Endpoint::SendStop => None,
        }
    }

    /// Place a reported key under this endpoint's prefix unless it already is
    ///
    /// Older firmware returns bodies without the wrapping object, e.g.
    /// `{"deviceName": ..}` instead of `{"device": {"deviceName": ..}}`.
    /// Array keys such as `relays[0].state` count as already prefixed.
    pub fn qualify(self, key: &str) -> String {
        match self.key_prefix() {
            Some(prefix) if !prefix.is_empty() && !has_prefix(key, prefix) => {
                format!("{}{}", prefix, key)
            }
            _ => key.to_string(),
        }
    }
}

fn has_prefix(key: &str, prefix: &str) -> bool {
    if key.starts_with(prefix) {
        return true;
    }
    let root = prefix.trim_end_matches('.');
    key.strip_prefix(root).is_some_and(|rest| rest.starts_with('['))
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        for endpoint in Endpoint::ALL {
            assert_eq!(Endpoint::from_name(endpoint.name()), Some(endpoint));
        }
        assert_eq!(Endpoint::from_name("sendSideways"), None);
    }

    #[test]
    fn test_paths() {
        assert_eq!(Endpoint::DeviceState.path(), "/api/device/state");
        assert_eq!(Endpoint::DeviceUptime.path(), "/api/device/uptime");
        assert_eq!(Endpoint::SettingsState.path(), "/api/settings/state");
        assert_eq!(Endpoint::SendUp.path(), "/s/u");
        assert_eq!(Endpoint::SendDown.path(), "/s/d");
    }

    #[test]
    fn test_key_prefixes() {
        assert_eq!(Endpoint::DeviceState.key_prefix(), Some("device."));
        assert_eq!(Endpoint::DeviceUptime.key_prefix(), Some(""));
        assert_eq!(Endpoint::SettingsState.key_prefix(), Some("settings."));
        assert_eq!(Endpoint::RelaysState.key_prefix(), Some("relays."));
        assert_eq!(Endpoint::ShutterState.key_prefix(), Some("shutter."));
        assert_eq!(Endpoint::SendUp.key_prefix(), None);
        assert_eq!(Endpoint::SendDown.key_prefix(), None);
        assert_eq!(Endpoint::SendStop.key_prefix(), None);
    }

    #[test]
    fn test_is_command() {
        let commands: Vec<Endpoint> = Endpoint::ALL
            .into_iter()
            .filter(|e| e.is_command())
            .collect();
        assert_eq!(
            commands,
            vec![Endpoint::SendUp, Endpoint::SendDown, Endpoint::SendStop]
        );
    }

    #[test]
    fn test_qualify_wrapped_keys_untouched() {
        assert_eq!(Endpoint::DeviceState.qualify("device.ip"), "device.ip");
        assert_eq!(
            Endpoint::SettingsState.qualify("settings.tunnel.enabled"),
            "settings.tunnel.enabled"
        );
        assert_eq!(
            Endpoint::RelaysState.qualify("relays[0].state"),
            "relays[0].state"
        );
        assert_eq!(
            Endpoint::RelaysState.qualify("relays.state"),
            "relays.state"
        );
        assert_eq!(
            Endpoint::ShutterState.qualify("shutter.currentPos.position"),
            "shutter.currentPos.position"
        );
    }

    #[test]
    fn test_qualify_bare_keys() {
        assert_eq!(Endpoint::DeviceState.qualify("ip"), "device.ip");
        assert_eq!(
            Endpoint::SettingsState.qualify("deviceName"),
            "settings.deviceName"
        );
        assert_eq!(Endpoint::RelaysState.qualify("state"), "relays.state");
        assert_eq!(
            Endpoint::RelaysState.qualify("relaysCount"),
            "relays.relaysCount"
        );
        assert_eq!(Endpoint::ShutterState.qualify("state"), "shutter.state");
        assert_eq!(Endpoint::DeviceUptime.qualify("uptimeS"), "uptimeS");
        assert_eq!(
            Endpoint::SendUp.qualify("shutter.state"),
            "shutter.state"
        );
    }

    #[test]
    fn test_serde_names_match() {
        let json = serde_json::to_string(&Endpoint::SettingsState).unwrap();
        assert_eq!(json, "\"settingsState\"");
    }
}

use crate::error::{BleboxError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Adapter configuration
///
/// Mirrors the instance settings the host platform hands to the adapter.
///
/// ```toml
/// host = "192.168.1.50"
/// port = 80
/// namespace = "blebox.0"
/// uptime_interval_secs = 600
/// request_timeout_secs = 10
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Device host name or IP address
    pub host: String,

    /// Device HTTP port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Namespace of this adapter instance in the host state tree
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Interval between uptime polls in seconds
    #[serde(default = "default_uptime_interval")]
    pub uptime_interval_secs: u64,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_port() -> u16 {
    80
}

fn default_namespace() -> String {
    "blebox.0".to_string()
}

fn default_uptime_interval() -> u64 {
    600
}

fn default_request_timeout() -> u64 {
    10
}

/// Longest accepted uptime poll interval (one day)
pub const MAX_UPTIME_INTERVAL_SECS: u64 = 86_400;

/// Longest accepted request timeout
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

impl AdapterConfig {
    /// Create a configuration for the device at `host:port` with default settings
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            namespace: default_namespace(),
            uptime_interval_secs: default_uptime_interval(),
            request_timeout_secs: default_request_timeout(),
        }
    }

    /// Set the instance namespace
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set the uptime poll interval
    pub fn with_uptime_interval(mut self, secs: u64) -> Self {
        self.uptime_interval_secs = secs;
        self
    }

    /// Set the HTTP request timeout
    pub fn with_request_timeout(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Parse and validate a TOML configuration
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AdapterConfig =
            toml::from_str(content).map_err(|e| BleboxError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Check that the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(BleboxError::Config("host must not be empty".to_string()));
        }
        if self.namespace.trim().is_empty() {
            return Err(BleboxError::Config("namespace must not be empty".to_string()));
        }
        if !(1..=MAX_UPTIME_INTERVAL_SECS).contains(&self.uptime_interval_secs) {
            return Err(BleboxError::Config(format!(
                "uptime_interval_secs must be within 1..={}",
                MAX_UPTIME_INTERVAL_SECS
            )));
        }
        if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&self.request_timeout_secs) {
            return Err(BleboxError::Config(format!(
                "request_timeout_secs must be within 1..={}",
                MAX_REQUEST_TIMEOUT_SECS
            )));
        }
        Ok(())
    }

    /// Base URL of the device API
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Interval between uptime polls
    pub fn uptime_interval(&self) -> Duration {
        Duration::from_secs(self.uptime_interval_secs)
    }

    /// Timeout applied to every device request
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let config = AdapterConfig::from_toml_str(r#"host = "10.0.0.7""#).unwrap();
        assert_eq!(config.port, 80);
        assert_eq!(config.namespace, "blebox.0");
        assert_eq!(config.uptime_interval(), Duration::from_secs(600));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.base_url(), "http://10.0.0.7:80");
    }

    #[test]
    fn test_full_config() {
        let config = AdapterConfig::from_toml_str(
            r#"
            host = "shutter.local"
            port = 8080
            namespace = "blebox.1"
            uptime_interval_secs = 30
            request_timeout_secs = 2
            "#,
        )
        .unwrap();
        assert_eq!(
            config,
            AdapterConfig::new("shutter.local", 8080)
                .with_namespace("blebox.1")
                .with_uptime_interval(30)
                .with_request_timeout(2)
        );
    }

    #[test]
    fn test_missing_host_rejected() {
        let err = AdapterConfig::from_toml_str("port = 80").unwrap_err();
        assert!(matches!(err, BleboxError::Config(_)));
    }

    #[test]
    fn test_empty_host_rejected() {
        let err = AdapterConfig::from_toml_str(r#"host = "  ""#).unwrap_err();
        assert!(matches!(err, BleboxError::Config(_)));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = AdapterConfig::new("10.0.0.7", 80).with_uptime_interval(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_interval_upper_bound() {
        let config =
            AdapterConfig::new("10.0.0.7", 80).with_uptime_interval(MAX_UPTIME_INTERVAL_SECS);
        assert!(config.validate().is_ok());

        let config = config.with_uptime_interval(MAX_UPTIME_INTERVAL_SECS + 1);
        assert!(matches!(config.validate(), Err(BleboxError::Config(_))));

        let config = AdapterConfig::new("10.0.0.7", 80).with_uptime_interval(u64::MAX);
        assert!(matches!(config.validate(), Err(BleboxError::Config(_))));

        let content = "host = \"10.0.0.7\"\nuptime_interval_secs = 86401\n";
        let err = AdapterConfig::from_toml_str(content).unwrap_err();
        assert!(matches!(err, BleboxError::Config(_)));
    }

    #[test]
    fn test_timeout_upper_bound() {
        let config = AdapterConfig::new("10.0.0.7", 80).with_request_timeout(u64::MAX);
        assert!(matches!(config.validate(), Err(BleboxError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blebox.toml");
        std::fs::write(&path, "host = \"10.0.0.9\"\nport = 81\n").unwrap();

        let config = AdapterConfig::load(&path).unwrap();
        assert_eq!(config.base_url(), "http://10.0.0.9:81");
    }
}

use crate::config::AdapterConfig;
use crate::error::{BleboxError, Result};
use crate::flatten::{flatten, FlatState};
use crate::protocol::Endpoint;
use serde_json::Value;
use std::path::Path;

/// HTTP client for the local API of a BleBox device
///
/// Every request is a plain GET to `http://{host}:{port}{path}`; the JSON
/// body is flattened into dotted keys.
///
/// # Example
///
/// ```no_run
/// use blebox_adapter::{AdapterConfig, BleboxClient, Endpoint};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = BleboxClient::new(&AdapterConfig::new("192.168.1.50", 80))?;
///     let states = client.fetch(Endpoint::DeviceState).await?;
///     println!("{:?}", states.get("device.ip"));
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct BleboxClient {
    http: reqwest::Client,
    base_url: String,
}

impl BleboxClient {
    /// Create a client for the device named in `config`
    pub fn new(config: &AdapterConfig) -> Result<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url(),
        })
    }

    /// Base URL of the device API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` and parse the body as JSON
    ///
    /// An empty body yields `Value::Null`; command paths may answer without one.
    pub async fn get_json(&self, path: &str) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        tracing::info!("GET {}", url);

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BleboxError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        tracing::debug!("Body from {}: {}", url, body);

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| {
            BleboxError::InvalidResponse(format!("{} returned invalid JSON: {}", url, e))
        })
    }

    /// GET `path` and flatten the response
    pub async fn fetch_path(&self, path: &str) -> Result<FlatState> {
        let body = self.get_json(path).await?;
        if body.is_null() {
            return Ok(FlatState::new());
        }
        let states = flatten(&body)?;
        tracing::debug!("Flattened {} key(s) from {}", states.len(), path);
        Ok(states)
    }

    /// GET a named endpoint and flatten the response
    pub async fn fetch(&self, endpoint: Endpoint) -> Result<FlatState> {
        tracing::info!("Fetching {} ({})", endpoint, endpoint.path());
        self.fetch_path(endpoint.path()).await
    }
}

/// Read a JSON document from disk and flatten it
///
/// Stands in for a device response when working with recorded mock data.
pub fn load_fixture(path: impl AsRef<Path>) -> Result<FlatState> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let value: Value = serde_json::from_str(&content)?;
    flatten(&value)
}

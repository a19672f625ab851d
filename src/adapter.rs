use crate::client::BleboxClient;
use crate::command::Command;
use crate::config::AdapterConfig;
use crate::datapoints;
use crate::error::{BleboxError, Result};
use crate::flatten::FlatState;
use crate::protocol::Endpoint;
use crate::store::StateStore;
use crate::subscription::StateReceiver;
use crate::types::StateChange;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

const STOP_TIMEOUT: Duration = Duration::from_millis(500);

/// Adapter mirroring one BleBox device into a host state tree
///
/// Device responses are flattened and written key by key; writes to the
/// `command.*` states are translated into device requests.
///
/// # Example
///
/// ```no_run
/// use blebox_adapter::{AdapterConfig, BleboxAdapter, MemoryStore};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = AdapterConfig::new("192.168.1.50", 80);
///     let store = Arc::new(MemoryStore::new(config.namespace.clone()));
///     let adapter = BleboxAdapter::new(config, store.clone())?;
///
///     let mut handle = adapter.start().await?;
///     println!("{:?}", store.get_state("device.deviceName"));
///     handle.stop().await;
///     Ok(())
/// }
/// ```
pub struct BleboxAdapter<S: StateStore> {
    config: Arc<AdapterConfig>,
    client: BleboxClient,
    store: Arc<S>,
}

impl<S: StateStore> Clone for BleboxAdapter<S> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            client: self.client.clone(),
            store: self.store.clone(),
        }
    }
}

impl<S: StateStore + 'static> BleboxAdapter<S> {
    /// Create an adapter for the configured device writing into `store`
    pub fn new(config: AdapterConfig, store: Arc<S>) -> Result<Self> {
        let client = BleboxClient::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            client,
            store,
        })
    }

    /// Get the adapter configuration
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Get the HTTP client talking to the device
    pub fn client(&self) -> &BleboxClient {
        &self.client
    }

    /// Get the host state tree this adapter writes into
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Write flattened key/value pairs into the state tree
    ///
    /// Each key gets its object definition written first, then its value
    /// as an acknowledged state. Returns the number of keys written.
    pub fn update_states(&self, states: &FlatState) -> Result<usize> {
        for (key, value) in states {
            tracing::debug!("updateStates: {} = {}", key, value);
            let object = datapoints::describe(key).object_definition(value);
            self.store.set_object(key, object)?;
            self.store.set_state(key, value.clone(), true)?;
        }
        Ok(states.len())
    }

    /// Fetch a state endpoint and mirror its keys
    ///
    /// Command endpoints are rejected without contacting the device; use
    /// `send_command` to trigger an action.
    pub async fn sync(&self, endpoint: Endpoint) -> Result<usize> {
        if endpoint.is_command() {
            return Err(BleboxError::InvalidCommand {
                key: endpoint.name().to_string(),
                value: endpoint.path().to_string(),
            });
        }
        let states = self.client.fetch(endpoint).await?;
        let qualified: FlatState = states
            .into_iter()
            .map(|(key, value)| (endpoint.qualify(&key), value))
            .collect();
        let count = self.update_states(&qualified)?;
        tracing::info!("Synced {} key(s) from {}", count, endpoint);
        Ok(count)
    }

    /// Mirror `/api/device/state` under `device.`
    pub async fn sync_device_state(&self) -> Result<usize> {
        self.sync(Endpoint::DeviceState).await
    }

    /// Mirror `/api/device/uptime` (`uptimeS`)
    pub async fn sync_uptime(&self) -> Result<usize> {
        self.sync(Endpoint::DeviceUptime).await
    }

    /// Mirror `/api/settings/state` under `settings.`
    pub async fn sync_settings(&self) -> Result<usize> {
        self.sync(Endpoint::SettingsState).await
    }

    /// Create the command states with empty placeholder values
    pub fn init_commands(&self) -> Result<usize> {
        let placeholders: FlatState = datapoints::command_keys()
            .map(|key| (key.to_string(), Value::String(String::new())))
            .collect();
        self.update_states(&placeholders)
    }

    /// Start-up sequence: subscribe to commands, create command states and
    /// pull uptime, settings and device state
    ///
    /// A failing sync is logged and does not stop the remaining steps.
    pub async fn on_ready(&self) -> Result<StateReceiver> {
        tracing::info!("config host: {}", self.config.host);
        tracing::info!("config port: {}", self.config.port);

        let commands = self.store.subscribe_states("command.*")?;

        if let Err(e) = self.sync_uptime().await {
            tracing::error!("Failed to sync uptime: {}", e);
        }
        self.init_commands()?;
        if let Err(e) = self.sync_settings().await {
            tracing::error!("Failed to sync settings: {}", e);
        }
        if let Err(e) = self.sync_device_state().await {
            tracing::error!("Failed to sync device state: {}", e);
        }

        Ok(commands)
    }

    /// Send a command to the device and mirror any state it answers with
    pub async fn send_command(&self, command: &Command) -> Result<()> {
        tracing::info!("Sending {:?} via {}", command, command.path());
        let states = self.client.fetch_path(&command.path()).await?;
        self.update_states(&states)?;
        Ok(())
    }

    /// React to a change of a subscribed state
    ///
    /// Acknowledged values and states outside this instance's namespace are
    /// ignored. A dispatched command is acknowledged by re-writing its value
    /// with `ack = true`.
    pub async fn handle_state_change(&self, change: &StateChange) -> Result<()> {
        let Some(state) = &change.state else {
            tracing::info!("state {} deleted", change.id);
            return Ok(());
        };
        tracing::info!(
            "state {} changed: {} (ack = {})",
            change.id,
            state.value,
            state.ack
        );

        if state.ack {
            return Ok(());
        }

        let Some(key) = change
            .id
            .strip_prefix(self.store.namespace())
            .and_then(|rest| rest.strip_prefix('.'))
        else {
            tracing::debug!(
                "Ignoring state {} outside of {}",
                change.id,
                self.store.namespace()
            );
            return Ok(());
        };

        let Some(command) = Command::parse(key, &state.value)? else {
            return Ok(());
        };

        self.send_command(&command).await?;
        self.store.set_state(key, state.value.clone(), true)?;
        Ok(())
    }

    /// Run the start-up sequence and spawn the uptime timer and command listener
    pub async fn start(&self) -> Result<AdapterHandle> {
        let period = self.config.uptime_interval();
        let first_poll = first_tick(Instant::now(), period)?;
        let mut commands = self.on_ready().await?;

        let (stop_tx, _) = broadcast::channel(1);
        let mut tasks = Vec::with_capacity(2);

        let adapter = self.clone();
        let mut stop_rx = stop_tx.subscribe();
        tasks.push(tokio::spawn(async move {
            let mut ticker = interval_at(first_poll, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = stop_rx.recv() => break,
                    _ = ticker.tick() => {
                        if let Err(e) = adapter.sync_uptime().await {
                            tracing::error!("Uptime poll failed: {}", e);
                        }
                    }
                }
            }
            tracing::debug!("Uptime timer stopped");
        }));

        let adapter = self.clone();
        let mut stop_rx = stop_tx.subscribe();
        tasks.push(tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = stop_rx.recv() => break,
                    change = commands.recv() => {
                        match change {
                            Ok(change) => {
                                if let Err(e) = adapter.handle_state_change(&change).await {
                                    tracing::warn!("Command {} failed: {}", change.id, e);
                                }
                            }
                            Err(BleboxError::ChannelClosed) => {
                                tracing::info!("State change channel closed");
                                break;
                            }
                            Err(e) => tracing::warn!("State change receive error: {}", e),
                        }
                    }
                }
            }
            tracing::debug!("Command listener stopped");
        }));

        Ok(AdapterHandle {
            stop_tx: Some(stop_tx),
            tasks,
        })
    }
}

/// First uptime poll, one period after `now`
fn first_tick(now: Instant, period: Duration) -> Result<Instant> {
    now.checked_add(period).ok_or_else(|| {
        BleboxError::Config(format!("uptime interval {:?} is out of range", period))
    })
}

/// Handle to the background tasks of a started adapter
pub struct AdapterHandle {
    stop_tx: Option<broadcast::Sender<()>>,
    tasks: Vec<JoinHandle<()>>,
}

impl AdapterHandle {
    /// Whether the background tasks are still running
    pub fn is_running(&self) -> bool {
        self.stop_tx.is_some() && self.tasks.iter().any(|t| !t.is_finished())
    }

    /// Stop the background tasks (adapter unload)
    pub async fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        for handle in self.tasks.drain(..) {
            // Give it a moment to stop gracefully
            let _ = tokio::time::timeout(STOP_TIMEOUT, handle).await;
        }
        tracing::info!("cleaned everything up...");
    }
}

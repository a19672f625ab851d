//! Mirror a BleBox device into an in-memory state tree and print it.
//!
//! ```text
//! cargo run --example poll -- demos/blebox.toml [move u|d|s]
//! ```

use blebox_adapter::{AdapterConfig, BleboxAdapter, MemoryStore, StateStore};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| "demos/blebox.toml".to_string());
    let config = AdapterConfig::load(&config_path)?;

    let store = Arc::new(MemoryStore::new(config.namespace.clone()));
    let adapter = BleboxAdapter::new(config, store.clone())?;
    let mut handle = adapter.start().await?;

    if let (Some(verb), Some(value)) = (args.next(), args.next()) {
        if verb == "move" {
            store.set_state("command.shutterbox.move", value.into(), false)?;
            tokio::time::sleep(Duration::from_secs(2)).await;
        }
    }

    for (key, state) in store.states() {
        let name = store
            .get_object(&key)
            .map(|o| o.common.name)
            .unwrap_or_default();
        println!(
            "{} = {} (ack = {}) # {}",
            store.qualified_id(&key),
            state.value,
            state.ack,
            name
        );
    }

    handle.stop().await;
    Ok(())
}

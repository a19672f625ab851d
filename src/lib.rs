//! Rust adapter for BleBox shutterBox and switchBox devices
//!
//! This library polls the local REST API of a BleBox device and mirrors the
//! reported values into the object/state tree of a home-automation host.
//! Writes to the adapter's `command.*` states are forwarded to the device.
//! It supports:
//!
//! - Flattening device responses into dotted keys (`device.ip`, `relays[0].state`)
//! - Object metadata for every known key of the device API
//! - Shutter move, favorite, position and tilt commands
//! - Single and dual relay switch commands
//! - Periodic uptime polling
//!
//! # Quick Start
//!
//! ```no_run
//! use blebox_adapter::{AdapterConfig, BleboxAdapter, MemoryStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AdapterConfig::new("192.168.1.50", 80);
//!     let store = Arc::new(MemoryStore::new(config.namespace.clone()));
//!     let adapter = BleboxAdapter::new(config, store.clone())?;
//!
//!     // Pull device state and start listening for commands
//!     let mut handle = adapter.start().await?;
//!
//!     // A user moves the shutter up
//!     use blebox_adapter::StateStore;
//!     store.set_state("command.shutterbox.move", "u".into(), false)?;
//!
//!     tokio::time::sleep(std::time::Duration::from_secs(1)).await;
//!     handle.stop().await;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **Client**: HTTP GET and flattening of device responses
//! - **Protocol**: Endpoint name to path table
//! - **Datapoints**: Key to object metadata table
//! - **Command**: Parsing of command writes and their device paths
//! - **Store**: Seam to the host state tree, with an in-memory implementation
//! - **Adapter**: State sync, command routing and the uptime timer

mod adapter;
mod client;
mod command;
mod config;
pub mod datapoints;
mod error;
mod flatten;
mod protocol;
mod store;
mod subscription;
mod types;

// Public exports
pub use adapter::{AdapterHandle, BleboxAdapter};
pub use client::{load_fixture, BleboxClient};
pub use command::{Command, Direction, RelayAction};
pub use config::AdapterConfig;
pub use datapoints::{Datapoint, Described};
pub use error::{BleboxError, Result};
pub use flatten::{flatten, FlatState};
pub use protocol::Endpoint;
pub use store::{MemoryStore, StateStore};
pub use subscription::{pattern_matches, StateReceiver};
pub use types::{CommonAttributes, ObjectDefinition, ObjectKind, State, StateChange, ValueType};

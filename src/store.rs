//! Seam to the host platform's object/state tree.

use crate::error::{BleboxError, Result};
use crate::subscription::StateReceiver;
use crate::types::{ObjectDefinition, State, StateChange};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Mutex;
use tokio::sync::broadcast;

/// Object/state tree of the host platform
///
/// Ids passed to `set_object` and `set_state` are relative to `namespace()`;
/// patterns and ids of `StateChange`s are fully qualified.
pub trait StateStore: Send + Sync {
    /// Namespace of this adapter instance, e.g. `blebox.0`
    fn namespace(&self) -> &str;

    /// Create or replace an object definition
    fn set_object(&self, id: &str, object: ObjectDefinition) -> Result<()>;

    /// Write a state value
    fn set_state(&self, id: &str, value: Value, ack: bool) -> Result<()>;

    /// Subscribe to changes of states matching `pattern` (relative, optional trailing `*`)
    fn subscribe_states(&self, pattern: &str) -> Result<StateReceiver>;

    /// Fully qualified id of a relative id
    fn qualified_id(&self, id: &str) -> String {
        format!("{}.{}", self.namespace(), id)
    }
}

/// In-memory state tree
///
/// Every `set_state` and `delete_state` is published to subscribers.
pub struct MemoryStore {
    namespace: String,
    objects: Mutex<BTreeMap<String, ObjectDefinition>>,
    states: Mutex<BTreeMap<String, State>>,
    change_tx: broadcast::Sender<StateChange>,
}

impl MemoryStore {
    /// Create an empty store for the given namespace
    pub fn new(namespace: impl Into<String>) -> Self {
        let (change_tx, _) = broadcast::channel(100);
        Self {
            namespace: namespace.into(),
            objects: Mutex::new(BTreeMap::new()),
            states: Mutex::new(BTreeMap::new()),
            change_tx,
        }
    }

    /// Read a state by relative id
    pub fn get_state(&self, id: &str) -> Option<State> {
        self.states.lock().ok()?.get(id).cloned()
    }

    /// Read an object definition by relative id
    pub fn get_object(&self, id: &str) -> Option<ObjectDefinition> {
        self.objects.lock().ok()?.get(id).cloned()
    }

    /// Snapshot of all states
    pub fn states(&self) -> BTreeMap<String, State> {
        self.states
            .lock()
            .map(|states| states.clone())
            .unwrap_or_default()
    }

    /// Remove a state and notify subscribers
    pub fn delete_state(&self, id: &str) -> Result<()> {
        let removed = self.lock_states()?.remove(id);
        if removed.is_some() {
            let _ = self.change_tx.send(StateChange {
                id: self.qualified_id(id),
                state: None,
            });
        }
        Ok(())
    }

    fn lock_states(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, State>>> {
        self.states
            .lock()
            .map_err(|_| BleboxError::Store("state map poisoned".to_string()))
    }
}

impl StateStore for MemoryStore {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn set_object(&self, id: &str, object: ObjectDefinition) -> Result<()> {
        self.objects
            .lock()
            .map_err(|_| BleboxError::Store("object map poisoned".to_string()))?
            .insert(id.to_string(), object);
        Ok(())
    }

    fn set_state(&self, id: &str, value: Value, ack: bool) -> Result<()> {
        if id.is_empty() {
            return Err(BleboxError::Store("state id must not be empty".to_string()));
        }
        let state = State { value, ack };
        self.lock_states()?.insert(id.to_string(), state.clone());

        // No subscribers is not an error
        let _ = self.change_tx.send(StateChange {
            id: self.qualified_id(id),
            state: Some(state),
        });
        Ok(())
    }

    fn subscribe_states(&self, pattern: &str) -> Result<StateReceiver> {
        Ok(StateReceiver::new(
            self.change_tx.subscribe(),
            self.qualified_id(pattern),
        ))
    }
}

use crate::error::{BleboxError, Result};
use crate::types::StateChange;
use tokio::sync::broadcast;

/// Receiver for state changes matching a subscription pattern
///
/// Patterns are fully qualified ids with an optional trailing `*`,
/// e.g. `blebox.0.command.*`.
pub struct StateReceiver {
    rx: broadcast::Receiver<StateChange>,
    pattern: String,
}

impl StateReceiver {
    /// Create a new state receiver
    pub(crate) fn new(rx: broadcast::Receiver<StateChange>, pattern: impl Into<String>) -> Self {
        Self {
            rx,
            pattern: pattern.into(),
        }
    }

    /// Subscription pattern of this receiver
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Receive the next matching state change
    pub async fn recv(&mut self) -> Result<StateChange> {
        loop {
            let change = self.rx.recv().await.map_err(|e| match e {
                broadcast::error::RecvError::Closed => BleboxError::ChannelClosed,
                broadcast::error::RecvError::Lagged(n) => {
                    BleboxError::ChannelError(format!("Lagged by {} messages", n))
                }
            })?;
            if pattern_matches(&self.pattern, &change.id) {
                return Ok(change);
            }
        }
    }

    /// Try to receive a matching state change without blocking
    ///
    /// Returns `None` if no matching change is available.
    pub fn try_recv(&mut self) -> Result<Option<StateChange>> {
        loop {
            match self.rx.try_recv() {
                Ok(change) if pattern_matches(&self.pattern, &change.id) => {
                    return Ok(Some(change))
                }
                Ok(_) => continue,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(BleboxError::ChannelClosed)
                }
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Err(BleboxError::ChannelError(format!("Lagged by {} messages", n)))
                }
            }
        }
    }
}

/// Match an id against a pattern with an optional trailing `*`
pub fn pattern_matches(pattern: &str, id: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => id.starts_with(prefix),
        None => pattern == id,
    }
}

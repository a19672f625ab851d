use thiserror::Error;

/// Result type for BleBox adapter operations
pub type Result<T> = std::result::Result<T, BleboxError>;

/// Errors that can occur while talking to a BleBox device or the host state tree
#[derive(Error, Debug)]
pub enum BleboxError {
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Device answered with a non-success status code
    #[error("HTTP status {status} from {url}")]
    Status {
        /// Status code returned by the device
        status: u16,
        /// Requested URL
        url: String,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid adapter configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid or unexpected response from the device
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Command value not understood for the given command state
    #[error("Invalid command value {value:?} for {key}")]
    InvalidCommand { key: String, value: String },

    /// Numeric command value outside of its allowed range
    #[error("Value {value} for {key} out of range {min}..={max}")]
    ValueOutOfRange {
        key: String,
        value: i64,
        min: i64,
        max: i64,
    },

    /// Host state store rejected an operation
    #[error("State store error: {0}")]
    Store(String),

    /// State change channel was closed
    #[error("Channel closed")]
    ChannelClosed,

    /// Channel receive error
    #[error("Channel error: {0}")]
    ChannelError(String),
}

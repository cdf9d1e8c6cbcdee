//! Error types for the WebDriver runtime.

use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to a driver endpoint.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to reach the driver endpoint.
    #[error("Failed to connect to webdriver endpoint: {0}")]
    ConnectionFailed(String),

    /// Driver-reported failure with the wire error payload.
    #[error("{name}: {message}")]
    Driver {
        /// Error code name from the driver (e.g., "session not created").
        name: String,
        /// Human-readable message from the driver.
        message: String,
    },

    /// Response payload did not carry the fields the handshake requires.
    #[error("Protocol error: {0}")]
    ProtocolError(String),

    /// Close was requested with no active session on the transport.
    #[error("No active session to close")]
    NoActiveSession,

    /// The pending handshake completion was dropped without resolving.
    #[error("Handshake channel closed unexpectedly")]
    ChannelClosed,

    /// HTTP-level error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the driver error name if this is a driver-reported failure.
    pub fn driver_name(&self) -> Option<&str> {
        match self {
            Error::Driver { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns true when the endpoint could not be reached at all.
    pub fn is_connection_failure(&self) -> bool {
        match self {
            Error::ConnectionFailed(_) => true,
            Error::Http(err) => err.is_connect(),
            _ => false,
        }
    }
}

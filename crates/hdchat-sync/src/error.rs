//! Error types for the sync module.

use thiserror::Error;

/// Errors that can occur while talking to a chat transport.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    TransportError(String),

    /// The relay refused a payload.
    #[error("rejected by relay: {0}")]
    Rejected(String),

    /// The subscription channel was closed by the relay.
    #[error("subscription closed")]
    Closed,
}

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;

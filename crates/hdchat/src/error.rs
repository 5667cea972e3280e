//! Error types for the wallet.

use hdchat_access::AccessError;
use hdchat_chat::ChatError;
use hdchat_core::CoreError;
use hdchat_sync::SyncError;
use thiserror::Error;

/// Errors that can occur during wallet operations.
#[derive(Debug, Error)]
pub enum WalletError {
    /// An operation needed master keys before a root secret was supplied.
    #[error("master keys are not initialized")]
    NotInitialized,

    /// No identity is known for the item, so its chat cannot be used.
    #[error("chat keys not available for item {0}")]
    ChatKeysUnavailable(String),

    /// Access envelopes were delivered but none opened for this wallet.
    #[error("no valid access key for item {0}")]
    NoValidAccessKey(String),

    /// Core error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Access delegation error.
    #[error("access error: {0}")]
    Access(#[from] AccessError),

    /// Chat payload error.
    #[error("chat error: {0}")]
    Chat(#[from] ChatError),

    /// Transport error.
    #[error("sync error: {0}")]
    Sync(#[from] SyncError),
}

/// Result type for wallet operations.
pub type Result<T> = std::result::Result<T, WalletError>;

//! Error types for chat payloads.

use thiserror::Error;

/// Hard errors while building or opening chat payloads.
///
/// A payload that simply is not for this identity (bad signature, foreign
/// signer, wrong chat key) is not an error: it opens to `None`.
#[derive(Debug, Error)]
pub enum ChatError {
    /// A `:`-separated field is missing.
    #[error("payload does not contain {0}")]
    MissingField(&'static str),

    /// The payload has more fields than the format allows.
    #[error("payload has {0} fields, expected 3")]
    TooManyFields(usize),

    /// Message text exceeds the configured limit.
    #[error("message text is {len} characters, limit is {max}")]
    TextTooLong { len: usize, max: usize },

    /// The decrypted message is not a valid message object.
    #[error("invalid message object: {0}")]
    InvalidMessage(#[from] serde_json::Error),

    /// Core error (base64, lengths, encryption).
    #[error("core error: {0}")]
    CoreError(#[from] hdchat_core::CoreError),
}

/// Result type for chat operations.
pub type Result<T> = std::result::Result<T, ChatError>;

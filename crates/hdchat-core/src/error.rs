//! Error types for the HD chat core.

use thiserror::Error;

/// Hard errors raised by key derivation and the primitive adapter.
///
/// Soft outcomes ("this ciphertext is not for me") are never represented
/// here; they surface as `None` from the functions that produce them.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("root secret must be between {min} and {max} bytes, got {actual}")]
    InvalidRootSecret {
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("invalid {what} length: expected {expected}, got {actual}")]
    InvalidLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("you cannot recover the identity of an item you did not create")]
    NotOwner,

    #[error("encryption error: {0}")]
    EncryptionError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

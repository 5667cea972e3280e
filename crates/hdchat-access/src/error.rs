//! Error types for access delegation.

use thiserror::Error;

/// Hard errors while giving or taking access.
///
/// An envelope that is well formed but sealed for someone else is not an
/// error; [`crate::AccessEnvelope::get`] reports it as `None`.
#[derive(Debug, Error)]
pub enum AccessError {
    /// The wire value does not have the `envelope:sender` shape.
    #[error("malformed access envelope: {0}")]
    MalformedEnvelope(String),

    /// The envelope opened but did not carry a 64-byte seed.
    #[error("invalid item seed length: expected 64, got {0}")]
    InvalidSeedLength(usize),

    /// Core error.
    #[error("core error: {0}")]
    CoreError(#[from] hdchat_core::CoreError),
}

/// Result type for access operations.
pub type Result<T> = std::result::Result<T, AccessError>;

//! Strong type definitions for HD chat.
//!
//! Every value that crosses the core boundary is a fixed-length byte
//! newtype. Hex helpers exist for callers that key maps or transports by
//! string, but the core never guesses an encoding.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::{to_array, Ed25519PublicKey};
use crate::error::{CoreError, Result};

/// Length of the nonce embedded in every item hash.
pub const ITEM_NONCE_LEN: usize = 8;

const _: () = assert!(ITEM_NONCE_LEN >= 8 && ITEM_NONCE_LEN <= 16);

/// Length of the public-key prefix kept in an item hash.
pub const ITEM_PREFIX_LEN: usize = 32 - ITEM_NONCE_LEN;

/// Minimum accepted root secret length.
pub const ROOT_SECRET_MIN_LEN: usize = 16;

/// Maximum accepted root secret length.
pub const ROOT_SECRET_MAX_LEN: usize = 64;

/// The wallet's root secret (already expanded from any mnemonic).
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct RootSecret(Vec<u8>);

impl RootSecret {
    /// Wrap raw secret bytes, checking the length bounds.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        if !(ROOT_SECRET_MIN_LEN..=ROOT_SECRET_MAX_LEN).contains(&bytes.len()) {
            return Err(CoreError::InvalidRootSecret {
                min: ROOT_SECRET_MIN_LEN,
                max: ROOT_SECRET_MAX_LEN,
                actual: bytes.len(),
            });
        }
        Ok(Self(bytes))
    }

    /// Parse from hex, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim_start_matches("0x"))
            .map_err(|e| CoreError::DecodingError(e.to_string()))?;
        Self::new(bytes)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for RootSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RootSecret(<{} bytes>)", self.0.len())
    }
}

/// The public 32-byte identifier of an item.
///
/// Laid out as `signing_public_key[..ITEM_PREFIX_LEN] || nonce`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemHash(pub [u8; 32]);

impl ItemHash {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse from a slice, rejecting anything that is not 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        to_array("item hash", bytes).map(Self)
    }

    /// Build from a signing public key and a nonce.
    pub fn compose(public_key: &Ed25519PublicKey, nonce: &ItemNonce) -> Self {
        let mut bytes = [0u8; 32];
        bytes[..ITEM_PREFIX_LEN].copy_from_slice(&public_key.0[..ITEM_PREFIX_LEN]);
        bytes[ITEM_PREFIX_LEN..].copy_from_slice(&nonce.0);
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// The nonce stored in the low-order bytes.
    pub fn nonce(&self) -> ItemNonce {
        let mut nonce = [0u8; ITEM_NONCE_LEN];
        nonce.copy_from_slice(&self.0[ITEM_PREFIX_LEN..]);
        ItemNonce(nonce)
    }

    /// Whether `public_key` could be the signing key behind this hash.
    ///
    /// Only the prefix is checked; a relay uses this to tie a signed payload
    /// to the item it is posted under without holding any item secrets.
    pub fn matches_public_key(&self, public_key: &Ed25519PublicKey) -> bool {
        self.0[..ITEM_PREFIX_LEN] == public_key.0[..ITEM_PREFIX_LEN]
    }

    /// Convert to lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim_start_matches("0x"))
            .map_err(|e| CoreError::DecodingError(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Debug for ItemHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemHash({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for ItemHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl AsRef<[u8]> for ItemHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for ItemHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// The per-item nonce that makes hash-only recovery possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemNonce(pub [u8; ITEM_NONCE_LEN]);

impl ItemNonce {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; ITEM_NONCE_LEN]) -> Self {
        Self(bytes)
    }

    /// Draw a fresh nonce from the CSPRNG.
    pub fn generate() -> Self {
        Self(crate::crypto::random_bytes())
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; ITEM_NONCE_LEN] {
        &self.0
    }
}

/// The 64-byte item seed: the only thing a requester ever needs.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ItemSeed([u8; 64]);

impl ItemSeed {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Parse from a slice, rejecting anything that is not 64 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        to_array("item seed", bytes).map(Self)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// First half: seed of the item signing keypair.
    pub fn signing_seed(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.0[..32]);
        out
    }

    /// Second half: the symmetric chat key.
    pub fn chat_key(&self) -> ChatKey {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.0[32..]);
        ChatKey(out)
    }
}

impl fmt::Debug for ItemSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ItemSeed(<redacted>)")
    }
}

/// The symmetric key that encrypts an item's chat messages.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ChatKey([u8; 32]);

impl ChatKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for ChatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChatKey(<redacted>)")
    }
}

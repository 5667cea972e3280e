//! Master key derivation.
//!
//! One root secret fans out into three independent 64-byte subkeys:
//!
//! ```text
//! token  = SHA-512(root || be32(0x80000000))
//! item   = SHA-512(root || be32(0x80000001))
//! access = SHA-512(root || be32(0x80000002))
//! ```
//!
//! Indexes start at the hardened offset so they can never collide with a
//! plain sequential derivation scheme.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::{hash_concat, HASH_LEN};
use crate::types::RootSecret;

/// First hardened derivation index.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// Which subkey a derivation index belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum MasterKeyKind {
    Token = 0,
    Item = 1,
    Access = 2,
}

impl MasterKeyKind {
    /// All kinds in derivation order.
    pub const ALL: [MasterKeyKind; 3] = [Self::Token, Self::Item, Self::Access];

    /// The hardened index bytes appended to the root secret.
    pub fn hardened_index(self) -> [u8; 4] {
        (HARDENED_OFFSET + self as u32).to_be_bytes()
    }
}

/// A 64-byte master subkey.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey([u8; HASH_LEN]);

impl MasterKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; HASH_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterKey(<redacted>)")
    }
}

/// The three master subkeys of a wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterKeys {
    pub token: MasterKey,
    pub item: MasterKey,
    pub access: MasterKey,
}

impl MasterKeys {
    /// Derive all three subkeys from a root secret.
    pub fn derive(root: &RootSecret) -> Self {
        Self {
            token: derive_master_key(root, MasterKeyKind::Token),
            item: derive_master_key(root, MasterKeyKind::Item),
            access: derive_master_key(root, MasterKeyKind::Access),
        }
    }

    /// Look up a subkey by kind.
    pub fn get(&self, kind: MasterKeyKind) -> &MasterKey {
        match kind {
            MasterKeyKind::Token => &self.token,
            MasterKeyKind::Item => &self.item,
            MasterKeyKind::Access => &self.access,
        }
    }
}

/// Derive a single master subkey.
pub fn derive_master_key(root: &RootSecret, kind: MasterKeyKind) -> MasterKey {
    MasterKey(hash_concat(&[root.as_bytes(), &kind.hardened_index()]))
}

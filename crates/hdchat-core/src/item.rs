//! Item identity derivation and recovery.
//!
//! An item identity is fully determined by `(item_master_key, nonce)`:
//!
//! ```text
//! seed     = SHA-512(item_master_key || nonce)
//! keypair  = Ed25519(seed[0..32])
//! chat_key = seed[32..64]
//! hash     = keypair.public[0..32-N] || nonce
//! ```
//!
//! Because the nonce lives inside the public hash, the creator can rebuild
//! the whole identity from the hash alone, and anyone else holding only the
//! hash learns nothing about the keys.

use crate::crypto::{hash_concat, Ed25519PublicKey, Ed25519Signature, SigningKeypair};
use crate::error::{CoreError, Result};
use crate::master::MasterKey;
use crate::types::{ChatKey, ItemHash, ItemNonce, ItemSeed};

/// The key bundle for one item.
///
/// Built by the creator from a nonce (and then carries `hash`), or by a
/// recipient from a delegated seed (and then has no `hash`: the recipient
/// trusts the hash it was told by the transport).
#[derive(Debug, Clone)]
pub struct ItemIdentity {
    keypair: SigningKeypair,
    chat_key: ChatKey,
    seed: ItemSeed,
    hash: Option<ItemHash>,
}

impl ItemIdentity {
    /// Create a new item with a fresh random nonce.
    pub fn generate(item_master_key: &MasterKey) -> Self {
        Self::from_nonce(item_master_key, &ItemNonce::generate())
    }

    /// Deterministically derive the identity for `nonce`.
    pub fn from_nonce(item_master_key: &MasterKey, nonce: &ItemNonce) -> Self {
        let seed = ItemSeed::from_bytes(hash_concat(&[item_master_key.as_bytes(), nonce.as_bytes()]));
        let mut identity = Self::from_seed(seed);
        identity.hash = Some(ItemHash::compose(&identity.public_key(), nonce));
        identity
    }

    /// Rebuild the identity from a delegated seed.
    pub fn from_seed(seed: ItemSeed) -> Self {
        let keypair = SigningKeypair::from_seed(&seed.signing_seed());
        let chat_key = seed.chat_key();
        Self {
            keypair,
            chat_key,
            seed,
            hash: None,
        }
    }

    /// Recover an identity this master key created, from its public hash.
    ///
    /// Fails with [`CoreError::NotOwner`] when the hash was produced by a
    /// different master key.
    pub fn recover_from_hash(item_master_key: &MasterKey, item_hash: &ItemHash) -> Result<Self> {
        let identity = Self::from_nonce(item_master_key, &item_hash.nonce());
        if identity.hash.as_ref() != Some(item_hash) {
            return Err(CoreError::NotOwner);
        }
        Ok(identity)
    }

    /// The item's signing public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        self.keypair.public_key()
    }

    /// The 64-byte signing secret key (`seed || public_key`).
    pub fn secret_key(&self) -> [u8; 64] {
        self.keypair.secret_key_bytes()
    }

    /// The symmetric chat key.
    pub fn chat_key(&self) -> &ChatKey {
        &self.chat_key
    }

    /// The 64-byte item seed.
    pub fn seed(&self) -> &ItemSeed {
        &self.seed
    }

    /// The public hash, known only on the creator path.
    pub fn hash(&self) -> Option<&ItemHash> {
        self.hash.as_ref()
    }

    /// The embedded nonce, known only on the creator path.
    pub fn nonce(&self) -> Option<ItemNonce> {
        self.hash.map(|h| h.nonce())
    }

    /// Sign a message with the item key.
    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        self.keypair.sign(message)
    }
}

impl PartialEq for ItemIdentity {
    fn eq(&self, other: &Self) -> bool {
        // Every key is a function of the seed.
        self.seed == other.seed && self.hash == other.hash
    }
}

impl Eq for ItemIdentity {}

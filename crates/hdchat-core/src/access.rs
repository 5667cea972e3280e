//! Access keypair derivation.
//!
//! Each party derives one box keypair per item from its access master key:
//! `secret = SHA-512(access_master_key || item_hash)[0..32]`. The keypair is
//! never stored; it is recomputed whenever a delegation is given or taken.

use crate::crypto::{hash_concat, X25519PublicKey, X25519SecretKey};
use crate::master::MasterKey;
use crate::types::ItemHash;

/// Public half of an access keypair, published to the item owner.
pub type AccessPublicKey = X25519PublicKey;

/// Deterministic per-(party, item) keypair for access delegation.
#[derive(Debug, Clone)]
pub struct AccessKeypair {
    public: AccessPublicKey,
    secret: X25519SecretKey,
}

impl AccessKeypair {
    /// Derive the keypair for `item_hash`.
    pub fn derive(access_master_key: &MasterKey, item_hash: &ItemHash) -> Self {
        let access_seed = hash_concat(&[access_master_key.as_bytes(), item_hash.as_bytes()]);
        let mut secret_bytes = [0u8; 32];
        secret_bytes.copy_from_slice(&access_seed[..32]);
        Self::from_secret(X25519SecretKey::from_bytes(secret_bytes))
    }

    /// Rebuild a keypair from its secret half.
    pub fn from_secret(secret: X25519SecretKey) -> Self {
        Self {
            public: secret.public_key(),
            secret,
        }
    }

    /// The public key to hand to the item owner.
    pub fn public_key(&self) -> &AccessPublicKey {
        &self.public
    }

    /// The secret key.
    pub fn secret_key(&self) -> &X25519SecretKey {
        &self.secret
    }
}

//! # HD Chat Core
//!
//! Deterministic key derivation for HD chat: master keys, item identities
//! and access keypairs.
//!
//! This crate contains no I/O, no storage, no networking. Every function is
//! a pure computation over explicit inputs, apart from drawing fresh nonces.
//!
//! ## Derivation tree
//!
//! ```text
//! root secret
//!   ├─ token  master key
//!   ├─ item   master key ──(nonce)──> ItemIdentity { keypair, chat_key, seed, hash }
//!   └─ access master key ──(item hash)──> AccessKeypair
//! ```
//!
//! ## Key Types
//!
//! - [`MasterKeys`] - The three 64-byte subkeys of a wallet
//! - [`ItemIdentity`] - Signing keypair, chat key, seed and public hash of an item
//! - [`ItemHash`] - Public 32-byte item identifier with an embedded nonce
//! - [`AccessKeypair`] - Per-item box keypair used for access delegation
//!
//! ## Encoding
//!
//! Base64 and delimiter conventions shared by the envelope crates live in
//! [`encoding`].

pub mod access;
pub mod crypto;
pub mod encoding;
pub mod error;
pub mod item;
pub mod master;
pub mod types;

pub use access::{AccessKeypair, AccessPublicKey};
pub use crypto::{Ed25519PublicKey, Ed25519Signature, SigningKeypair, X25519PublicKey, X25519SecretKey};
pub use encoding::{SealedBox, CIPHER_DELIMITER, PAYLOAD_DELIMITER};
pub use error::{CoreError, Result};
pub use item::ItemIdentity;
pub use master::{derive_master_key, MasterKey, MasterKeyKind, MasterKeys};
pub use types::{ChatKey, ItemHash, ItemNonce, ItemSeed, RootSecret, ITEM_NONCE_LEN, ITEM_PREFIX_LEN};

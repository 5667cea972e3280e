//! # HD Chat Access
//!
//! Access delegation without a trusted third party.
//!
//! ## Overview
//!
//! A requester knows only an item's public hash. To join the item's chat it
//! needs the 64-byte item seed, which only the creator ("owner") can derive.
//! Both sides derive a deterministic access keypair for the item hash from
//! their own access master key, so the exchange needs no registration step:
//!
//! 1. The requester publishes its access public key for the item.
//! 2. The owner seals the item seed to that key ([`AccessEnvelope::give`]).
//! 3. The requester tries every envelope it receives ([`find_seed`]) and
//!    keeps the first that opens.
//!
//! Give and get are independent, idempotent calls, so the transport can be
//! push- or pull-based without changing this logic.
//!
//! ## Usage
//!
//! ```rust
//! use hdchat_access::{find_seed, AccessEnvelope};
//! use hdchat_core::{AccessKeypair, ItemIdentity, MasterKeys, RootSecret};
//!
//! let owner = MasterKeys::derive(&RootSecret::new([1u8; 32]).unwrap());
//! let requester = MasterKeys::derive(&RootSecret::new([2u8; 32]).unwrap());
//!
//! let item = ItemIdentity::generate(&owner.item);
//! let hash = *item.hash().unwrap();
//!
//! let requester_kp = AccessKeypair::derive(&requester.access, &hash);
//! let owner_kp = AccessKeypair::derive(&owner.access, &hash);
//!
//! let envelope = AccessEnvelope::give(item.seed(), requester_kp.public_key(), &owner_kp).unwrap();
//! let seed = find_seed([&envelope], &requester_kp).unwrap();
//! assert_eq!(ItemIdentity::from_seed(seed).public_key(), item.public_key());
//! ```

pub mod envelope;
pub mod error;

pub use envelope::{find_seed, AccessEnvelope};
pub use error::{AccessError, Result};

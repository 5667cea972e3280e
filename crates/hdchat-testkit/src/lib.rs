//! # HD Chat Testkit
//!
//! Testing utilities for HD chat.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known derivations with expected outputs for cross-implementation checks
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Multi-wallet chat setups over the in-memory relay
//!
//! ## Golden Vectors
//!
//! ```rust
//! use hdchat_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, detail) in verify_all_vectors() {
//!     assert!(matches, "{name}: {detail}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use hdchat_testkit::generators::{identity_from_params, ItemParams};
//!
//! proptest! {
//!     #[test]
//!     fn item_hash_is_deterministic(params: ItemParams) {
//!         let a = identity_from_params(&params);
//!         let b = identity_from_params(&params);
//!         prop_assert_eq!(a.hash(), b.hash());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust,no_run
//! use hdchat_testkit::fixtures::ChatFixture;
//!
//! async fn example() {
//!     let fixture = ChatFixture::new(2).await.unwrap();
//!     assert_eq!(fixture.members.len(), 2);
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_wallets, party_root, ChatFixture};
pub use generators::{identity_from_params, ItemParams};
pub use vectors::{access_vectors, all_vectors, verify_all_vectors, AccessVector, GoldenVector};

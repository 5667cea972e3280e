//! # HD Chat
//!
//! Recoverable item identities, delegated access and end-to-end encrypted
//! chat, all derived from one root secret.
//!
//! ## Overview
//!
//! - **Master keys**: token, item and access subkeys derived from a root
//!   secret with hardened indices
//! - **Items**: every item gets its own signing keypair and chat key,
//!   recoverable by the creator from the item's public hash alone
//! - **Access**: the creator seals the item seed to a requester's
//!   per-item access key, so the requester can read and post
//! - **Chat**: messages are encrypted under the item chat key and signed by
//!   the item key, so a relay can reject forgeries without reading them
//!
//! ## Usage
//!
//! ```rust,no_run
//! use hdchat::{HdWallet, MemoryRelay, RootSecret, WalletConfig};
//!
//! async fn example() -> hdchat::Result<()> {
//!     let relay = MemoryRelay::new();
//!     let mut alice = HdWallet::with_root_secret(
//!         relay.connect(),
//!         WalletConfig::named("Alice"),
//!         &RootSecret::new([1u8; 32])?,
//!     );
//!     let mut bob = HdWallet::with_root_secret(
//!         relay.connect(),
//!         WalletConfig::named("Bob"),
//!         &RootSecret::new([2u8; 32])?,
//!     );
//!
//!     let item = alice.create_item()?;
//!     let bob_key = bob.request_access(&item)?;
//!     alice.give_access(&item, &bob_key).await?;
//!
//!     let mut chat = bob.join_chat(&item).await?;
//!     bob.next_messages(&mut chat).await?;
//!
//!     alice.send_message(&item, "Hello Bob", None).await?;
//!     let messages = bob.next_messages(&mut chat).await?;
//!     assert_eq!(messages[0].text, "Hello Bob");
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `hdchat::core` - Key derivation and primitives
//! - `hdchat::access` - Access delegation envelopes
//! - `hdchat::chat` - Chat payloads
//! - `hdchat::sync` - Transport abstraction and in-memory relay

pub mod error;
pub mod wallet;

// Re-export component crates
pub use hdchat_access as access;
pub use hdchat_chat as chat;
pub use hdchat_core as core;
pub use hdchat_sync as sync;

// Re-export main types for convenience
pub use error::{Result, WalletError};
pub use wallet::{HdWallet, WalletConfig};

// Re-export commonly used component types
pub use hdchat_access::AccessEnvelope;
pub use hdchat_chat::{ChatPayload, MessageObject};
pub use hdchat_core::{ItemHash, ItemIdentity, ItemNonce, MasterKeys, RootSecret};
pub use hdchat_sync::{ChatSubscription, ChatTransport, ChatUpdate, MemoryRelay, MemoryTransport};

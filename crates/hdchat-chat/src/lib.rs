//! # HD Chat Messages
//!
//! Signed, encrypted chat payloads bound to an item identity.
//!
//! ## Overview
//!
//! Everyone holding an item seed shares the item's signing keypair and chat
//! key. A message is encrypted under the chat key, and the resulting
//! envelope is signed with the item secret key. Receivers check that the
//! signer is the item they expect before decrypting, so a relay that knows
//! only the item hash can still drop forged messages via
//! [`verify_message`].
//!
//! ## Usage
//!
//! ```rust
//! use hdchat_chat::{open_message, send_message};
//! use hdchat_core::{ItemIdentity, MasterKeys, RootSecret};
//!
//! let keys = MasterKeys::derive(&RootSecret::new([7u8; 32]).unwrap());
//! let item = ItemIdentity::generate(&keys.item);
//!
//! let payload = send_message("hello", "alice", &item).unwrap();
//! let message = open_message(&payload, &item).unwrap().unwrap();
//! assert_eq!(message.text, "hello");
//! ```

pub mod error;
pub mod message;
pub mod payload;

pub use error::{ChatError, Result};
pub use message::{MessageObject, MAX_TEXT_LEN};
pub use payload::{open_message, open_messages, seal_message, send_message, verify_message, ChatPayload};

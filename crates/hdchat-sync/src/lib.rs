//! # HD Chat Sync
//!
//! Transport abstraction between wallets and an untrusted chat relay.
//!
//! ## Overview
//!
//! Wallets exchange two kinds of opaque strings through a relay, both keyed
//! by the item hash in hex:
//!
//! - access envelopes, posted by item owners when subscribing
//! - chat payloads, posted with [`ChatTransport::new_chat_message`]
//!
//! A subscription first yields a snapshot of everything stored for the
//! item, then each addition as its own [`ChatUpdate`].
//!
//! ## Message Flow
//!
//! ```text
//! Owner                    Relay                    Requester
//!   |                        |<-- subscribe ------------|
//!   |                        |--- snapshot ------------>|
//!   |-- subscribe(envelope)->|                          |
//!   |                        |--- accessKeys ---------->|
//!   |-- new_chat_message --->|                          |
//!   |                        |--- messages ------------>|
//! ```
//!
//! [`memory::MemoryRelay`] is a complete in-process relay. It rejects
//! payloads whose signature does not verify, and payloads signed by a key
//! that does not match the item hash prefix.

pub mod error;
pub mod messages;
pub mod transport;

pub use error::{Result, SyncError};
pub use messages::ChatUpdate;
pub use transport::memory::{MemoryRelay, MemoryTransport, RelayConfig};
pub use transport::{ChatSubscription, ChatTransport};

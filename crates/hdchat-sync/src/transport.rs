//! Transport abstraction for chat relays.
//!
//! A relay stores access envelopes and chat payloads per item hash and
//! pushes changes to subscribers. It never holds key material: it can check
//! who signed a payload but cannot read it.

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;

use hdchat_access::AccessEnvelope;
use hdchat_chat::ChatPayload;

use crate::error::{Result, SyncError};
use crate::messages::ChatUpdate;

/// Transport trait for reaching a chat relay.
///
/// Item hashes are passed as lowercase hex. Implementations must be
/// thread-safe (Send + Sync).
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Subscribe to an item's chat, optionally posting an access envelope
    /// first.
    ///
    /// The returned subscription yields a snapshot of the chat, then every
    /// later addition.
    async fn subscribe_to_chat(
        &self,
        item_hash_hex: &str,
        access_key: Option<AccessEnvelope>,
    ) -> Result<ChatSubscription>;

    /// Post a chat payload to an item's chat.
    async fn new_chat_message(&self, item_hash_hex: &str, payload: ChatPayload) -> Result<()>;
}

/// A stream of [`ChatUpdate`]s for one item.
#[derive(Debug)]
pub struct ChatSubscription {
    item_hash_hex: String,
    receiver: mpsc::Receiver<ChatUpdate>,
}

impl ChatSubscription {
    /// Wrap the receiving end of an update channel.
    pub fn new(item_hash_hex: impl Into<String>, receiver: mpsc::Receiver<ChatUpdate>) -> Self {
        Self {
            item_hash_hex: item_hash_hex.into(),
            receiver,
        }
    }

    /// The item this subscription follows.
    pub fn item_hash_hex(&self) -> &str {
        &self.item_hash_hex
    }

    /// Wait for the next update. `None` once the relay has gone away.
    pub async fn next(&mut self) -> Option<ChatUpdate> {
        self.receiver.recv().await
    }

    /// Wait for the next update, up to `timeout`.
    ///
    /// Returns `Ok(None)` if the timeout expires first.
    pub async fn next_timeout(&mut self, timeout: Duration) -> Result<Option<ChatUpdate>> {
        match tokio::time::timeout(timeout, self.receiver.recv()).await {
            Ok(Some(update)) => Ok(Some(update)),
            Ok(None) => Err(SyncError::Closed),
            Err(_) => Ok(None),
        }
    }

    /// Take an update if one is already queued.
    pub fn try_next(&mut self) -> Option<ChatUpdate> {
        self.receiver.try_recv().ok()
    }
}

/// An in-memory relay for tests and local use.
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::mpsc::error::TrySendError;
    use tokio::sync::RwLock;

    use hdchat_chat::verify_message;
    use hdchat_core::ItemHash;

    /// Configuration for [`MemoryRelay`].
    #[derive(Debug, Clone)]
    pub struct RelayConfig {
        /// Buffered updates per subscriber. A subscriber that falls this far
        /// behind is disconnected.
        pub channel_capacity: usize,
        /// Reject payloads whose signer does not match the item hash prefix.
        pub check_item_prefix: bool,
    }

    impl Default for RelayConfig {
        fn default() -> Self {
            Self {
                channel_capacity: 1000,
                check_item_prefix: true,
            }
        }
    }

    /// Everything the relay holds for one item.
    #[derive(Default)]
    struct ChatRoom {
        access_keys: Vec<AccessEnvelope>,
        messages: Vec<ChatPayload>,
        subscribers: Vec<mpsc::Sender<ChatUpdate>>,
    }

    impl ChatRoom {
        fn snapshot(&self) -> ChatUpdate {
            ChatUpdate {
                access_keys: self.access_keys.clone(),
                messages: self.messages.clone(),
            }
        }

        /// Push an update to every subscriber without waiting.
        ///
        /// Closed subscribers and subscribers whose buffer is full are
        /// removed. Called with the relay lock held.
        fn broadcast(&mut self, update: &ChatUpdate) {
            self.subscribers
                .retain(|subscriber| match subscriber.try_send(update.clone()) {
                    Ok(()) => true,
                    Err(TrySendError::Full(_)) => {
                        tracing::warn!("dropping chat subscriber that stopped reading");
                        false
                    }
                    Err(TrySendError::Closed(_)) => false,
                });
        }
    }

    /// Shared state of the in-memory relay.
    pub struct MemoryRelay {
        config: RelayConfig,
        chats: RwLock<HashMap<String, ChatRoom>>,
    }

    impl MemoryRelay {
        /// Create a relay with default configuration.
        pub fn new() -> Arc<Self> {
            Self::with_config(RelayConfig::default())
        }

        /// Create a relay with custom configuration.
        pub fn with_config(config: RelayConfig) -> Arc<Self> {
            Arc::new(Self {
                config,
                chats: RwLock::new(HashMap::new()),
            })
        }

        /// Create a transport connected to this relay.
        pub fn connect(self: &Arc<Self>) -> MemoryTransport {
            MemoryTransport {
                relay: Arc::clone(self),
            }
        }

        /// Payloads stored for an item.
        pub async fn messages(&self, item_hash_hex: &str) -> Vec<ChatPayload> {
            let chats = self.chats.read().await;
            chats
                .get(&item_hash_hex.to_ascii_lowercase())
                .map(|room| room.messages.clone())
                .unwrap_or_default()
        }

        /// Access envelopes stored for an item.
        pub async fn access_keys(&self, item_hash_hex: &str) -> Vec<AccessEnvelope> {
            let chats = self.chats.read().await;
            chats
                .get(&item_hash_hex.to_ascii_lowercase())
                .map(|room| room.access_keys.clone())
                .unwrap_or_default()
        }

        /// Check that `payload` was signed by the item it is posted to.
        fn check_author(&self, item_hash_hex: &str, payload: &ChatPayload) -> Result<()> {
            let signer = match verify_message(payload) {
                Ok(Some(signer)) => signer,
                Ok(None) => return Err(SyncError::Rejected("invalid signature".into())),
                Err(e) => return Err(SyncError::Rejected(e.to_string())),
            };

            if self.config.check_item_prefix {
                let item_hash = ItemHash::from_hex(item_hash_hex)
                    .map_err(|e| SyncError::Rejected(e.to_string()))?;
                if !item_hash.matches_public_key(&signer) {
                    return Err(SyncError::Rejected("signer does not own item".into()));
                }
            }
            Ok(())
        }
    }

    /// A connection to a [`MemoryRelay`].
    #[derive(Clone)]
    pub struct MemoryTransport {
        relay: Arc<MemoryRelay>,
    }

    #[async_trait]
    impl ChatTransport for MemoryTransport {
        async fn subscribe_to_chat(
            &self,
            item_hash_hex: &str,
            access_key: Option<AccessEnvelope>,
        ) -> Result<ChatSubscription> {
            let key = item_hash_hex.to_ascii_lowercase();
            let mut chats = self.relay.chats.write().await;
            let room = chats.entry(key.clone()).or_default();

            if let Some(envelope) = access_key {
                room.access_keys.push(envelope.clone());
                room.broadcast(&ChatUpdate::access_key(envelope));
            }

            let (tx, rx) = mpsc::channel(self.relay.config.channel_capacity.max(1));
            tx.try_send(room.snapshot())
                .map_err(|e| SyncError::TransportError(e.to_string()))?;
            room.subscribers.push(tx);

            tracing::debug!(item = %key, subscribers = room.subscribers.len(), "chat subscription");
            Ok(ChatSubscription::new(key, rx))
        }

        async fn new_chat_message(&self, item_hash_hex: &str, payload: ChatPayload) -> Result<()> {
            let key = item_hash_hex.to_ascii_lowercase();
            if let Err(e) = self.relay.check_author(&key, &payload) {
                tracing::warn!(item = %key, "relay rejected payload: {}", e);
                return Err(e);
            }

            let mut chats = self.relay.chats.write().await;
            let room = chats.entry(key).or_default();
            room.messages.push(payload.clone());
            room.broadcast(&ChatUpdate::message(payload));
            Ok(())
        }
    }
}

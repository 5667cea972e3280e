//! The wallet: one holder's keys, items and chats.
//!
//! The wallet owns the master keys and a cache of item identities keyed by
//! the lowercase hex of the item hash. Derivation is delegated to the
//! component crates; the wallet only decides which identity to use and
//! talks to the transport.

use std::collections::HashMap;

use hdchat_access::{find_seed, AccessEnvelope};
use hdchat_chat::{open_messages, seal_message, ChatPayload, MessageObject, MAX_TEXT_LEN};
use hdchat_core::{
    AccessKeypair, AccessPublicKey, CoreError, ItemHash, ItemIdentity, ItemNonce, MasterKeys,
    RootSecret,
};
use hdchat_sync::{ChatSubscription, ChatTransport, ChatUpdate, SyncError};

use crate::error::{Result, WalletError};

/// Configuration for the wallet.
#[derive(Debug, Clone)]
pub struct WalletConfig {
    /// User name stamped on outgoing messages when none is given.
    pub name: String,
    /// Longest message text accepted by `send_message`, in characters.
    pub max_text_len: usize,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            max_text_len: MAX_TEXT_LEN,
        }
    }
}

impl WalletConfig {
    /// Default configuration with a user name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Whether the wallet has its master keys yet.
#[derive(Debug)]
enum WalletState {
    Uninitialized,
    Ready(MasterKeys),
}

/// An HD chat wallet bound to a transport.
pub struct HdWallet<T: ChatTransport> {
    transport: T,
    config: WalletConfig,
    state: WalletState,
    /// Known item identities, keyed by lowercase item hash hex.
    items: HashMap<String, ItemIdentity>,
}

/// Parse an item hash and return it with its cache key.
fn parse_item_hash(item_hash_hex: &str) -> Result<(ItemHash, String)> {
    let hash = ItemHash::from_hex(item_hash_hex)?;
    let key = hash.to_hex();
    Ok((hash, key))
}

impl<T: ChatTransport> HdWallet<T> {
    /// Create a wallet without master keys. Call
    /// [`HdWallet::set_master_keys`] before using it.
    pub fn new(transport: T, config: WalletConfig) -> Self {
        Self {
            transport,
            config,
            state: WalletState::Uninitialized,
            items: HashMap::new(),
        }
    }

    /// Create a wallet and derive its master keys from `root`.
    pub fn with_root_secret(transport: T, config: WalletConfig, root: &RootSecret) -> Self {
        Self::with_master_keys(transport, config, MasterKeys::derive(root))
    }

    /// Create a wallet from already-derived master keys.
    pub fn with_master_keys(transport: T, config: WalletConfig, keys: MasterKeys) -> Self {
        Self {
            transport,
            config,
            state: WalletState::Ready(keys),
            items: HashMap::new(),
        }
    }

    /// Derive master keys from `root` unless the wallet already has some.
    pub fn set_master_keys(&mut self, root: &RootSecret) {
        if let WalletState::Uninitialized = self.state {
            self.state = WalletState::Ready(MasterKeys::derive(root));
        }
    }

    /// True once master keys are available.
    pub fn is_ready(&self) -> bool {
        matches!(self.state, WalletState::Ready(_))
    }

    /// The wallet configuration.
    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    /// The transport this wallet talks to.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn master_keys(&self) -> Result<&MasterKeys> {
        match &self.state {
            WalletState::Ready(keys) => Ok(keys),
            WalletState::Uninitialized => Err(WalletError::NotInitialized),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Items
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a new item and return its hash in hex.
    pub fn create_item(&mut self) -> Result<String> {
        self.create_item_with_nonce(&ItemNonce::generate())
    }

    /// Create the item for a specific nonce and return its hash in hex.
    pub fn create_item_with_nonce(&mut self, nonce: &ItemNonce) -> Result<String> {
        let identity = ItemIdentity::from_nonce(&self.master_keys()?.item, nonce);
        let key = ItemHash::compose(&identity.public_key(), nonce).to_hex();

        tracing::debug!(item = %key, "created item");
        self.items.insert(key.clone(), identity);
        Ok(key)
    }

    /// The cached identity for an item, if any.
    pub fn identity(&self, item_hash_hex: &str) -> Option<&ItemIdentity> {
        let (_, key) = parse_item_hash(item_hash_hex).ok()?;
        self.items.get(&key)
    }

    /// The cached identity for an item, or the one this wallet created.
    ///
    /// Fails with `NotOwner` if the item is neither cached nor ours.
    fn owned_identity(&mut self, hash: &ItemHash, key: &str) -> Result<&ItemIdentity> {
        if !self.items.contains_key(key) {
            let identity = ItemIdentity::recover_from_hash(&self.master_keys()?.item, hash)?;
            tracing::debug!(item = %key, "recovered item identity from hash");
            self.items.insert(key.to_string(), identity);
        }
        self.items
            .get(key)
            .ok_or_else(|| WalletError::ChatKeysUnavailable(key.to_string()))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Access delegation
    // ─────────────────────────────────────────────────────────────────────────

    /// This wallet's access public key for an item, in hex.
    ///
    /// Hand it to the item owner to be granted access.
    pub fn request_access(&self, item_hash_hex: &str) -> Result<String> {
        let (hash, _) = parse_item_hash(item_hash_hex)?;
        let keypair = AccessKeypair::derive(&self.master_keys()?.access, &hash);
        Ok(keypair.public_key().to_hex())
    }

    /// Seal the seed of an item this wallet owns to a requester's access key.
    pub fn access_envelope_for(
        &mut self,
        item_hash_hex: &str,
        recipient_public_key_hex: &str,
    ) -> Result<AccessEnvelope> {
        let (hash, key) = parse_item_hash(item_hash_hex)?;
        let recipient = AccessPublicKey::from_hex(recipient_public_key_hex)?;
        let owner = AccessKeypair::derive(&self.master_keys()?.access, &hash);

        let identity = self.owned_identity(&hash, &key)?;
        Ok(AccessEnvelope::give(identity.seed(), &recipient, &owner)?)
    }

    /// Grant a requester access to an item and post the envelope.
    pub async fn give_access(
        &mut self,
        item_hash_hex: &str,
        recipient_public_key_hex: &str,
    ) -> Result<()> {
        let envelope = self.access_envelope_for(item_hash_hex, recipient_public_key_hex)?;
        let (_, key) = parse_item_hash(item_hash_hex)?;
        self.transport.subscribe_to_chat(&key, Some(envelope)).await?;
        Ok(())
    }

    /// Rebuild an item identity from delivered access envelopes.
    ///
    /// Candidates are tried in order. A seed whose public key does not match
    /// the item hash prefix is skipped. `None` if no envelope sealed for this
    /// wallet carries the item's seed.
    pub fn identity_from_access_envelopes<'a, I>(
        &self,
        item_hash_hex: &str,
        envelopes: I,
    ) -> Result<Option<ItemIdentity>>
    where
        I: IntoIterator<Item = &'a AccessEnvelope>,
    {
        let (hash, key) = parse_item_hash(item_hash_hex)?;
        let keypair = AccessKeypair::derive(&self.master_keys()?.access, &hash);

        Ok(envelopes
            .into_iter()
            .filter_map(|envelope| find_seed([envelope], &keypair))
            .map(ItemIdentity::from_seed)
            .find(|identity| {
                let matches = hash.matches_public_key(&identity.public_key());
                if !matches {
                    tracing::debug!(item = %key, "access envelope carries a seed for another item");
                }
                matches
            }))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Chat
    // ─────────────────────────────────────────────────────────────────────────

    /// Build the payload for a message without sending it.
    ///
    /// `user` defaults to the configured wallet name.
    pub fn seal_message(
        &self,
        item_hash_hex: &str,
        text: &str,
        user: Option<&str>,
    ) -> Result<ChatPayload> {
        let (_, key) = parse_item_hash(item_hash_hex)?;
        let identity = self
            .items
            .get(&key)
            .ok_or(WalletError::ChatKeysUnavailable(key))?;

        let message = MessageObject::new(text, user.unwrap_or(&self.config.name));
        message.check_text_len(self.config.max_text_len)?;
        Ok(seal_message(&message, identity)?)
    }

    /// Encrypt, sign and post a message to an item's chat.
    pub async fn send_message(
        &self,
        item_hash_hex: &str,
        text: &str,
        user: Option<&str>,
    ) -> Result<()> {
        let payload = self.seal_message(item_hash_hex, text, user)?;
        let (_, key) = parse_item_hash(item_hash_hex)?;
        self.transport.new_chat_message(&key, payload).await?;
        Ok(())
    }

    /// Subscribe to an item's chat.
    ///
    /// If the identity is not cached and this wallet created the item, it is
    /// recovered from the hash. Otherwise it is picked up later from the
    /// access envelopes delivered through the subscription.
    pub async fn join_chat(&mut self, item_hash_hex: &str) -> Result<ChatSubscription> {
        let (hash, key) = parse_item_hash(item_hash_hex)?;
        if !self.items.contains_key(&key) {
            match ItemIdentity::recover_from_hash(&self.master_keys()?.item, &hash) {
                Ok(identity) => {
                    tracing::debug!(item = %key, "joined own item");
                    self.items.insert(key.clone(), identity);
                }
                Err(CoreError::NotOwner) => {
                    tracing::debug!(item = %key, "not the owner, waiting for access keys");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(self.transport.subscribe_to_chat(&key, None).await?)
    }

    /// Fold one update into the wallet and return the messages it carries.
    ///
    /// Access envelopes are used to learn the item identity if it is not
    /// known yet. Payloads not signed by the item, or not readable with its
    /// chat key, are dropped.
    pub fn apply_update(
        &mut self,
        item_hash_hex: &str,
        update: &ChatUpdate,
    ) -> Result<Vec<MessageObject>> {
        let (_, key) = parse_item_hash(item_hash_hex)?;

        if !self.items.contains_key(&key) && !update.access_keys.is_empty() {
            match self.identity_from_access_envelopes(&key, &update.access_keys)? {
                Some(identity) => {
                    tracing::debug!(item = %key, "item identity received");
                    self.items.insert(key.clone(), identity);
                }
                None if !update.messages.is_empty() => {
                    return Err(WalletError::NoValidAccessKey(key));
                }
                None => {
                    tracing::debug!(item = %key, "no access key for this wallet yet");
                }
            }
        }

        if update.messages.is_empty() {
            return Ok(Vec::new());
        }
        let identity = self
            .items
            .get(&key)
            .ok_or(WalletError::ChatKeysUnavailable(key.clone()))?;

        let messages = open_messages(&update.messages, identity);
        let dropped = update.messages.len() - messages.len();
        if dropped > 0 {
            tracing::debug!(item = %key, dropped, "dropped payloads not for this item");
        }
        Ok(messages)
    }

    /// Wait for the next update on `subscription` and return its messages.
    pub async fn next_messages(
        &mut self,
        subscription: &mut ChatSubscription,
    ) -> Result<Vec<MessageObject>> {
        let update = subscription.next().await.ok_or(SyncError::Closed)?;
        let key = subscription.item_hash_hex().to_string();
        self.apply_update(&key, &update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdchat_chat::ChatError;
    use hdchat_sync::{MemoryRelay, MemoryTransport};

    fn wallet(relay: &std::sync::Arc<MemoryRelay>, fill: u8, name: &str) -> HdWallet<MemoryTransport> {
        HdWallet::with_root_secret(
            relay.connect(),
            WalletConfig::named(name),
            &RootSecret::new([fill; 32]).unwrap(),
        )
    }

    #[test]
    fn test_uninitialized_wallet_fails_fast() {
        let relay = MemoryRelay::new();
        let mut wallet = HdWallet::new(relay.connect(), WalletConfig::default());

        assert!(!wallet.is_ready());
        assert!(matches!(wallet.create_item(), Err(WalletError::NotInitialized)));
        assert!(matches!(
            wallet.request_access(&"00".repeat(32)),
            Err(WalletError::NotInitialized)
        ));

        wallet.set_master_keys(&RootSecret::new([1u8; 32]).unwrap());
        assert!(wallet.is_ready());
        assert!(wallet.create_item().is_ok());
    }

    #[test]
    fn test_set_master_keys_keeps_existing() {
        let relay = MemoryRelay::new();
        let mut wallet = wallet(&relay, 1, "alice");
        let before = wallet.request_access(&"00".repeat(32)).unwrap();

        wallet.set_master_keys(&RootSecret::new([2u8; 32]).unwrap());
        assert_eq!(wallet.request_access(&"00".repeat(32)).unwrap(), before);
    }

    #[test]
    fn test_create_item_caches_identity() {
        let relay = MemoryRelay::new();
        let mut wallet = wallet(&relay, 1, "alice");

        let hex = wallet.create_item().unwrap();
        assert_eq!(hex.len(), 64);
        assert_eq!(hex, hex.to_ascii_lowercase());

        let identity = wallet.identity(&hex).unwrap();
        assert!(ItemHash::from_hex(&hex)
            .unwrap()
            .matches_public_key(&identity.public_key()));
        assert!(wallet.identity(&hex.to_uppercase()).is_some());
    }

    #[test]
    fn test_envelope_for_foreign_item_is_not_owner() {
        let relay = MemoryRelay::new();
        let mut alice = wallet(&relay, 1, "alice");
        let mut bob = wallet(&relay, 2, "bob");

        let hex = bob.create_item().unwrap();
        let access = alice.request_access(&hex).unwrap();
        assert!(matches!(
            alice.access_envelope_for(&hex, &access),
            Err(WalletError::Core(CoreError::NotOwner))
        ));
    }

    #[test]
    fn test_owner_recovers_identity_without_cache() {
        let relay = MemoryRelay::new();
        let mut alice = wallet(&relay, 1, "alice");
        let hex = alice.create_item().unwrap();
        let expected = alice.identity(&hex).unwrap().public_key();

        // Same root secret, empty cache.
        let mut again = wallet(&relay, 1, "alice");
        let bob = wallet(&relay, 2, "bob");
        let envelope = again
            .access_envelope_for(&hex, &bob.request_access(&hex).unwrap())
            .unwrap();

        assert_eq!(again.identity(&hex).unwrap().public_key(), expected);
        let identity = bob
            .identity_from_access_envelopes(&hex, [&envelope])
            .unwrap()
            .unwrap();
        assert_eq!(identity.public_key(), expected);
    }

    #[test]
    fn test_access_envelope_for_another_item_is_ignored() {
        let relay = MemoryRelay::new();
        let mut alice = wallet(&relay, 1, "alice");
        let bob = wallet(&relay, 2, "bob");
        let mut eve = wallet(&relay, 3, "eve");

        let hex = alice.create_item().unwrap();
        let bob_key = bob.request_access(&hex).unwrap();

        // Eve seals the seed of her own item to Bob's published access key.
        let eve_item = eve.create_item().unwrap();
        let foreign = eve.access_envelope_for(&eve_item, &bob_key).unwrap();
        let genuine = alice.access_envelope_for(&hex, &bob_key).unwrap();

        assert!(bob
            .identity_from_access_envelopes(&hex, [&foreign])
            .unwrap()
            .is_none());

        let identity = bob
            .identity_from_access_envelopes(&hex, [&foreign, &genuine])
            .unwrap()
            .unwrap();
        assert_eq!(
            identity.public_key(),
            alice.identity(&hex).unwrap().public_key()
        );
    }

    #[test]
    fn test_seal_message_requires_identity() {
        let relay = MemoryRelay::new();
        let alice = wallet(&relay, 1, "alice");
        assert!(matches!(
            alice.seal_message(&"ab".repeat(32), "hi", None),
            Err(WalletError::ChatKeysUnavailable(_))
        ));
    }

    #[test]
    fn test_seal_message_enforces_text_limit() {
        let relay = MemoryRelay::new();
        let mut alice = HdWallet::with_root_secret(
            relay.connect(),
            WalletConfig {
                name: "alice".into(),
                max_text_len: 5,
            },
            &RootSecret::new([1u8; 32]).unwrap(),
        );
        let hex = alice.create_item().unwrap();

        assert!(alice.seal_message(&hex, "hello", None).is_ok());
        assert!(matches!(
            alice.seal_message(&hex, "hello!", None),
            Err(WalletError::Chat(ChatError::TextTooLong { len: 6, max: 5 }))
        ));
    }

    #[test]
    fn test_apply_update_uses_default_name() {
        let relay = MemoryRelay::new();
        let mut alice = wallet(&relay, 1, "alice");
        let hex = alice.create_item().unwrap();

        let payload = alice.seal_message(&hex, "hi", None).unwrap();
        let messages = alice
            .apply_update(&hex, &ChatUpdate::message(payload))
            .unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].user, "alice");
    }

    #[test]
    fn test_apply_update_without_keys() {
        let relay = MemoryRelay::new();
        let mut alice = wallet(&relay, 1, "alice");
        let mut bob = wallet(&relay, 2, "bob");
        let hex = alice.create_item().unwrap();
        let payload = alice.seal_message(&hex, "hi", None).unwrap();

        // Nothing to open yet.
        assert!(bob.apply_update(&hex, &ChatUpdate::default()).unwrap().is_empty());

        assert!(matches!(
            bob.apply_update(&hex, &ChatUpdate::message(payload.clone())),
            Err(WalletError::ChatKeysUnavailable(_))
        ));

        let update = ChatUpdate {
            access_keys: vec![AccessEnvelope::from_wire("garbage")],
            messages: vec![payload],
        };
        assert!(matches!(
            bob.apply_update(&hex, &update),
            Err(WalletError::NoValidAccessKey(_))
        ));
    }
}

//! Test fixtures and helpers.
//!
//! Common setup code for multi-wallet chat tests.

use std::sync::Arc;

use hdchat::{HdWallet, MemoryRelay, MemoryTransport, Result, RootSecret, WalletConfig};

/// Deterministic root secret for party `index`.
pub fn party_root(index: usize) -> RootSecret {
    let mut bytes = [0u8; 32];
    bytes[..8].copy_from_slice(&(index as u64).to_be_bytes());
    bytes[31] = 0x5a;
    RootSecret::new(bytes).expect("32 bytes is a valid root secret")
}

/// Create wallets for `count` parties, all connected to `relay`.
///
/// Party `i` is named `party-{i}`.
pub fn multi_party_wallets(
    relay: &Arc<MemoryRelay>,
    count: usize,
) -> Vec<HdWallet<MemoryTransport>> {
    (0..count)
        .map(|i| {
            HdWallet::with_root_secret(
                relay.connect(),
                WalletConfig::named(format!("party-{i}")),
                &party_root(i),
            )
        })
        .collect()
}

/// An item owned by one wallet, with access given to the others.
pub struct ChatFixture {
    pub relay: Arc<MemoryRelay>,
    pub owner: HdWallet<MemoryTransport>,
    pub members: Vec<HdWallet<MemoryTransport>>,
    pub item: String,
}

impl ChatFixture {
    /// Create an owner, `member_count` members and one shared item.
    pub async fn new(member_count: usize) -> Result<Self> {
        let relay = MemoryRelay::new();
        let mut wallets = multi_party_wallets(&relay, member_count + 1);
        let mut owner = wallets.remove(0);
        let members = wallets;

        let item = owner.create_item()?;
        for member in &members {
            let key = member.request_access(&item)?;
            owner.give_access(&item, &key).await?;
        }

        Ok(Self {
            relay,
            owner,
            members,
            item,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_party_roots_are_distinct() {
        let a = hdchat::MasterKeys::derive(&party_root(0));
        let b = hdchat::MasterKeys::derive(&party_root(1));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_every_member_joins() {
        let mut fixture = ChatFixture::new(3).await.unwrap();
        assert_eq!(fixture.relay.access_keys(&fixture.item).await.len(), 3);

        let item = fixture.item.clone();
        fixture.owner.send_message(&item, "welcome", None).await.unwrap();

        for member in &mut fixture.members {
            let mut chat = member.join_chat(&item).await.unwrap();
            let messages = member.next_messages(&mut chat).await.unwrap();
            assert_eq!(messages.len(), 1);
            assert_eq!(messages[0].text, "welcome");
            assert_eq!(messages[0].user, "party-0");
        }
    }

    #[tokio::test]
    async fn test_members_share_identity() {
        let mut fixture = ChatFixture::new(2).await.unwrap();
        let item = fixture.item.clone();
        let expected = fixture.owner.identity(&item).unwrap().public_key();

        for member in &mut fixture.members {
            let mut chat = member.join_chat(&item).await.unwrap();
            member.next_messages(&mut chat).await.unwrap();
            assert_eq!(member.identity(&item).unwrap().public_key(), expected);
        }
    }
}

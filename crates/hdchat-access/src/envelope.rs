//! The access delegation envelope.
//!
//! The owner of an item seals the 64-byte item seed to the requester's
//! access public key with its own access secret key, and attaches its
//! access public key so the requester can open the box:
//!
//! ```text
//! base64(nonce) '.' base64(box(seed)) ':' base64(owner_access_public_key)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroize;

use hdchat_core::crypto::{box_open, box_seal};
use hdchat_core::encoding::{decode_base64, encode_base64};
use hdchat_core::{AccessKeypair, AccessPublicKey, ItemSeed, SealedBox, PAYLOAD_DELIMITER};

use crate::error::{AccessError, Result};

/// An access envelope in its wire form.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessEnvelope(String);

impl AccessEnvelope {
    /// Seal `seed` for `recipient`, authenticated by the owner's access keypair.
    pub fn give(
        seed: &ItemSeed,
        recipient: &AccessPublicKey,
        owner: &AccessKeypair,
    ) -> Result<Self> {
        let sealed = box_seal(seed.as_bytes(), recipient, owner.secret_key())?;
        Ok(Self(format!(
            "{}{}{}",
            sealed.to_wire(),
            PAYLOAD_DELIMITER,
            encode_base64(owner.public_key())
        )))
    }

    /// Wrap a wire value received from a transport. Parsing is deferred to
    /// [`AccessEnvelope::get`].
    pub fn from_wire(wire: impl Into<String>) -> Self {
        Self(wire.into())
    }

    /// The wire value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into the sealed box and the sender's claimed public key.
    pub fn parse(&self) -> Result<(SealedBox, AccessPublicKey)> {
        let mut fields = self.0.split(PAYLOAD_DELIMITER);
        let (Some(sealed), Some(sender), None) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(AccessError::MalformedEnvelope(
                "expected exactly two ':'-separated fields".into(),
            ));
        };
        if sealed.is_empty() || sender.is_empty() {
            return Err(AccessError::MalformedEnvelope("empty field".into()));
        }

        let sealed = SealedBox::from_wire(sealed)?;
        let sender = AccessPublicKey::from_slice(&decode_base64("sender public key", sender)?)?;
        Ok((sealed, sender))
    }

    /// The access public key of whoever sealed this envelope.
    pub fn sender_public_key(&self) -> Result<AccessPublicKey> {
        self.parse().map(|(_, sender)| sender)
    }

    /// Try to open the envelope with the requester's access keypair.
    ///
    /// `Ok(None)` means the envelope was not sealed for this keypair (or was
    /// tampered with): not for me, try the next one. `Err` means the wire
    /// value itself is malformed.
    pub fn get(&self, recipient: &AccessKeypair) -> Result<Option<ItemSeed>> {
        let (sealed, sender) = self.parse()?;
        let Some(mut plaintext) = box_open(&sealed, &sender, recipient.secret_key()) else {
            return Ok(None);
        };

        let seed = ItemSeed::from_slice(&plaintext)
            .map_err(|_| AccessError::InvalidSeedLength(plaintext.len()));
        plaintext.zeroize();
        seed.map(Some)
    }
}

impl fmt::Debug for AccessEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head: String = self.0.chars().take(16).collect();
        write!(f, "AccessEnvelope({head}...)")
    }
}

impl fmt::Display for AccessEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for AccessEnvelope {
    fn from(wire: String) -> Self {
        Self(wire)
    }
}

/// Return the seed from the first candidate that opens for `recipient`.
///
/// Candidates are tried in the order given and the search stops at the
/// first success. Malformed candidates are skipped like foreign ones: they
/// arrive from an untrusted transport and must not hide a valid envelope
/// further down the list.
pub fn find_seed<'a, I>(candidates: I, recipient: &AccessKeypair) -> Option<ItemSeed>
where
    I: IntoIterator<Item = &'a AccessEnvelope>,
{
    for (index, candidate) in candidates.into_iter().enumerate() {
        match candidate.get(recipient) {
            Ok(Some(seed)) => {
                tracing::debug!(index, "access envelope opened");
                return Some(seed);
            }
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!(index, "skipping malformed access envelope: {}", e);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdchat_core::{ItemHash, ItemIdentity, ItemNonce, MasterKeys, RootSecret};

    struct Party {
        keys: MasterKeys,
    }

    impl Party {
        fn new(hex: &str) -> Self {
            Self {
                keys: MasterKeys::derive(&RootSecret::from_hex(hex).unwrap()),
            }
        }

        fn access(&self, item_hash: &ItemHash) -> AccessKeypair {
            AccessKeypair::derive(&self.keys.access, item_hash)
        }
    }

    fn owner() -> Party {
        Party::new("348ce564d427a3311b6536bbcff9390d69395b06ed6c486954e971d960fe8709")
    }

    fn requester() -> Party {
        Party::new("d7325de5c2c1cf0009fac77d3d04a9c004b038883446b065871bc3e831dcd098")
    }

    fn item(owner: &Party) -> ItemIdentity {
        ItemIdentity::from_nonce(&owner.keys.item, &ItemNonce::from_bytes([0, 0, 0, 0, 0, 0, 0, 1]))
    }

    #[test]
    fn test_give_get_roundtrip() {
        let (owner, requester) = (owner(), requester());
        let item = item(&owner);
        let hash = *item.hash().unwrap();

        let requester_kp = requester.access(&hash);
        let envelope = AccessEnvelope::give(item.seed(), requester_kp.public_key(), &owner.access(&hash)).unwrap();

        let seed = envelope.get(&requester_kp).unwrap().unwrap();
        assert_eq!(&seed, item.seed());
    }

    #[test]
    fn test_wrong_recipient_is_soft_failure() {
        let (owner, requester) = (owner(), requester());
        let item = item(&owner);
        let hash = *item.hash().unwrap();

        let envelope = AccessEnvelope::give(
            item.seed(),
            requester.access(&hash).public_key(),
            &owner.access(&hash),
        )
        .unwrap();

        // A third party derives a different keypair for the same item.
        let stranger = Party::new("00112233445566778899aabbccddeeff");
        assert!(envelope.get(&stranger.access(&hash)).unwrap().is_none());
    }

    #[test]
    fn test_sender_public_key_is_owner_access_key() {
        let (owner, requester) = (owner(), requester());
        let item = item(&owner);
        let hash = *item.hash().unwrap();
        let owner_kp = owner.access(&hash);

        let envelope =
            AccessEnvelope::give(item.seed(), requester.access(&hash).public_key(), &owner_kp).unwrap();
        assert_eq!(&envelope.sender_public_key().unwrap(), owner_kp.public_key());
    }

    #[test]
    fn test_malformed_envelopes_are_hard_errors() {
        let kp = requester().access(&ItemHash::from_bytes([1; 32]));

        for wire in ["", "no-delimiter", "a.b:c:d", ":AAAA", "AAAA.AAAA:"] {
            let result = AccessEnvelope::from_wire(wire).get(&kp);
            assert!(result.is_err(), "expected error for {wire:?}");
        }
    }

    #[test]
    fn test_tampered_ciphertext_is_soft_failure() {
        let (owner, requester) = (owner(), requester());
        let item = item(&owner);
        let hash = *item.hash().unwrap();
        let requester_kp = requester.access(&hash);

        let envelope =
            AccessEnvelope::give(item.seed(), requester_kp.public_key(), &owner.access(&hash)).unwrap();
        let (mut sealed, sender) = envelope.parse().unwrap();
        sealed.ciphertext[0] ^= 0x01;
        let tampered = AccessEnvelope::from_wire(format!(
            "{}:{}",
            sealed.to_wire(),
            encode_base64(sender)
        ));

        assert!(tampered.get(&requester_kp).unwrap().is_none());
    }

    #[test]
    fn test_find_seed_takes_first_valid_in_order() {
        let (owner, requester) = (owner(), requester());
        let item = item(&owner);
        let hash = *item.hash().unwrap();
        let requester_kp = requester.access(&hash);
        let stranger = Party::new("00112233445566778899aabbccddeeff");

        let foreign = AccessEnvelope::give(
            item.seed(),
            stranger.access(&hash).public_key(),
            &owner.access(&hash),
        )
        .unwrap();
        let garbage = AccessEnvelope::from_wire("garbage");
        let valid =
            AccessEnvelope::give(item.seed(), requester_kp.public_key(), &owner.access(&hash)).unwrap();

        let candidates = vec![foreign, garbage, valid];
        let seed = find_seed(&candidates, &requester_kp).unwrap();
        assert_eq!(&seed, item.seed());
    }

    #[test]
    fn test_find_seed_none_when_nothing_opens() {
        let kp = requester().access(&ItemHash::from_bytes([1; 32]));
        let candidates = vec![AccessEnvelope::from_wire("garbage")];
        assert!(find_seed(&candidates, &kp).is_none());
        assert!(find_seed(&Vec::new(), &kp).is_none());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            #[test]
            fn prop_any_seed_is_delivered(seed in prop::collection::vec(any::<u8>(), 64), hash in any::<[u8; 32]>()) {
                let seed = ItemSeed::from_slice(&seed).unwrap();
                let hash = ItemHash::from_bytes(hash);
                let requester_kp = requester().access(&hash);
                let owner_kp = owner().access(&hash);

                let envelope = AccessEnvelope::give(&seed, requester_kp.public_key(), &owner_kp).unwrap();
                prop_assert_eq!(envelope.get(&requester_kp).unwrap(), Some(seed));
                prop_assert_eq!(envelope.get(&owner_kp).unwrap(), None);
            }
        }
    }
}

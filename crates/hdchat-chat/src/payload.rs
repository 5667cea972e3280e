//! Chat payload construction, verification and opening.
//!
//! ```text
//! envelope  = secretbox(json(message), chat_key)       "nonce.ciphertext"
//! signature = ed25519(utf8(envelope), item_secret_key)
//! payload   = envelope ':' base64(signature) ':' base64(item_public_key)
//! ```
//!
//! The signature covers the ciphertext, so a relay can check authorship
//! with [`verify_message`] without being able to read the message.

use serde::{Deserialize, Serialize};
use std::fmt;

use hdchat_core::crypto::{secretbox_open, secretbox_seal};
use hdchat_core::encoding::{decode_base64, encode_base64};
use hdchat_core::{Ed25519PublicKey, Ed25519Signature, ItemIdentity, SealedBox, PAYLOAD_DELIMITER};

use crate::error::{ChatError, Result};
use crate::message::MessageObject;

/// A chat payload in its wire form.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatPayload(String);

impl ChatPayload {
    /// Wrap a wire value received from a transport.
    pub fn from_wire(wire: impl Into<String>) -> Self {
        Self(wire.into())
    }

    /// The wire value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ChatPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head: String = self.0.chars().take(16).collect();
        write!(f, "ChatPayload({head}...)")
    }
}

impl fmt::Display for ChatPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ChatPayload {
    fn from(wire: String) -> Self {
        Self(wire)
    }
}

/// The three fields of a payload, decoded.
struct PayloadParts<'a> {
    envelope: &'a str,
    signature: Ed25519Signature,
    public_key: Ed25519PublicKey,
}

impl<'a> PayloadParts<'a> {
    fn parse(payload: &'a ChatPayload) -> Result<Self> {
        let fields: Vec<&str> = payload.0.split(PAYLOAD_DELIMITER).collect();
        let field = |index: usize, name: &'static str| {
            fields
                .get(index)
                .copied()
                .filter(|f| !f.is_empty())
                .ok_or(ChatError::MissingField(name))
        };

        let envelope = field(0, "envelope")?;
        let signature = field(1, "signature")?;
        let public_key = field(2, "public key")?;
        if fields.len() > 3 {
            return Err(ChatError::TooManyFields(fields.len()));
        }

        let signature = Ed25519Signature::from_slice(&decode_base64("signature", signature)?)?;
        let public_key = Ed25519PublicKey::from_slice(&decode_base64("public key", public_key)?)?;
        Ok(Self {
            envelope,
            signature,
            public_key,
        })
    }

    fn signature_is_valid(&self) -> bool {
        self.public_key
            .verify(self.envelope.as_bytes(), &self.signature)
    }
}

/// Seal an already-built message for `identity`.
pub fn seal_message(message: &MessageObject, identity: &ItemIdentity) -> Result<ChatPayload> {
    let json = serde_json::to_vec(message)?;
    let envelope = secretbox_seal(&json, identity.chat_key().as_bytes())?.to_wire();
    let signature = identity.sign(envelope.as_bytes());

    Ok(ChatPayload(format!(
        "{envelope}{d}{}{d}{}",
        encode_base64(signature),
        encode_base64(identity.public_key()),
        d = PAYLOAD_DELIMITER,
    )))
}

/// Build, encrypt and sign a message stamped with the current time.
pub fn send_message(
    text: impl Into<String>,
    user: impl Into<String>,
    identity: &ItemIdentity,
) -> Result<ChatPayload> {
    seal_message(&MessageObject::new(text, user), identity)
}

/// Check who signed a payload, without decrypting it.
///
/// Returns the embedded signer key if the signature is valid, `None` if it
/// is not. Structural problems (missing fields, bad base64) are errors.
pub fn verify_message(payload: &ChatPayload) -> Result<Option<Ed25519PublicKey>> {
    let parts = PayloadParts::parse(payload)?;
    Ok(parts.signature_is_valid().then_some(parts.public_key))
}

/// Verify and decrypt a payload addressed to `identity`.
///
/// Returns `None` when the signature is invalid, when the signer is not
/// `identity`, or when the envelope does not decrypt under its chat key.
pub fn open_message(payload: &ChatPayload, identity: &ItemIdentity) -> Result<Option<MessageObject>> {
    let parts = PayloadParts::parse(payload)?;
    if !parts.signature_is_valid() {
        return Ok(None);
    }
    if parts.public_key != identity.public_key() {
        return Ok(None);
    }

    let sealed = SealedBox::from_wire(parts.envelope)?;
    let Some(plaintext) = secretbox_open(&sealed, identity.chat_key().as_bytes()) else {
        return Ok(None);
    };
    Ok(Some(serde_json::from_slice(&plaintext)?))
}

/// Open a batch of payloads, dropping the ones not meant for `identity`.
///
/// Payloads that fail to open with a hard error are logged and skipped, so
/// one bad entry in a chat history does not hide the rest.
pub fn open_messages<'a, I>(payloads: I, identity: &ItemIdentity) -> Vec<MessageObject>
where
    I: IntoIterator<Item = &'a ChatPayload>,
{
    let mut messages = Vec::new();
    for (index, payload) in payloads.into_iter().enumerate() {
        match open_message(payload, identity) {
            Ok(Some(message)) => messages.push(message),
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!(index, "skipping unreadable chat payload: {}", e);
            }
        }
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdchat_core::encoding::decode_base64;
    use hdchat_core::{ItemNonce, MasterKeys, RootSecret};

    fn identity(nonce: u8) -> ItemIdentity {
        let keys = MasterKeys::derive(&RootSecret::new([0x42u8; 32]).unwrap());
        ItemIdentity::from_nonce(&keys.item, &ItemNonce::from_bytes([0, 0, 0, 0, 0, 0, 0, nonce]))
    }

    fn fields(payload: &ChatPayload) -> Vec<String> {
        payload.as_str().split(':').map(String::from).collect()
    }

    #[test]
    fn test_send_open_roundtrip() {
        let item = identity(1);
        let sent_at = crate::message::now_secs();
        let payload = send_message("hi", "alice", &item).unwrap();
        let message = open_message(&payload, &item).unwrap().unwrap();

        assert_eq!(message.text, "hi");
        assert_eq!(message.user, "alice");
        assert!(message.timestamp >= sent_at && message.timestamp - sent_at <= 5);
    }

    #[test]
    fn test_wire_layout() {
        let item = identity(1);
        let payload = send_message("hi", "alice", &item).unwrap();
        let parts = fields(&payload);

        assert_eq!(parts.len(), 3);
        assert!(parts[0].contains('.'));
        assert_eq!(decode_base64("sig", &parts[1]).unwrap().len(), 64);
        assert_eq!(decode_base64("pk", &parts[2]).unwrap(), item.public_key().as_bytes());
    }

    #[test]
    fn test_recipient_from_seed_can_open() {
        let item = identity(1);
        let recipient = ItemIdentity::from_seed(item.seed().clone());

        let payload = send_message("from creator", "seeker", &item).unwrap();
        assert_eq!(open_message(&payload, &recipient).unwrap().unwrap().text, "from creator");

        let reply = send_message("from recipient", "provider", &recipient).unwrap();
        assert_eq!(open_message(&reply, &item).unwrap().unwrap().text, "from recipient");
    }

    #[test]
    fn test_flipped_signature_bit_is_soft_failure() {
        let item = identity(1);
        let payload = send_message("hi", "alice", &item).unwrap();
        let parts = fields(&payload);

        let mut signature = decode_base64("sig", &parts[1]).unwrap();
        signature[10] ^= 0x01;
        let tampered = ChatPayload::from_wire(format!(
            "{}:{}:{}",
            parts[0],
            encode_base64(&signature),
            parts[2]
        ));

        assert!(open_message(&tampered, &item).unwrap().is_none());
        assert!(verify_message(&tampered).unwrap().is_none());
    }

    #[test]
    fn test_foreign_signer_is_soft_failure() {
        let item = identity(1);
        let other = identity(2);
        // Validly signed by `other`, opened as `item`.
        let payload = send_message("hi", "mallory", &other).unwrap();

        assert!(verify_message(&payload).unwrap().is_some());
        assert!(open_message(&payload, &item).unwrap().is_none());
    }

    #[test]
    fn test_wrong_chat_key_is_soft_failure() {
        let item = identity(1);
        let other = identity(2);
        let payload = send_message("hi", "alice", &item).unwrap();

        // Same signer, but an envelope sealed under another item's chat key.
        let parts = fields(&payload);
        let foreign_envelope = secretbox_seal(b"{}", other.chat_key().as_bytes())
            .unwrap()
            .to_wire();
        let signature = item.sign(foreign_envelope.as_bytes());
        let forged = ChatPayload::from_wire(format!(
            "{}:{}:{}",
            foreign_envelope,
            encode_base64(signature),
            parts[2]
        ));

        assert!(open_message(&forged, &item).unwrap().is_none());
    }

    #[test]
    fn test_missing_fields_are_errors() {
        let item = identity(1);
        let cases = [
            ("", "envelope"),
            ("abc", "signature"),
            ("abc:", "signature"),
            ("abc:AAAA", "public key"),
            ("abc:AAAA:", "public key"),
        ];

        for (wire, field) in cases {
            let err = open_message(&ChatPayload::from_wire(wire), &item).unwrap_err();
            assert_eq!(err.to_string(), format!("payload does not contain {field}"));
        }
    }

    #[test]
    fn test_bad_base64_is_error() {
        let item = identity(1);
        let payload = ChatPayload::from_wire("abc.def:!!!:AAAA");
        assert!(matches!(
            open_message(&payload, &item),
            Err(ChatError::CoreError(_))
        ));
        assert!(verify_message(&payload).is_err());
    }

    #[test]
    fn test_verify_message_returns_signer() {
        let item = identity(3);
        let payload = send_message("hi", "alice", &item).unwrap();
        assert_eq!(verify_message(&payload).unwrap(), Some(item.public_key()));
    }

    #[test]
    fn test_open_messages_filters_soft_failures() {
        let item = identity(1);
        let other = identity(2);
        let payloads = vec![
            send_message("one", "a", &item).unwrap(),
            send_message("foreign", "b", &other).unwrap(),
            send_message("two", "a", &item).unwrap(),
        ];

        let texts: Vec<_> = open_messages(&payloads, &item)
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert_eq!(texts, vec!["one", "two"]);
    }

    #[test]
    fn test_open_messages_skips_unreadable_payloads() {
        let item = identity(1);

        // Signed by the item and sealed under its chat key, but not a message.
        let envelope = secretbox_seal(b"not json", item.chat_key().as_bytes())
            .unwrap()
            .to_wire();
        let signature = item.sign(envelope.as_bytes());
        let not_json = ChatPayload::from_wire(format!(
            "{}:{}:{}",
            envelope,
            encode_base64(signature),
            encode_base64(item.public_key())
        ));
        assert!(matches!(
            open_message(&not_json, &item),
            Err(ChatError::InvalidMessage(_))
        ));

        let payloads = vec![
            send_message("one", "a", &item).unwrap(),
            not_json,
            ChatPayload::from_wire("garbage"),
            send_message("two", "a", &item).unwrap(),
        ];
        let texts: Vec<_> = open_messages(&payloads, &item)
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert_eq!(texts, vec!["one", "two"]);
    }
}

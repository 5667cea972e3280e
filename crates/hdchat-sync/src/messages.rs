//! Updates pushed from a relay to chat subscribers.

use serde::{Deserialize, Serialize};

use hdchat_access::AccessEnvelope;
use hdchat_chat::ChatPayload;

/// A change to an item's chat as seen by the relay.
///
/// The first update of a subscription carries everything the relay holds for
/// the item. Later updates carry only what was added since.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatUpdate {
    /// Access envelopes posted for the item, in arrival order.
    #[serde(rename = "accessKeys")]
    pub access_keys: Vec<AccessEnvelope>,
    /// Chat payloads posted for the item, in arrival order.
    pub messages: Vec<ChatPayload>,
}

impl ChatUpdate {
    /// An update carrying a single access envelope.
    pub fn access_key(envelope: AccessEnvelope) -> Self {
        Self {
            access_keys: vec![envelope],
            messages: Vec::new(),
        }
    }

    /// An update carrying a single chat payload.
    pub fn message(payload: ChatPayload) -> Self {
        Self {
            access_keys: Vec::new(),
            messages: vec![payload],
        }
    }

    /// True if the update carries nothing.
    pub fn is_empty(&self) -> bool {
        self.access_keys.is_empty() && self.messages.is_empty()
    }
}

//! The plaintext carried inside a chat payload.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{ChatError, Result};

/// Default upper bound on message text, in characters.
pub const MAX_TEXT_LEN: usize = 2000;

/// One chat message, serialized as JSON before encryption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageObject {
    /// Message body.
    pub text: String,
    /// Free-form sender identifier.
    pub user: String,
    /// Unix time in seconds at which the message was sealed.
    pub timestamp: u64,
}

impl MessageObject {
    /// Build a message stamped with the current time.
    pub fn new(text: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            user: user.into(),
            timestamp: now_secs(),
        }
    }

    /// Reject text longer than `max` characters.
    pub fn check_text_len(&self, max: usize) -> Result<()> {
        let len = self.text.chars().count();
        if len > max {
            return Err(ChatError::TextTooLong { len, max });
        }
        Ok(())
    }
}

/// Current Unix time in whole seconds.
pub(crate) fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_field_names() {
        let message = MessageObject {
            text: "hi".into(),
            user: "alice".into(),
            timestamp: 1_700_000_000,
        };
        let json = serde_json::to_string(&message).unwrap();
        assert_eq!(json, r#"{"text":"hi","user":"alice","timestamp":1700000000}"#);
    }

    #[test]
    fn test_new_stamps_current_time() {
        let before = now_secs();
        let message = MessageObject::new("hi", "alice");
        let after = now_secs();

        assert!(message.timestamp >= before && message.timestamp <= after);
    }

    #[test]
    fn test_text_length_counts_characters() {
        let message = MessageObject::new("é".repeat(MAX_TEXT_LEN), "alice");
        assert!(message.check_text_len(MAX_TEXT_LEN).is_ok());

        let message = MessageObject::new("x".repeat(MAX_TEXT_LEN + 1), "alice");
        assert!(matches!(
            message.check_text_len(MAX_TEXT_LEN),
            Err(ChatError::TextTooLong { len, max }) if len == MAX_TEXT_LEN + 1 && max == MAX_TEXT_LEN
        ));
    }
}

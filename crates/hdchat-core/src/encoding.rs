//! Wire encoding shared by access envelopes and chat payloads.
//!
//! Binary values are standard padded base64 when embedded in delimited
//! strings. Neither delimiter belongs to the base64 alphabet
//! (`A-Za-z0-9+/=`), so splitting never cuts through an encoded value.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::crypto::{to_array, BOX_NONCE_LEN};
use crate::error::{CoreError, Result};

/// Separates the fields of access envelopes and chat payloads.
pub const PAYLOAD_DELIMITER: char = ':';

/// Separates the nonce from the ciphertext inside a sealed box.
pub const CIPHER_DELIMITER: char = '.';

/// Encode bytes as standard padded base64.
pub fn encode_base64(bytes: impl AsRef<[u8]>) -> String {
    STANDARD.encode(bytes)
}

/// Decode standard padded base64, naming the field on failure.
pub fn decode_base64(field: &str, encoded: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(encoded)
        .map_err(|e| CoreError::DecodingError(format!("{field} is not valid base64: {e}")))
}

/// Output of box / secretbox: a fresh nonce plus the authenticated ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedBox {
    /// Random 24-byte nonce, unique per encryption.
    pub nonce: [u8; BOX_NONCE_LEN],
    /// Ciphertext including the Poly1305 tag.
    pub ciphertext: Vec<u8>,
}

impl SealedBox {
    /// Wire form: `base64(nonce) '.' base64(ciphertext)`.
    pub fn to_wire(&self) -> String {
        format!(
            "{}{}{}",
            encode_base64(self.nonce),
            CIPHER_DELIMITER,
            encode_base64(&self.ciphertext)
        )
    }

    /// Parse the wire form produced by [`SealedBox::to_wire`].
    pub fn from_wire(wire: &str) -> Result<Self> {
        let (nonce, ciphertext) = wire.split_once(CIPHER_DELIMITER).ok_or_else(|| {
            CoreError::DecodingError("sealed box does not contain a nonce delimiter".into())
        })?;
        if ciphertext.contains(CIPHER_DELIMITER) {
            return Err(CoreError::DecodingError(
                "sealed box contains more than two fields".into(),
            ));
        }

        let nonce = to_array("nonce", &decode_base64("nonce", nonce)?)?;
        let ciphertext = decode_base64("ciphertext", ciphertext)?;
        Ok(Self { nonce, ciphertext })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimiters_outside_base64_alphabet() {
        let alphabet = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/=";
        assert!(!alphabet.contains(PAYLOAD_DELIMITER));
        assert!(!alphabet.contains(CIPHER_DELIMITER));
    }

    #[test]
    fn test_sealed_box_wire_layout() {
        let sealed = SealedBox {
            nonce: [0u8; BOX_NONCE_LEN],
            ciphertext: vec![0xff; 3],
        };
        assert_eq!(sealed.to_wire(), "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA.////");
        assert_eq!(SealedBox::from_wire(&sealed.to_wire()).unwrap(), sealed);
    }

    #[test]
    fn test_sealed_box_rejects_missing_delimiter() {
        assert!(SealedBox::from_wire("AAAA").is_err());
    }

    #[test]
    fn test_sealed_box_rejects_short_nonce() {
        assert!(matches!(
            SealedBox::from_wire("AAAA.AAAA"),
            Err(CoreError::InvalidLength { what: "nonce", .. })
        ));
    }

    #[test]
    fn test_decode_base64_names_field() {
        let err = decode_base64("signature", "not base64!").unwrap_err();
        assert!(err.to_string().contains("signature"));
    }
}

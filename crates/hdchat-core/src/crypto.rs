//! Primitive adapter for the HD chat protocol.
//!
//! Wraps SHA-512, Ed25519 detached signatures, X25519 box keypairs,
//! Curve25519-XSalsa20-Poly1305 (box) and XSalsa20-Poly1305 (secretbox)
//! with strong types. Everything above this module is written against
//! these wrappers only.

use crypto_box::aead::generic_array::GenericArray;
use crypto_box::aead::Aead;
use crypto_box::SalsaBox;
use crypto_secretbox::aead::KeyInit;
use crypto_secretbox::XSalsa20Poly1305;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::encoding::SealedBox;
use crate::error::{CoreError, Result};

/// Length of a SHA-512 digest.
pub const HASH_LEN: usize = 64;

/// Length of the nonce used by both box and secretbox.
pub const BOX_NONCE_LEN: usize = 24;

/// SHA-512 over the concatenation of `parts`.
///
/// Feeding the parts to the hasher in order is byte-identical to hashing
/// the concatenated buffer.
pub fn hash_concat(parts: &[&[u8]]) -> [u8; HASH_LEN] {
    let mut hasher = Sha512::new();
    for part in parts {
        hasher.update(part);
    }
    let digest = hasher.finalize();
    let mut out = [0u8; HASH_LEN];
    out.copy_from_slice(&digest);
    out
}

/// Fill a fixed-size array from the thread-local CSPRNG.
pub fn random_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

/// Copy a slice into a fixed-size array, reporting what was being parsed.
pub(crate) fn to_array<const N: usize>(what: &'static str, bytes: &[u8]) -> Result<[u8; N]> {
    bytes.try_into().map_err(|_| CoreError::InvalidLength {
        what,
        expected: N,
        actual: bytes.len(),
    })
}

/// A 32-byte Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ed25519PublicKey(pub [u8; 32]);

impl Ed25519PublicKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse from a slice, rejecting anything that is not 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        to_array("ed25519 public key", bytes).map(Self)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Check a detached signature over `message`.
    ///
    /// Returns `false` both for a bad signature and for bytes that do not
    /// decode to a curve point: either way the message was not signed by
    /// this key.
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.0) else {
            return false;
        };
        let sig = Signature::from_bytes(&signature.0);
        verifying_key.verify(message, &sig).is_ok()
    }
}

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Pub({})", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for Ed25519PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Ed25519PublicKey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// A 64-byte detached Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ed25519Signature(pub [u8; 64]);

impl Ed25519Signature {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Parse from a slice, rejecting anything that is not 64 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        to_array("ed25519 signature", bytes).map(Self)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Sig({}...)", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for Ed25519Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// An Ed25519 signing keypair derived from a 32-byte seed.
#[derive(Clone)]
pub struct SigningKeypair {
    signing_key: SigningKey,
}

impl SigningKeypair {
    /// Deterministic keypair from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Get the public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// The 64-byte secret key in NaCl layout: `seed || public_key`.
    pub fn secret_key_bytes(&self) -> [u8; 64] {
        self.signing_key.to_keypair_bytes()
    }

    /// Produce a detached signature.
    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        Ed25519Signature(self.signing_key.sign(message).to_bytes())
    }
}

impl fmt::Debug for SigningKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningKeypair({:?})", self.public_key())
    }
}

/// An X25519 public key used for authenticated public-key encryption.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct X25519PublicKey(pub [u8; 32]);

impl X25519PublicKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse from a slice, rejecting anything that is not 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        to_array("x25519 public key", bytes).map(Self)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim_start_matches("0x"))
            .map_err(|e| CoreError::DecodingError(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Debug for X25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X25519Pub({})", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for X25519PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// An X25519 secret key (32 bytes), wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct X25519SecretKey([u8; 32]);

impl X25519SecretKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Derive the matching public key (clamped scalar times the base point).
    pub fn public_key(&self) -> X25519PublicKey {
        let secret = x25519_dalek::StaticSecret::from(self.0);
        X25519PublicKey(*x25519_dalek::PublicKey::from(&secret).as_bytes())
    }

    fn salsa_box(&self, peer: &X25519PublicKey) -> SalsaBox {
        let secret = crypto_box::SecretKey::from(self.0);
        let public = crypto_box::PublicKey::from(peer.0);
        SalsaBox::new(&public, &secret)
    }
}

impl fmt::Debug for X25519SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("X25519Secret(<redacted>)")
    }
}

/// Authenticated public-key encryption to `recipient`, from `sender`.
pub fn box_seal(
    plaintext: &[u8],
    recipient: &X25519PublicKey,
    sender: &X25519SecretKey,
) -> Result<SealedBox> {
    let nonce: [u8; BOX_NONCE_LEN] = random_bytes();
    let ciphertext = sender
        .salsa_box(recipient)
        .encrypt(GenericArray::from_slice(&nonce), plaintext)
        .map_err(|e| CoreError::EncryptionError(format!("box seal failed: {e}")))?;
    Ok(SealedBox { nonce, ciphertext })
}

/// Open a box sealed by `sender` for `recipient`.
///
/// `None` means the box was not produced for this key pair, or was tampered
/// with.
pub fn box_open(
    sealed: &SealedBox,
    sender: &X25519PublicKey,
    recipient: &X25519SecretKey,
) -> Option<Vec<u8>> {
    recipient
        .salsa_box(sender)
        .decrypt(GenericArray::from_slice(&sealed.nonce), sealed.ciphertext.as_slice())
        .ok()
}

/// Authenticated symmetric encryption under a 32-byte key.
pub fn secretbox_seal(plaintext: &[u8], key: &[u8; 32]) -> Result<SealedBox> {
    let cipher = XSalsa20Poly1305::new_from_slice(key)
        .map_err(|e| CoreError::EncryptionError(e.to_string()))?;
    let nonce: [u8; BOX_NONCE_LEN] = random_bytes();
    let ciphertext = crypto_secretbox::aead::Aead::encrypt(
        &cipher,
        GenericArray::from_slice(&nonce),
        plaintext,
    )
    .map_err(|e| CoreError::EncryptionError(format!("secretbox seal failed: {e}")))?;
    Ok(SealedBox { nonce, ciphertext })
}

/// Open a secretbox. `None` on a wrong key or tampered data.
pub fn secretbox_open(sealed: &SealedBox, key: &[u8; 32]) -> Option<Vec<u8>> {
    let cipher = XSalsa20Poly1305::new_from_slice(key).ok()?;
    crypto_secretbox::aead::Aead::decrypt(
        &cipher,
        GenericArray::from_slice(&sealed.nonce),
        sealed.ciphertext.as_slice(),
    )
    .ok()
}

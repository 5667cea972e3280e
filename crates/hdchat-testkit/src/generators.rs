//! Proptest generators for property-based testing.

use proptest::prelude::*;

use hdchat_core::{
    ItemHash, ItemIdentity, ItemNonce, ItemSeed, MasterKeys, RootSecret, ITEM_NONCE_LEN,
};

/// Generate a valid root secret (16 to 64 bytes).
pub fn root_secret() -> impl Strategy<Value = RootSecret> {
    prop::collection::vec(any::<u8>(), 16..=64)
        .prop_map(|bytes| RootSecret::new(bytes).expect("length within bounds"))
}

/// Generate master keys from a random root secret.
pub fn master_keys() -> impl Strategy<Value = MasterKeys> {
    root_secret().prop_map(|root| MasterKeys::derive(&root))
}

/// Generate an item nonce.
pub fn item_nonce() -> impl Strategy<Value = ItemNonce> {
    any::<[u8; ITEM_NONCE_LEN]>().prop_map(ItemNonce::from_bytes)
}

/// Generate an arbitrary item hash (not necessarily owned by anyone).
pub fn item_hash() -> impl Strategy<Value = ItemHash> {
    any::<[u8; 32]>().prop_map(ItemHash::from_bytes)
}

/// Generate an item seed.
pub fn item_seed() -> impl Strategy<Value = ItemSeed> {
    prop::collection::vec(any::<u8>(), 64)
        .prop_map(|bytes| ItemSeed::from_slice(&bytes).expect("64 bytes"))
}

/// Generate message text of at most `max_len` characters.
pub fn message_text(max_len: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(any::<char>(), 0..=max_len).prop_map(|chars| chars.into_iter().collect())
}

/// Generate a user name.
pub fn user_name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 ._-]{0,23}".prop_map(String::from)
}

/// Parameters for creating an item.
#[derive(Debug, Clone)]
pub struct ItemParams {
    pub keys: MasterKeys,
    pub nonce: ItemNonce,
}

impl Arbitrary for ItemParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (master_keys(), item_nonce())
            .prop_map(|(keys, nonce)| ItemParams { keys, nonce })
            .boxed()
    }
}

/// Derive the identity described by `params`.
pub fn identity_from_params(params: &ItemParams) -> ItemIdentity {
    ItemIdentity::from_nonce(&params.keys.item, &params.nonce)
}

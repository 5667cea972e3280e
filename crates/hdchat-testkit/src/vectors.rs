//! Golden test vectors for deterministic derivation.
//!
//! Every implementation must derive the same master keys, item seeds, item
//! hashes and access public keys from the same root secret. Sealed boxes and
//! signatures over random nonces are not covered here.

use hdchat_core::{AccessKeypair, ItemIdentity, ItemNonce, MasterKeys, RootSecret};

/// A golden derivation vector for one wallet and one item nonce.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Root secret (hex).
    pub root_secret: &'static str,
    /// Item nonce.
    pub nonce: [u8; 8],
    /// Expected token master key (hex).
    pub expected_token_key: &'static str,
    /// Expected item master key (hex).
    pub expected_item_key: &'static str,
    /// Expected access master key (hex).
    pub expected_access_key: &'static str,
    /// Expected item seed for `nonce` (hex).
    pub expected_item_seed: &'static str,
    /// Expected item hash for `nonce` (hex).
    pub expected_item_hash: &'static str,
}

/// A golden vector for an access public key.
#[derive(Debug, Clone)]
pub struct AccessVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Root secret of the party deriving the key (hex).
    pub root_secret: &'static str,
    /// Item hash the key is for (hex).
    pub item_hash: &'static str,
    /// Expected access public key (hex).
    pub expected_public_key: &'static str,
}

/// Root secret of the "seeker" wallet used throughout the vectors.
pub const SEEKER_ROOT: &str = "348ce564d427a3311b6536bbcff9390d69395b06ed6c486954e971d960fe8709";

/// Root secret of the "provider" wallet used throughout the vectors.
pub const PROVIDER_ROOT: &str = "d7325de5c2c1cf0009fac77d3d04a9c004b038883446b065871bc3e831dcd098";

/// Item hash of the seeker's item with nonce 1.
pub const SEEKER_ITEM_HASH: &str =
    "1acd4a5f84b514fe570b8fff4341e4ada3f17468dda1421e0000000000000001";

/// Get all golden derivation vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "seeker, nonce 1",
            root_secret: SEEKER_ROOT,
            nonce: [0, 0, 0, 0, 0, 0, 0, 1],
            expected_token_key: "1f0f6f7702650afaf216698671311a061b8a5d950dc1745188e9846b75ab4366\
                                 6bbfb5b5e1058a70379d4c91e8bafd59850a3ec6de3637b1cf97ae01ecde02ec",
            expected_item_key: "ebc193296f08ed58582561684bb92ae7382cf3f5b7edfa53fe03d6bfa2183ff7\
                                73919064bf3b5c9826611fdede7b357e837699976daa363bfd261230aa7e00a0",
            expected_access_key: "4e8a5271ee1a9f5a34335f3e1d4ba7f22814ab650dcd1b9b6f7cdcca17250b2d\
                                  6b7e7a1a67afcee74a4177faf50ae811aeaad81cfcc5a750fb19b9810b8fdeda",
            expected_item_seed: "09d28b2e81d35e291689fc9ad402a170a69f154463ee8fd57b0d6e5b9b484a8e\
                                 ab9e4a9db24dd6112e9e9f60b97317d532aee609effd6951ba14ec94ff84cdd6",
            expected_item_hash: SEEKER_ITEM_HASH,
        },
        GoldenVector {
            name: "provider, nonce 1",
            root_secret: PROVIDER_ROOT,
            nonce: [0, 0, 0, 0, 0, 0, 0, 1],
            expected_token_key: "5385493138a1d9dc5b9f56acd7d2ebc78e04ce26c68c1feb5b8e06e8ee0acab4\
                                 fa11100e20d5d64d1f9eea09b8e7e23ce16358f44b247f2e522e6362456823e4",
            expected_item_key: "e11c645b22f863e75e812c6c3986f234ba6c9922af6cbc0ee3f4eb4b1cc8d216\
                                967acde30c8db9fc4b9e371f668128ffdee9e8f56eb47bbbd26c839bfb6e44fc",
            expected_access_key: "3ca969df61edf6e800cb0ca508e7bf83aa0eecb134bd6d2c4e625b558d88e256\
                                  8e10f661460b2cd2d633af22405edf66fde1ed9cf613cdb088fbaea358fd2baa",
            expected_item_seed: "db9de8a38fb77b91c4e64c6118b7e7630c20462da7a3c44c4075cda6a612761b\
                                 e4f004294a28ab5e2f6bda9aa6e50899a7dc773619f961a41819cdf102246ea0",
            expected_item_hash: "ddc8b23fb6a4fbadc77e9146c22d37c18fa1c15a3fbafd9e0000000000000001",
        },
    ]
}

/// Get all access public key vectors.
pub fn access_vectors() -> Vec<AccessVector> {
    vec![
        AccessVector {
            name: "seeker on own item",
            root_secret: SEEKER_ROOT,
            item_hash: SEEKER_ITEM_HASH,
            expected_public_key: "23aed5d58bd454f5a5a0eb785660e26857f4f32627e32a0030cda4a848683d0c",
        },
        AccessVector {
            name: "provider on seeker's item",
            root_secret: PROVIDER_ROOT,
            item_hash: SEEKER_ITEM_HASH,
            expected_public_key: "e346985a3e26182c9eee8870dec802542a4f395a4347f4c753c26dae890fb32c",
        },
    ]
}

/// Derive the master keys of a vector's wallet.
pub fn master_keys_from_vector(root_secret: &str) -> MasterKeys {
    // Vector roots are fixed, valid hex of valid length.
    let root = RootSecret::from_hex(root_secret).expect("valid vector root secret");
    MasterKeys::derive(&root)
}

/// Derive the item identity described by a vector.
pub fn identity_from_vector(vector: &GoldenVector) -> ItemIdentity {
    let keys = master_keys_from_vector(vector.root_secret);
    ItemIdentity::from_nonce(&keys.item, &ItemNonce::from_bytes(vector.nonce))
}

/// Verify all vectors against this implementation.
///
/// Returns `(name, matches, first mismatching field)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    let mut results = Vec::new();

    for v in all_vectors() {
        let keys = master_keys_from_vector(v.root_secret);
        let identity = identity_from_vector(&v);
        let hash = identity.hash().map(|h| h.to_hex()).unwrap_or_default();

        let checks = [
            ("token key", hex::encode(keys.token.as_bytes()), v.expected_token_key),
            ("item key", hex::encode(keys.item.as_bytes()), v.expected_item_key),
            ("access key", hex::encode(keys.access.as_bytes()), v.expected_access_key),
            ("item seed", hex::encode(identity.seed().as_bytes()), v.expected_item_seed),
            ("item hash", hash, v.expected_item_hash),
        ];
        let mismatch = checks
            .iter()
            .find(|(_, got, expected)| got != expected)
            .map(|(field, _, _)| field.to_string())
            .unwrap_or_default();

        results.push((v.name.to_string(), mismatch.is_empty(), mismatch));
    }

    for v in access_vectors() {
        let keys = master_keys_from_vector(v.root_secret);
        let hash = hdchat_core::ItemHash::from_hex(v.item_hash).expect("valid vector item hash");
        let got = AccessKeypair::derive(&keys.access, &hash).public_key().to_hex();
        let matches = got == v.expected_public_key;
        results.push((v.name.to_string(), matches, if matches { String::new() } else { got }));
    }

    results
}

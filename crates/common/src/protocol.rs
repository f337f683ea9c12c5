//! Value types and size constants exchanged across the bridge boundary.
//!
//! [`SealedBox`] serialises with the keys the mobile hosts already read from
//! the encrypt result dictionary: `encrypted` for the ciphertext and `gmac`
//! for the authentication tag.

use serde::{Deserialize, Serialize};

/// AES block length in bytes.
pub const BLOCK_LEN: usize = 16;

/// AES-GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// AES-CMAC output length in bytes.
pub const MAC_LEN: usize = BLOCK_LEN;

/// SHA-256 digest length in bytes.
pub const DIGEST_LEN: usize = 32;

/// Standard AES-GCM nonce length in bytes, and the shortest one accepted.
pub const NONCE_LEN: usize = 12;

/// Output of an AES-GCM encryption: ciphertext plus detached tag.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedBox {
    /// Ciphertext, same length as the plaintext.
    #[serde(rename = "encrypted")]
    pub ciphertext: Vec<u8>,
    /// GCM authentication tag over ciphertext and AAD.
    #[serde(rename = "gmac")]
    pub tag: [u8; TAG_LEN],
}

impl SealedBox {
    /// Construct a [`SealedBox`] from its parts.
    pub fn new(ciphertext: Vec<u8>, tag: [u8; TAG_LEN]) -> Self {
        Self { ciphertext, tag }
    }

    /// Split into `(ciphertext, tag)`.
    pub fn into_parts(self) -> (Vec<u8>, [u8; TAG_LEN]) {
        (self.ciphertext, self.tag)
    }
}

impl std::fmt::Debug for SealedBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SealedBox")
            .field("ciphertext_len", &self.ciphertext.len())
            .field("tag_len", &self.tag.len())
            .finish()
    }
}

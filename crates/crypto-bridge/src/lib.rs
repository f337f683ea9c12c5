//! Stateless cryptographic bridge for the mobile-ID SDK.
//!
//! Exposes the four operations the closed SDK binary calls into:
//!
//! | operation        | output                          |
//! |------------------|---------------------------------|
//! | [`hash`]         | 32-byte SHA-256 digest          |
//! | [`aead_encrypt`] | AES-GCM ciphertext + 16-byte tag |
//! | [`aead_decrypt`] | verified plaintext              |
//! | [`cmac`]         | 16-byte AES-CMAC                |
//!
//! Every call is pure and reentrant; nothing is cached between calls.

pub mod bridge;
pub mod crypto;

pub use bridge::{aead_decrypt, aead_encrypt, cmac, hash};
pub use common::protocol::{BLOCK_LEN, DIGEST_LEN, MAC_LEN, NONCE_LEN, TAG_LEN};
pub use common::{CryptoError, FailureKind, SealedBox};

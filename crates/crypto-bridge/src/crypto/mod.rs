//! Cryptographic primitives behind the bridge.
//!
//! These functions return `Result<_, CryptoError>` so the failure reason stays
//! visible to tests and logs. The [`crate::bridge`] facade is the only place
//! that turns them into caller-facing `Option`s.

pub mod block;
pub mod cmac;
pub mod gcm;
pub mod hash;
mod long_nonce;

pub use cmac::aes_cmac;
pub use gcm::{open, seal};
pub use hash::sha256;

//! Common types and errors shared across the crypto bridge crates.

pub mod error;
pub mod protocol;

pub use error::{CryptoError, FailureKind};
pub use protocol::SealedBox;

//! Failure taxonomy shared by every bridge operation.

use thiserror::Error;

/// Reason a single bridge call failed.
///
/// The detail is meant for local diagnostics and tests only. The public bridge
/// surface collapses every variant into "no result" so that a caller cannot
/// tell an authentication failure apart from malformed input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// The key is not a valid AES-128, AES-192 or AES-256 key.
    #[error("invalid key length: {0} bytes (expected 16, 24 or 32)")]
    InvalidKeyLength(usize),

    /// The nonce is shorter than the 96-bit GCM minimum.
    #[error("invalid nonce length: {0} bytes (expected at least 12)")]
    InvalidNonceLength(usize),

    /// The authentication tag is not exactly 16 bytes.
    #[error("invalid tag length: {0} bytes (expected 16)")]
    InvalidTagLength(usize),

    /// The recomputed tag did not match the supplied one.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The underlying primitive reported an error.
    #[error("cipher failure: {0}")]
    Cipher(&'static str),
}

/// Coarse grouping of [`CryptoError`] variants, used as a log field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Wrong key, nonce or tag length.
    MalformedInput,
    /// Tag verification failed on decrypt.
    AuthenticationFailed,
    /// Internal primitive error.
    Internal,
}

impl CryptoError {
    /// Returns the coarse [`FailureKind`] for this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            CryptoError::InvalidKeyLength(_)
            | CryptoError::InvalidNonceLength(_)
            | CryptoError::InvalidTagLength(_) => FailureKind::MalformedInput,
            CryptoError::AuthenticationFailed => FailureKind::AuthenticationFailed,
            CryptoError::Cipher(_) => FailureKind::Internal,
        }
    }
}

impl FailureKind {
    /// Short machine-readable label (e.g. `"malformed_input"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::MalformedInput => "malformed_input",
            FailureKind::AuthenticationFailed => "authentication_failed",
            FailureKind::Internal => "internal",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

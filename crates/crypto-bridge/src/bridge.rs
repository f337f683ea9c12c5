//! Caller-facing bridge operations.
//!
//! Failures are logged locally with their [`FailureKind`] and then collapsed
//! to `None`. A caller sees the same "no result" for a bad key, a bad nonce or
//! a forged tag, so the return channel never acts as a decryption oracle.
//!
//! Log fields carry operation names, failure kinds and input lengths only;
//! key, nonce, tag and message bytes never reach a log line.

use common::protocol::{DIGEST_LEN, MAC_LEN};
use common::{CryptoError, FailureKind, SealedBox};
use tracing::warn;

use crate::crypto;

/// SHA-256 digest of `data`.
pub fn hash(data: &[u8]) -> [u8; DIGEST_LEN] {
    crypto::sha256(data)
}

/// AES-GCM encrypt `plaintext` under `key`/`nonce`, authenticating `aad`.
///
/// Returns `None` on a malformed key, a nonce shorter than 12 bytes, or an
/// internal cipher error.
pub fn aead_encrypt(
    plaintext: &[u8],
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
) -> Option<SealedBox> {
    crypto::seal(plaintext, key, nonce, aad)
        .inspect_err(|e| log_failure("aes_gcm_encrypt", e, key.len(), nonce.len()))
        .ok()
}

/// Verify and decrypt an AES-GCM `ciphertext` with its detached `tag`.
///
/// Returns `None` on any failure, including tag mismatch. Plaintext is only
/// returned after the tag verified.
pub fn aead_decrypt(
    ciphertext: &[u8],
    tag: &[u8],
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
) -> Option<Vec<u8>> {
    crypto::open(ciphertext, tag, key, nonce, aad)
        .inspect_err(|e| log_failure("aes_gcm_decrypt", e, key.len(), nonce.len()))
        .ok()
}

/// AES-CMAC of `data` under `key`.
///
/// Returns `None` if `key` is not a 16, 24 or 32 byte AES key.
pub fn cmac(data: &[u8], key: &[u8]) -> Option<[u8; MAC_LEN]> {
    crypto::aes_cmac(data, key)
        .inspect_err(|e| log_failure("aes_cmac", e, key.len(), 0))
        .ok()
}

fn log_failure(operation: &'static str, err: &CryptoError, key_len: usize, nonce_len: usize) {
    let kind: FailureKind = err.kind();
    warn!(
        operation,
        kind = kind.as_str(),
        key_len,
        nonce_len,
        error = %err,
        "crypto bridge operation failed"
    );
}

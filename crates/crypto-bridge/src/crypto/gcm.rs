//! AES-GCM authenticated encryption with a detached 128-bit tag.
//!
//! The AES variant follows the key length (16/24/32 bytes). A 96-bit nonce
//! goes through `aes-gcm` directly; any longer nonce uses the GHASH-derived
//! pre-counter block from [`super::long_nonce`]. Nonces shorter than 96 bits
//! are rejected before a cipher is built.
//!
//! **Nonce reuse under one key breaks GCM.** No uniqueness tracking happens
//! here; the caller owns that guarantee.

use aes::{Aes128, Aes192, Aes256};
use aes_gcm::aead::consts::{U12, U16};
use aes_gcm::aead::generic_array::typenum::Unsigned;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{AeadCore, AeadInPlace, KeyInit};
use aes_gcm::AesGcm;
use common::protocol::{NONCE_LEN, TAG_LEN};
use common::{CryptoError, SealedBox};
use zeroize::Zeroizing;

use super::long_nonce;

/// Route `(key, nonce)` lengths to the matching `AesGcm` instantiation via
/// `$fast::<Cipher>(args..)`, or to `$long(args..)` for nonces over 96 bits.
macro_rules! dispatch {
    ($key:expr, $nonce:expr, $fast:ident, $long:path, ($($arg:expr),* $(,)?)) => {
        match ($key.len(), $nonce.len()) {
            (16, NONCE_LEN) => $fast::<AesGcm<Aes128, U12>>($($arg),*),
            (24, NONCE_LEN) => $fast::<AesGcm<Aes192, U12>>($($arg),*),
            (32, NONCE_LEN) => $fast::<AesGcm<Aes256, U12>>($($arg),*),
            (16 | 24 | 32, n) if n > NONCE_LEN => $long($($arg),*),
            (16 | 24 | 32, n) => Err(CryptoError::InvalidNonceLength(n)),
            (n, _) => Err(CryptoError::InvalidKeyLength(n)),
        }
    };
}

/// Encrypt `plaintext` and authenticate it together with `aad`.
///
/// The returned ciphertext has exactly the plaintext's length.
///
/// # Errors
///
/// - [`CryptoError::InvalidKeyLength`] for a non-AES key.
/// - [`CryptoError::InvalidNonceLength`] for a nonce shorter than 12 bytes.
/// - [`CryptoError::Cipher`] if the primitive refuses the input (message
///   longer than GCM allows).
pub fn seal(
    plaintext: &[u8],
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
) -> Result<SealedBox, CryptoError> {
    dispatch!(key, nonce, seal_with, long_nonce::seal, (plaintext, key, nonce, aad))
}

/// Verify `tag` over `ciphertext` and `aad`, then decrypt.
///
/// No plaintext leaves this function unless the tag matched; the scratch
/// buffer is zeroised on every failure path.
///
/// # Errors
///
/// - [`CryptoError::InvalidTagLength`] if `tag` is not 16 bytes.
/// - [`CryptoError::InvalidKeyLength`] / [`CryptoError::InvalidNonceLength`]
///   as for [`seal`].
/// - [`CryptoError::AuthenticationFailed`] if the tag does not verify.
pub fn open(
    ciphertext: &[u8],
    tag: &[u8],
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    if tag.len() != TAG_LEN {
        return Err(CryptoError::InvalidTagLength(tag.len()));
    }
    dispatch!(
        key,
        nonce,
        open_with,
        long_nonce::open,
        (ciphertext, tag, key, nonce, aad)
    )
}

fn build_cipher<C>(key: &[u8], nonce: &[u8]) -> Result<C, CryptoError>
where
    C: KeyInit + AeadCore,
{
    if nonce.len() != C::NonceSize::USIZE {
        return Err(CryptoError::InvalidNonceLength(nonce.len()));
    }
    C::new_from_slice(key).map_err(|_| CryptoError::InvalidKeyLength(key.len()))
}

fn seal_with<C>(
    plaintext: &[u8],
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
) -> Result<SealedBox, CryptoError>
where
    C: KeyInit + AeadInPlace<TagSize = U16>,
{
    let cipher = build_cipher::<C>(key, nonce)?;
    let mut buffer = Zeroizing::new(plaintext.to_vec());
    let tag = cipher
        .encrypt_in_place_detached(GenericArray::from_slice(nonce), aad, &mut buffer[..])
        .map_err(|_| CryptoError::Cipher("aes-gcm seal rejected input"))?;

    let mut tag_bytes = [0u8; TAG_LEN];
    tag_bytes.copy_from_slice(&tag);
    Ok(SealedBox::new(std::mem::take(&mut *buffer), tag_bytes))
}

fn open_with<C>(
    ciphertext: &[u8],
    tag: &[u8],
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
) -> Result<Vec<u8>, CryptoError>
where
    C: KeyInit + AeadInPlace<TagSize = U16>,
{
    let cipher = build_cipher::<C>(key, nonce)?;
    let mut buffer = Zeroizing::new(ciphertext.to_vec());
    cipher
        .decrypt_in_place_detached(
            GenericArray::from_slice(nonce),
            aad,
            &mut buffer[..],
            GenericArray::from_slice(tag),
        )
        .map_err(|_| CryptoError::AuthenticationFailed)?;
    Ok(std::mem::take(&mut *buffer))
}

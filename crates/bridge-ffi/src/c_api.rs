//! C entry points consumed by the SDK binary on iOS and Android.
//!
//! Conventions shared by every function:
//!
//! - Inputs are `(pointer, length)` pairs borrowed for the duration of the
//!   call. A null pointer is accepted only together with length 0.
//! - Fixed-size outputs (digest, tag, MAC) are written into caller-provided
//!   arrays; variable-size outputs are returned as a [`CbBuffer`] that must be
//!   released with [`crypto_bridge_buffer_free`].
//! - Outputs are written only when the call returns [`CbStatus::Ok`].
//! - Every cryptographic failure maps to [`CbStatus::NoResult`], whatever
//!   the underlying reason.

use std::os::raw::c_int;
use std::sync::OnceLock;
use std::{ptr, slice};

use common::protocol::{DIGEST_LEN, MAC_LEN, TAG_LEN};
use zeroize::Zeroize;

use crate::config::BridgeConfig;
use crate::telemetry;

/// Status codes returned across the C ABI.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CbStatus {
    /// The call succeeded and its outputs were written.
    Ok = 0,
    /// A required pointer was null.
    InvalidArgument = -1,
    /// The operation produced no result; the reason is only logged.
    NoResult = -2,
    /// Configuration or logging setup failed during init.
    InitFailed = -3,
}

/// Heap buffer handed to the caller.
#[repr(C)]
#[derive(Debug)]
pub struct CbBuffer {
    /// Start of the bytes, or null when nothing was written.
    pub data: *mut u8,
    /// Number of bytes at `data`.
    pub len: usize,
}

impl CbBuffer {
    fn from_vec(bytes: Vec<u8>) -> Self {
        let boxed = bytes.into_boxed_slice();
        let len = boxed.len();
        let data = Box::into_raw(boxed) as *mut u8;
        Self { data, len }
    }
}

static LOGGING: OnceLock<bool> = OnceLock::new();

/// Borrow a caller buffer as a slice.
///
/// # Safety
///
/// `ptr` must be null or valid for reads of `len` bytes for `'a`.
unsafe fn input<'a>(ptr: *const u8, len: usize) -> Option<&'a [u8]> {
    if len == 0 {
        return Some(&[]);
    }
    if ptr.is_null() {
        return None;
    }
    Some(slice::from_raw_parts(ptr, len))
}

/// Load configuration from the environment and install logging.
///
/// Only the first call does any work; later calls return its outcome.
///
/// @return 0 on success, -3 if configuration or logging setup failed
#[no_mangle]
pub extern "C" fn crypto_bridge_init() -> c_int {
    let ok = *LOGGING.get_or_init(|| {
        match BridgeConfig::from_env().and_then(|cfg| telemetry::init(&cfg)) {
            Ok(()) => true,
            Err(e) => {
                // Logging is not up; write to stderr directly.
                eprintln!("ERROR: crypto bridge initialisation failed: {e:#}");
                false
            }
        }
    });
    if ok {
        CbStatus::Ok as c_int
    } else {
        CbStatus::InitFailed as c_int
    }
}

/// SHA-256 of `data`.
///
/// @param out_digest buffer of at least 32 bytes
/// @return 0 on success, -1 on a null pointer
///
/// # Safety
///
/// `data` must be valid for `data_len` bytes; `out_digest` must be valid for
/// writes of 32 bytes.
#[no_mangle]
pub unsafe extern "C" fn crypto_bridge_sha256(
    data: *const u8,
    data_len: usize,
    out_digest: *mut u8,
) -> c_int {
    let Some(data) = input(data, data_len) else {
        return CbStatus::InvalidArgument as c_int;
    };
    if out_digest.is_null() {
        return CbStatus::InvalidArgument as c_int;
    }
    let digest = crypto_bridge::hash(data);
    ptr::copy_nonoverlapping(digest.as_ptr(), out_digest, DIGEST_LEN);
    CbStatus::Ok as c_int
}

/// AES-GCM encrypt.
///
/// @param out_encrypted receives the ciphertext (same length as `plain`)
/// @param out_gmac buffer of at least 16 bytes for the tag
/// @return 0 on success, -1 on a null pointer, -2 if encryption failed
///
/// # Safety
///
/// Every input pointer must be valid for its length; `out_encrypted` must be
/// valid for one [`CbBuffer`] write and `out_gmac` for 16 bytes.
#[no_mangle]
pub unsafe extern "C" fn crypto_bridge_aes_gcm_encrypt(
    plain: *const u8,
    plain_len: usize,
    key: *const u8,
    key_len: usize,
    iv: *const u8,
    iv_len: usize,
    aad: *const u8,
    aad_len: usize,
    out_encrypted: *mut CbBuffer,
    out_gmac: *mut u8,
) -> c_int {
    let (Some(plain), Some(key), Some(iv), Some(aad)) = (
        input(plain, plain_len),
        input(key, key_len),
        input(iv, iv_len),
        input(aad, aad_len),
    ) else {
        return CbStatus::InvalidArgument as c_int;
    };
    if out_encrypted.is_null() || out_gmac.is_null() {
        return CbStatus::InvalidArgument as c_int;
    }

    match crypto_bridge::aead_encrypt(plain, key, iv, aad) {
        Some(sealed) => {
            let (ciphertext, tag) = sealed.into_parts();
            ptr::copy_nonoverlapping(tag.as_ptr(), out_gmac, TAG_LEN);
            out_encrypted.write(CbBuffer::from_vec(ciphertext));
            CbStatus::Ok as c_int
        }
        None => CbStatus::NoResult as c_int,
    }
}

/// AES-GCM verify and decrypt.
///
/// @param out_plain receives the plaintext, only if the tag verified
/// @return 0 on success, -1 on a null pointer, -2 if decryption failed
///
/// # Safety
///
/// Every input pointer must be valid for its length; `out_plain` must be valid
/// for one [`CbBuffer`] write.
#[no_mangle]
pub unsafe extern "C" fn crypto_bridge_aes_gcm_decrypt(
    encrypted: *const u8,
    encrypted_len: usize,
    gmac: *const u8,
    gmac_len: usize,
    key: *const u8,
    key_len: usize,
    iv: *const u8,
    iv_len: usize,
    aad: *const u8,
    aad_len: usize,
    out_plain: *mut CbBuffer,
) -> c_int {
    let (Some(encrypted), Some(gmac), Some(key), Some(iv), Some(aad)) = (
        input(encrypted, encrypted_len),
        input(gmac, gmac_len),
        input(key, key_len),
        input(iv, iv_len),
        input(aad, aad_len),
    ) else {
        return CbStatus::InvalidArgument as c_int;
    };
    if out_plain.is_null() {
        return CbStatus::InvalidArgument as c_int;
    }

    match crypto_bridge::aead_decrypt(encrypted, gmac, key, iv, aad) {
        Some(plaintext) => {
            out_plain.write(CbBuffer::from_vec(plaintext));
            CbStatus::Ok as c_int
        }
        None => CbStatus::NoResult as c_int,
    }
}

/// AES-CMAC of `data` under `key`.
///
/// @param out_mac buffer of at least 16 bytes
/// @return 0 on success, -1 on a null pointer, -2 on an invalid key
///
/// # Safety
///
/// `data` and `key` must be valid for their lengths; `out_mac` must be valid
/// for writes of 16 bytes.
#[no_mangle]
pub unsafe extern "C" fn crypto_bridge_aes_cmac(
    data: *const u8,
    data_len: usize,
    key: *const u8,
    key_len: usize,
    out_mac: *mut u8,
) -> c_int {
    let (Some(data), Some(key)) = (input(data, data_len), input(key, key_len)) else {
        return CbStatus::InvalidArgument as c_int;
    };
    if out_mac.is_null() {
        return CbStatus::InvalidArgument as c_int;
    }

    match crypto_bridge::cmac(data, key) {
        Some(mac) => {
            ptr::copy_nonoverlapping(mac.as_ptr(), out_mac, MAC_LEN);
            CbStatus::Ok as c_int
        }
        None => CbStatus::NoResult as c_int,
    }
}

/// Zero and free a buffer returned by this library. A null `data` is a no-op.
///
/// # Safety
///
/// `buffer` must come from this library and must not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn crypto_bridge_buffer_free(buffer: CbBuffer) {
    if buffer.data.is_null() {
        return;
    }
    let mut boxed = Box::from_raw(ptr::slice_from_raw_parts_mut(buffer.data, buffer.len));
    boxed.zeroize();
}

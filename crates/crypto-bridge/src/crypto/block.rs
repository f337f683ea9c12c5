//! Single-block AES helpers and the byte-level operations CMAC is built from.
//!
//! Everything here works on owned arrays or `Vec<u8>` slices; offsets are
//! expressed with slicing and `chunks_exact`, never pointer arithmetic.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockEncrypt, InnerIvInit, KeyInit, StreamCipher};
use aes::{Aes128, Aes192, Aes256};
use common::protocol::BLOCK_LEN;
use common::CryptoError;
use ctr::{Ctr32BE, CtrCore};
use zeroize::Zeroizing;

/// One AES block.
pub type Block = [u8; BLOCK_LEN];

/// Reduction constant for doubling in GF(2^128).
const RB: u8 = 0x87;

/// First padding byte appended to an incomplete final block.
const PAD_MARKER: u8 = 0x80;

/// Raw AES block cipher with the key size picked from the key length.
pub enum BlockCipher {
    /// 16-byte key.
    Aes128(Aes128),
    /// 24-byte key.
    Aes192(Aes192),
    /// 32-byte key.
    Aes256(Aes256),
}

impl BlockCipher {
    /// Expand `key` into an AES key schedule.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeyLength`] unless `key` is 16, 24 or 32
    /// bytes long.
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        let cipher = match key.len() {
            16 => Aes128::new_from_slice(key).map(Self::Aes128),
            24 => Aes192::new_from_slice(key).map(Self::Aes192),
            32 => Aes256::new_from_slice(key).map(Self::Aes256),
            n => return Err(CryptoError::InvalidKeyLength(n)),
        };
        cipher.map_err(|_| CryptoError::InvalidKeyLength(key.len()))
    }

    /// Encrypt a single block in place (raw AES, no chaining).
    pub fn encrypt_block(&self, block: &mut Block) {
        let block = GenericArray::from_mut_slice(&mut block[..]);
        match self {
            Self::Aes128(c) => c.encrypt_block(block),
            Self::Aes192(c) => c.encrypt_block(block),
            Self::Aes256(c) => c.encrypt_block(block),
        }
    }

    /// AES-CBC encrypt `message` under an all-zero IV and return the last
    /// ciphertext block.
    ///
    /// `message` must be a non-empty multiple of [`BLOCK_LEN`].
    pub fn cbc_last_block(&self, message: &[u8]) -> Block {
        debug_assert!(!message.is_empty() && message.len() % BLOCK_LEN == 0);
        let mut chain = Zeroizing::new([0u8; BLOCK_LEN]);
        for chunk in message.chunks_exact(BLOCK_LEN) {
            xor_in_place(&mut chain[..], chunk);
            self.encrypt_block(&mut chain);
        }
        *chain
    }

    /// XOR `buf` with the AES-CTR keystream whose first counter block is
    /// `counter`; only the low 32 bits increment, big-endian, wrapping.
    pub fn apply_ctr32(&self, counter: &Block, buf: &mut [u8]) {
        let iv = GenericArray::from_slice(&counter[..]);
        match self {
            Self::Aes128(c) => {
                Ctr32BE::<Aes128>::from_core(CtrCore::inner_iv_init(c.clone(), iv)).apply_keystream(buf)
            }
            Self::Aes192(c) => {
                Ctr32BE::<Aes192>::from_core(CtrCore::inner_iv_init(c.clone(), iv)).apply_keystream(buf)
            }
            Self::Aes256(c) => {
                Ctr32BE::<Aes256>::from_core(CtrCore::inner_iv_init(c.clone(), iv)).apply_keystream(buf)
            }
        }
    }
}

/// Multiply `block` by x in GF(2^128): shift left one bit and fold the carry
/// back in with [`RB`].
pub fn dbl(block: &Block) -> Block {
    let mut out = [0u8; BLOCK_LEN];
    let mut carry = 0u8;
    for (o, &b) in out.iter_mut().zip(block.iter()).rev() {
        *o = (b << 1) | carry;
        carry = b >> 7;
    }
    // Branch-free: `carry` is the shifted-out MSB of the first byte.
    out[BLOCK_LEN - 1] ^= RB & 0u8.wrapping_sub(carry);
    out
}

/// XOR `src` into `dst` byte by byte. Both slices must have equal length.
pub fn xor_in_place(dst: &mut [u8], src: &[u8]) {
    debug_assert_eq!(dst.len(), src.len());
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}

/// Append `0x80` and then zeros up to the next block boundary.
///
/// An empty buffer becomes one full padding block.
pub fn pad_to_block(buf: &mut Vec<u8>) {
    buf.push(PAD_MARKER);
    let rem = buf.len() % BLOCK_LEN;
    if rem != 0 {
        buf.resize(buf.len() + BLOCK_LEN - rem, 0);
    }
}

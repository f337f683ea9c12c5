//! AES-GCM for nonces longer than 96 bits (NIST SP 800-38D, section 7.1).
//!
//! The pre-counter block is `J0 = GHASH_H(IV || pad || 0^64 || [len(IV)]_64)`,
//! the keystream starts at `inc32(J0)` and the tag is masked with `E_K(J0)`.
//! The 96-bit case never reaches this module; it goes through `aes-gcm`.

use aes::cipher::generic_array::GenericArray;
use common::protocol::BLOCK_LEN;
use common::{CryptoError, SealedBox};
use ghash::universal_hash::{KeyInit, UniversalHash};
use ghash::GHash;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use super::block::{xor_in_place, Block, BlockCipher};

/// Longest message one `(key, nonce)` pair may cover: `2^32 - 2` blocks.
const MAX_MESSAGE_LEN: u64 = ((1u64 << 32) - 2) * BLOCK_LEN as u64;

/// Key schedule, hash subkey and pre-counter block for one `(key, nonce)`.
struct LongNonceGcm {
    cipher: BlockCipher,
    hash_key: Zeroizing<Block>,
    j0: Zeroizing<Block>,
}

impl LongNonceGcm {
    fn new(key: &[u8], nonce: &[u8]) -> Result<Self, CryptoError> {
        let cipher = BlockCipher::new(key)?;
        let mut hash_key = Zeroizing::new([0u8; BLOCK_LEN]);
        cipher.encrypt_block(&mut hash_key);

        let mut ghash = GHash::new(GenericArray::from_slice(&hash_key[..]));
        ghash.update_padded(nonce);
        ghash.update_padded(&lengths_block(0, nonce.len()));
        let j0 = Zeroizing::new(to_block(&ghash.finalize()));

        Ok(Self {
            cipher,
            hash_key,
            j0,
        })
    }

    /// `E_K(J0) XOR GHASH_H(A || pad || C || pad || [len(A)]_64 || [len(C)]_64)`.
    fn tag(&self, aad: &[u8], ciphertext: &[u8]) -> Block {
        let mut ghash = GHash::new(GenericArray::from_slice(&self.hash_key[..]));
        ghash.update_padded(aad);
        ghash.update_padded(ciphertext);
        ghash.update_padded(&lengths_block(aad.len(), ciphertext.len()));
        let mut tag = to_block(&ghash.finalize());

        let mut mask = Zeroizing::new(*self.j0);
        self.cipher.encrypt_block(&mut mask);
        xor_in_place(&mut tag, &mask[..]);
        tag
    }

    fn apply_keystream(&self, buf: &mut [u8]) {
        let mut counter = Zeroizing::new(*self.j0);
        inc32(&mut counter);
        self.cipher.apply_ctr32(&counter, buf);
    }
}

/// Encrypt with a nonce longer than 12 bytes.
pub(crate) fn seal(
    plaintext: &[u8],
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
) -> Result<SealedBox, CryptoError> {
    let gcm = LongNonceGcm::new(key, nonce)?;
    check_message_len(plaintext.len())?;

    let mut buffer = Zeroizing::new(plaintext.to_vec());
    gcm.apply_keystream(&mut buffer[..]);
    let tag = gcm.tag(aad, &buffer);
    Ok(SealedBox::new(std::mem::take(&mut *buffer), tag))
}

/// Verify and decrypt with a nonce longer than 12 bytes.
///
/// The tag is checked in constant time before any keystream is applied.
pub(crate) fn open(
    ciphertext: &[u8],
    tag: &[u8],
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let gcm = LongNonceGcm::new(key, nonce)?;
    check_message_len(ciphertext.len())?;

    let expected = gcm.tag(aad, ciphertext);
    if !bool::from(expected[..].ct_eq(tag)) {
        return Err(CryptoError::AuthenticationFailed);
    }

    let mut buffer = Zeroizing::new(ciphertext.to_vec());
    gcm.apply_keystream(&mut buffer[..]);
    Ok(std::mem::take(&mut *buffer))
}

fn check_message_len(len: usize) -> Result<(), CryptoError> {
    if (len as u64) > MAX_MESSAGE_LEN {
        return Err(CryptoError::Cipher("aes-gcm message exceeds 2^32 - 2 blocks"));
    }
    Ok(())
}

/// `[8 * a_len]_64 || [8 * b_len]_64`, big-endian.
fn lengths_block(a_len: usize, b_len: usize) -> Block {
    let mut block = [0u8; BLOCK_LEN];
    block[..8].copy_from_slice(&(a_len as u64 * 8).to_be_bytes());
    block[8..].copy_from_slice(&(b_len as u64 * 8).to_be_bytes());
    block
}

/// Increment the low 32 bits of `block`, wrapping.
fn inc32(block: &mut Block) {
    let mut low = [0u8; 4];
    low.copy_from_slice(&block[12..]);
    let next = u32::from_be_bytes(low).wrapping_add(1);
    block[12..].copy_from_slice(&next.to_be_bytes());
}

fn to_block(bytes: &[u8]) -> Block {
    let mut block = [0u8; BLOCK_LEN];
    block.copy_from_slice(bytes);
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use aes::Aes128;
    use aes_gcm::aead::consts::U16;
    use aes_gcm::aead::AeadInPlace;
    use aes_gcm::AesGcm;

    fn h(s: &str) -> Vec<u8> {
        hex::decode(s).unwrap()
    }

    #[test]
    fn inc32_wraps_low_word() {
        let mut block = [0xABu8; BLOCK_LEN];
        block[12..].copy_from_slice(&[0xFF; 4]);
        inc32(&mut block);
        assert_eq!(&block[..12], &[0xAB; 12]);
        assert_eq!(&block[12..], &[0x00; 4]);
    }

    #[test]
    fn lengths_block_is_bit_counts() {
        let block = lengths_block(20, 60);
        assert_eq!(hex::encode(block), "00000000000000a000000000000001e0");
    }

    #[test]
    fn matches_aes_gcm_for_block_sized_nonce() {
        let key = [0x3Cu8; 16];
        let nonce = [0x9Du8; 16];
        let aad = b"session header";
        let plaintext = b"biometric template bytes, more than one block long";

        let sealed = seal(plaintext, &key, &nonce, aad).unwrap();

        let reference = AesGcm::<Aes128, U16>::new_from_slice(&key).unwrap();
        let mut buffer = plaintext.to_vec();
        let tag = reference
            .encrypt_in_place_detached(GenericArray::from_slice(&nonce), aad, &mut buffer)
            .unwrap();
        assert_eq!(sealed.ciphertext, buffer);
        assert_eq!(&sealed.tag[..], &tag[..]);
    }

    #[test]
    fn forged_tag_is_rejected_before_decrypting() {
        let key = [0x11u8; 24];
        let nonce = [0x22u8; 20];
        let mut sealed = seal(b"credential", &key, &nonce, &[]).unwrap();
        sealed.tag[15] ^= 0x80;
        assert_eq!(
            open(&sealed.ciphertext, &sealed.tag, &key, &nonce, &[]),
            Err(CryptoError::AuthenticationFailed)
        );
    }

    #[test]
    fn sixty_byte_iv_known_answer() {
        // McGrew-Viega GCM test case 6
        let key = h("feffe9928665731c6d6a8f9467308308");
        let iv = h("9313225df88406e555909c5aff5269aa\
                    6a7a9538534f7da1e4c303d2a318a728\
                    c3c0c95156809539fcf0e2429a6b5254\
                    16aedbf5a0de6a57a637b39b");
        let plain = h("d9313225f88406e5a55909c5aff5269a\
                       86a7a9531534f7da2e4c303d8a318a72\
                       1c3c0c95956809532fcf0e2449a6b525\
                       b16aedf5aa0de657ba637b39");
        let aad = h("feedfacedeadbeeffeedfacedeadbeefabaddad2");

        let sealed = seal(&plain, &key, &iv, &aad).unwrap();
        assert_eq!(
            hex::encode(&sealed.ciphertext),
            "8ce24998625615b603a033aca13fb894\
             be9112a5c3a211a8ba262a3cca7e2ca7\
             01e4a9a4fba43c90ccdcb281d48c7c6f\
             d62875d2aca417034c34aee5"
        );
        assert_eq!(hex::encode(sealed.tag), "619cc5aefffe0bfa462af43c1699d050");

        let opened = open(&sealed.ciphertext, &sealed.tag, &key, &iv, &aad).unwrap();
        assert_eq!(opened, plain);
    }
}

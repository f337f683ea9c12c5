//! AES-CMAC (NIST SP 800-38B, RFC 4493).
//!
//! Subkey derivation and the CBC chain run on the same [`BlockCipher`]
//! instance, so both stages share one key schedule. The chain always starts
//! from its own all-zero IV.

use common::protocol::{BLOCK_LEN, MAC_LEN};
use common::CryptoError;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::block::{dbl, pad_to_block, xor_in_place, Block, BlockCipher};

/// CMAC subkeys derived from `L = AES_K(0^128)`.
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct Subkeys {
    pub(crate) k1: Block,
    pub(crate) k2: Block,
}

impl Subkeys {
    /// `K1 = dbl(L)`, `K2 = dbl(K1)`.
    pub(crate) fn derive(cipher: &BlockCipher) -> Self {
        let mut l = Zeroizing::new([0u8; BLOCK_LEN]);
        cipher.encrypt_block(&mut l);
        let mut subkeys = Self {
            k1: [0u8; BLOCK_LEN],
            k2: [0u8; BLOCK_LEN],
        };
        subkeys.k1 = dbl(&l);
        subkeys.k2 = dbl(&subkeys.k1);
        subkeys
    }
}

/// Compute the 16-byte AES-CMAC of `data` under `key`.
///
/// Empty or non-block-aligned input is padded with `0x80 00..` and masked
/// with `K2`; a non-empty block-aligned input is masked with `K1` as is.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidKeyLength`] if `key` is not an AES key.
pub fn aes_cmac(data: &[u8], key: &[u8]) -> Result<[u8; MAC_LEN], CryptoError> {
    let cipher = BlockCipher::new(key)?;
    let subkeys = Subkeys::derive(&cipher);

    let mut message = Zeroizing::new(data.to_vec());
    let last_key = if message.is_empty() || message.len() % BLOCK_LEN != 0 {
        pad_to_block(&mut message);
        &subkeys.k2
    } else {
        &subkeys.k1
    };

    let last = message.len() - BLOCK_LEN;
    xor_in_place(&mut message[last..], last_key);

    Ok(cipher.cbc_last_block(&message))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_128: &str = "2b7e151628aed2a6abf7158809cf4f3c";
    const KEY_192: &str = "8e73b0f7da0e6452c810f32b809079e562f8ead2522c6b7b";
    const KEY_256: &str = "603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4";

    const MSG_64: &str = "6bc1bee22e409f96e93d7e117393172a\
                          ae2d8a571e03ac9c9eb76fac45af8e51\
                          30c81c46a35ce411e5fbc1191a0a52ef\
                          f69f2445df4f9b17ad2b417be66c3710";

    fn mac_hex(key: &str, msg_len: usize) -> String {
        let key = hex::decode(key).unwrap();
        let msg = hex::decode(MSG_64).unwrap();
        hex::encode(aes_cmac(&msg[..msg_len], &key).unwrap())
    }

    #[test]
    fn rfc4493_subkeys() {
        let cipher = BlockCipher::new(&hex::decode(KEY_128).unwrap()).unwrap();
        let subkeys = Subkeys::derive(&cipher);
        assert_eq!(hex::encode(subkeys.k1), "fbeed618357133667c85e08f7236a8de");
        assert_eq!(hex::encode(subkeys.k2), "f7ddac306ae266ccf90bc11ee46d513b");
    }

    #[test]
    fn subkeys_zeroize_in_place() {
        let cipher = BlockCipher::new(&hex::decode(KEY_128).unwrap()).unwrap();
        let mut subkeys = Subkeys::derive(&cipher);
        subkeys.zeroize();
        assert_eq!(subkeys.k1, [0u8; BLOCK_LEN]);
        assert_eq!(subkeys.k2, [0u8; BLOCK_LEN]);
    }

    #[test]
    fn aes128_empty_message() {
        assert_eq!(mac_hex(KEY_128, 0), "bb1d6929e95937287fa37d129b756746");
    }

    #[test]
    fn aes128_one_block() {
        assert_eq!(mac_hex(KEY_128, 16), "070a16b46b4d4144f79bdd9dd04a287c");
    }

    #[test]
    fn aes128_forty_bytes() {
        assert_eq!(mac_hex(KEY_128, 40), "dfa66747de9ae63030ca32611497c827");
    }

    #[test]
    fn aes128_four_blocks() {
        assert_eq!(mac_hex(KEY_128, 64), "51f0bebf7e3b9d92fc49741779363cfe");
    }

    #[test]
    fn aes192_vectors() {
        assert_eq!(mac_hex(KEY_192, 0), "d17ddf46adaacde531cac483de7a9367");
        assert_eq!(mac_hex(KEY_192, 64), "a1d5df0eed790f794d77589659f39a11");
    }

    #[test]
    fn aes256_vectors() {
        assert_eq!(mac_hex(KEY_256, 0), "028962f61b7bf89efc6b551f4667d983");
        assert_eq!(mac_hex(KEY_256, 64), "e1992190549f6ed5696a2c056c315410");
    }

    #[test]
    fn empty_input_uses_k2_path() {
        // MAC(empty) == AES_K(pad(empty) ^ K2)
        let key = hex::decode(KEY_128).unwrap();
        let cipher = BlockCipher::new(&key).unwrap();
        let subkeys = Subkeys::derive(&cipher);
        let mut block = [0u8; BLOCK_LEN];
        block[0] = 0x80;
        xor_in_place(&mut block, &subkeys.k2);
        cipher.encrypt_block(&mut block);
        assert_eq!(aes_cmac(&[], &key).unwrap(), block);
    }

    #[test]
    fn aligned_input_uses_k1_path() {
        let key = hex::decode(KEY_128).unwrap();
        let data = [0x33u8; BLOCK_LEN];
        let cipher = BlockCipher::new(&key).unwrap();
        let subkeys = Subkeys::derive(&cipher);
        let mut block = data;
        xor_in_place(&mut block, &subkeys.k1);
        cipher.encrypt_block(&mut block);
        assert_eq!(aes_cmac(&data, &key).unwrap(), block);
    }

    #[test]
    fn deterministic() {
        let key = [0x11u8; 16];
        let a = aes_cmac(b"reader challenge", &key).unwrap();
        let b = aes_cmac(b"reader challenge", &key).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), MAC_LEN);
    }

    #[test]
    fn invalid_key_length_rejected() {
        assert_eq!(
            aes_cmac(b"data", &[0u8; 10]),
            Err(CryptoError::InvalidKeyLength(10))
        );
        assert_eq!(aes_cmac(b"", &[]), Err(CryptoError::InvalidKeyLength(0)));
    }
}

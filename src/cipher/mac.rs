//! HMAC-SHA256 authentication tag over `iv ‖ ciphertext`.
//!
//! The accumulator absorbs the IV on construction and every ciphertext chunk
//! afterwards, in the order the chunks appear in the file. Plaintext, salt and
//! the recorded length are never fed to it.

use hmac::digest::Key;
use hmac::{Hmac, Mac as _};
use secrecy::zeroize::Zeroize;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::config::{IV_SIZE, KEY_SIZE, MAC_SIZE};
use crate::secret::SecretKey;

/// Incremental, single-use tag computation.
pub struct TagAccumulator {
    mac: Hmac<Sha256>,
}

impl TagAccumulator {
    /// Keys the HMAC with `key` and absorbs `iv`.
    ///
    /// HMAC zero-pads short keys to the hash block size, so keying with the
    /// padded block is the same MAC as keying with the 32 bytes directly.
    pub fn new(key: &SecretKey, iv: &[u8; IV_SIZE]) -> Self {
        let mut block = Key::<Hmac<Sha256>>::default();
        block[..KEY_SIZE].copy_from_slice(key.expose_secret());

        let mut mac = <Hmac<Sha256> as hmac::digest::KeyInit>::new(&block);
        block.as_mut_slice().zeroize();

        mac.update(iv);
        Self { mac }
    }

    /// Absorbs one ciphertext chunk.
    #[inline]
    pub fn update(&mut self, ciphertext: &[u8]) {
        self.mac.update(ciphertext);
    }

    pub fn finalize(self) -> [u8; MAC_SIZE] {
        self.mac.finalize().into_bytes().into()
    }

    /// Compares the finalized tag with `expected` in constant time.
    ///
    /// A mismatch says nothing about its cause: wrong passphrase, modified
    /// ciphertext and modified tag all look the same.
    pub fn verify(self, expected: &[u8; MAC_SIZE]) -> bool {
        let computed = self.finalize();
        bool::from(computed.ct_eq(expected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte: u8) -> SecretKey {
        SecretKey::new([byte; 32])
    }

    #[test]
    fn test_incremental_matches_one_shot() {
        let iv = [1u8; IV_SIZE];

        let mut chunked = TagAccumulator::new(&key(9), &iv);
        chunked.update(b"first chunk of ciphertext");
        chunked.update(b"second chunk");

        let mut one_shot = Hmac::<Sha256>::new_from_slice(&[9u8; 32]).unwrap();
        one_shot.update(&iv);
        one_shot.update(b"first chunk of ciphertextsecond chunk");
        let expected: [u8; MAC_SIZE] = one_shot.finalize().into_bytes().into();

        assert_eq!(chunked.finalize(), expected);
    }

    #[test]
    fn test_verify_accepts_own_tag() {
        let iv = [3u8; IV_SIZE];
        let mut a = TagAccumulator::new(&key(1), &iv);
        a.update(b"data");
        let tag = a.finalize();

        let mut b = TagAccumulator::new(&key(1), &iv);
        b.update(b"data");
        assert!(b.verify(&tag));
    }

    #[test]
    fn test_verify_rejects_flipped_bit() {
        let iv = [3u8; IV_SIZE];
        let mut a = TagAccumulator::new(&key(1), &iv);
        a.update(b"data");
        let mut tag = a.finalize();
        tag[31] ^= 0x80;

        let mut b = TagAccumulator::new(&key(1), &iv);
        b.update(b"data");
        assert!(!b.verify(&tag));
    }

    #[test]
    fn test_iv_and_key_are_bound() {
        let tag = TagAccumulator::new(&key(1), &[0u8; IV_SIZE]).finalize();
        assert!(!TagAccumulator::new(&key(1), &[1u8; IV_SIZE]).verify(&tag));
        assert!(!TagAccumulator::new(&key(2), &[0u8; IV_SIZE]).verify(&tag));
    }

    #[test]
    fn test_padded_key_matches_raw_key() {
        let iv = [7u8; IV_SIZE];
        let mut tag = TagAccumulator::new(&key(0xab), &iv);
        tag.update(b"ciphertext");

        let mut raw = Hmac::<Sha256>::new_from_slice(&[0xab; 32]).unwrap();
        raw.update(&iv);
        raw.update(b"ciphertext");
        let expected: [u8; MAC_SIZE] = raw.finalize().into_bytes().into();

        assert!(tag.verify(&expected));
    }
}

//! AES-256-CBC session carried across chunks.
//!
//! A session is created once per file from the derived cipher key and the
//! header IV. Each [`CipherSession::update`] call continues the chain from
//! the last ciphertext block of the previous call, so encrypting a body in
//! several chunks yields exactly the bytes of a single-shot CBC pass.

use aes::Aes256;
use anyhow::{Result, ensure};
use cbc::cipher::inout::InOutBuf;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use crate::config::{BLOCK_SIZE, IV_SIZE};
use crate::secret::SecretKey;

type Encryptor = cbc::Encryptor<Aes256>;
type Decryptor = cbc::Decryptor<Aes256>;

/// Stateful CBC direction plus its chaining value.
pub enum CipherSession {
    Encrypt(Encryptor),
    Decrypt(Decryptor),
}

impl CipherSession {
    pub fn encrypt(key: &SecretKey, iv: &[u8; IV_SIZE]) -> Self {
        Self::Encrypt(Encryptor::new(key.expose_secret().into(), iv.into()))
    }

    pub fn decrypt(key: &SecretKey, iv: &[u8; IV_SIZE]) -> Self {
        Self::Decrypt(Decryptor::new(key.expose_secret().into(), iv.into()))
    }

    /// Encrypts or decrypts `buffer` in place.
    ///
    /// # Errors
    ///
    /// Returns an error if `buffer` is not a whole number of blocks. Padding
    /// is the caller's business.
    pub fn update(&mut self, buffer: &mut [u8]) -> Result<()> {
        ensure!(buffer.len().is_multiple_of(BLOCK_SIZE), "cipher input must be a multiple of {BLOCK_SIZE} bytes, got {}", buffer.len());

        let (blocks, _) = InOutBuf::from(buffer).into_chunks();
        match self {
            Self::Encrypt(cipher) => cipher.encrypt_blocks_inout_mut(blocks),
            Self::Decrypt(cipher) => cipher.decrypt_blocks_inout_mut(blocks),
        }

        Ok(())
    }
}

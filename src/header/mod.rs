//! Fixed 56-byte container header.
//!
//! ```text
//! offset  size  field
//!      0    32  salt
//!     32    16  iv
//!     48     8  plaintext length, i64 little-endian
//! ```
//!
//! The header is written in the clear. Only the IV is covered by the
//! authentication tag; the salt and the length are not. A modified salt
//! derives different keys and fails authentication; a modified length is
//! caught by the size check in [`Header::expected_file_len`] before any
//! plaintext is produced.

use std::io::Read;

use anyhow::{Context, Result, ensure};

use crate::cipher::Derive;
use crate::config::{HEADER_SIZE, IV_SIZE, LENGTH_SIZE, MAC_SIZE, SALT_SIZE};
use crate::stream::body_len;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    salt: [u8; SALT_SIZE],
    iv: [u8; IV_SIZE],
    /// Never negative.
    plaintext_len: i64,
}

impl Header {
    pub fn new(salt: [u8; SALT_SIZE], iv: [u8; IV_SIZE], plaintext_len: u64) -> Result<Self> {
        let plaintext_len = i64::try_from(plaintext_len).with_context(|| format!("plaintext length {plaintext_len} does not fit the header"))?;
        Ok(Self { salt, iv, plaintext_len })
    }

    /// Builds a header with a fresh random salt and IV.
    pub fn generate(plaintext_len: u64) -> Result<Self> {
        Self::new(Derive::generate_salt()?, Derive::generate_iv()?, plaintext_len)
    }

    pub fn serialize(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        let (salt, rest) = bytes.split_at_mut(SALT_SIZE);
        let (iv, length) = rest.split_at_mut(IV_SIZE);

        salt.copy_from_slice(&self.salt);
        iv.copy_from_slice(&self.iv);
        length.copy_from_slice(&self.plaintext_len.to_le_bytes());

        bytes
    }

    /// Reads and validates a header from the start of a container.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than 56 bytes are available or the recorded
    /// length is negative.
    pub fn deserialize<R: Read>(reader: &mut R) -> Result<Self> {
        let mut bytes = [0u8; HEADER_SIZE];
        reader.read_exact(&mut bytes).context("truncated header")?;

        let mut salt = [0u8; SALT_SIZE];
        let mut iv = [0u8; IV_SIZE];
        let mut length = [0u8; LENGTH_SIZE];
        salt.copy_from_slice(&bytes[..SALT_SIZE]);
        iv.copy_from_slice(&bytes[SALT_SIZE..SALT_SIZE + IV_SIZE]);
        length.copy_from_slice(&bytes[SALT_SIZE + IV_SIZE..]);

        let plaintext_len = i64::from_le_bytes(length);
        ensure!(plaintext_len >= 0, "invalid plaintext length in header: {plaintext_len}");

        Ok(Self { salt, iv, plaintext_len })
    }

    pub const fn salt(&self) -> &[u8; SALT_SIZE] {
        &self.salt
    }

    pub const fn iv(&self) -> &[u8; IV_SIZE] {
        &self.iv
    }

    pub const fn plaintext_len(&self) -> u64 {
        self.plaintext_len.unsigned_abs()
    }

    /// Total size of a well-formed container carrying this header.
    pub fn expected_file_len(&self) -> u64 {
        (HEADER_SIZE + MAC_SIZE) as u64 + body_len(self.plaintext_len())
    }
}

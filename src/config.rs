//! Global Configuration Constants
//!
//! Sizes and defaults for the `.aes256` container format, plus the runtime
//! [`Settings`] that the engine is driven with.
//!
//! ## Format Compatibility
//!
//! The salt, IV, length and tag sizes are part of the on-disk layout and can
//! never change. The PBKDF2 iteration count and the chunk size are not
//! recorded in the file: a file can only be decrypted with the same
//! iteration count it was encrypted with, and the chunk size only affects
//! memory use (any chunk size yields the same bytes).

use anyhow::{Result, ensure};

/// Application name used in user interfaces
pub const APP_NAME: &str = "aes256";

/// File extension appended on encryption and stripped on decryption
pub const FILE_EXTENSION: &str = ".aes256";

// === Key Derivation Parameters ===

/// Length of the random salt stored at the start of every file
pub const SALT_SIZE: usize = 32;

/// Size of each derived key (AES-256 key, HMAC-SHA256 key)
pub const KEY_SIZE: usize = 32;

/// Total PBKDF2 output, split into the cipher key and the mac key
pub const DERIVED_KEY_LEN: usize = KEY_SIZE * 2;

/// PBKDF2-HMAC-SHA256 iteration count
///
/// Follows the current OWASP recommendation for PBKDF2-HMAC-SHA256.
///
/// Security Impact: Each iteration adds one HMAC evaluation to every guess
/// Performance Impact: Paid once per file, independent of file size
pub const PBKDF2_ITERATIONS: u32 = 600_000;

// === Cipher Parameters ===

/// AES block size; every ciphertext chunk is a multiple of it
pub const BLOCK_SIZE: usize = 16;

/// Size of the CBC initialization vector
pub const IV_SIZE: usize = BLOCK_SIZE;

/// Default maximum chunk size for streaming (16 MiB)
///
/// Memory Impact: Peak memory usage is approximately this size
pub const CHUNK_SIZE: usize = 16 * 1024 * 1024;

const _: () = assert!(CHUNK_SIZE % BLOCK_SIZE == 0);

// === File Format ===

/// Size of the recorded plaintext length (`i64`, little-endian)
pub const LENGTH_SIZE: usize = 8;

/// `salt ‖ iv ‖ length`
pub const HEADER_SIZE: usize = SALT_SIZE + IV_SIZE + LENGTH_SIZE;

/// Size of the trailing HMAC-SHA256 tag
pub const MAC_SIZE: usize = 32;

/// Runtime knobs of the engine.
///
/// Both sides of a round trip must agree on `iterations`. The CLI always uses
/// [`Settings::default`]; smaller values exist for tests and embedders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Maximum number of plaintext bytes processed per chunk.
    pub chunk_size: usize,

    /// PBKDF2 iteration count.
    pub iterations: u32,
}

impl Settings {
    pub fn new(chunk_size: usize, iterations: u32) -> Result<Self> {
        let settings = Self { chunk_size, iterations };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.chunk_size != 0, "chunk size cannot be zero");
        ensure!(self.chunk_size.is_multiple_of(BLOCK_SIZE), "chunk size must be a multiple of {BLOCK_SIZE} bytes, got {}", self.chunk_size);
        ensure!(self.iterations != 0, "pbkdf2 iteration count cannot be zero");
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self { chunk_size: CHUNK_SIZE, iterations: PBKDF2_ITERATIONS }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_header_size() {
        assert_eq!(HEADER_SIZE, 56);
    }

    #[test]
    fn test_settings_reject_unaligned_chunk() {
        assert!(Settings::new(17, 1).is_err());
        assert!(Settings::new(0, 1).is_err());
        assert!(Settings::new(32, 0).is_err());
        assert!(Settings::new(32, 1).is_ok());
    }
}

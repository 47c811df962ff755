//! # Key Derivation with PBKDF2-HMAC-SHA256
//!
//! Stretches a passphrase and a per-file random salt into 64 bytes of key
//! material. The first 32 bytes key the AES-256-CBC session, the last 32
//! bytes key the HMAC-SHA256 tag. The two halves are never used for each
//! other's purpose.
//!
//! ## Determinism
//!
//! Decryption re-derives the keys from the salt stored in the header, so the
//! same `(passphrase, salt, iterations)` must always produce the same keys.

use anyhow::{Result, anyhow, ensure};
use rand::RngCore;
use rand::rngs::OsRng;
use secrecy::zeroize::Zeroize;
use sha2::Sha256;

use crate::config::{DERIVED_KEY_LEN, IV_SIZE, KEY_SIZE, SALT_SIZE};
use crate::secret::{Passphrase, SecretKey};

/// The two independent keys produced for one file.
#[derive(Debug)]
pub struct DerivedKeys {
    /// AES-256 key for the CBC session.
    pub cipher: SecretKey,
    /// HMAC-SHA256 key for the authentication tag.
    pub mac: SecretKey,
}

/// # Key Derivation Function
///
/// Wrapper for PBKDF2-HMAC-SHA256 key derivation with secure salt and IV
/// generation.
pub struct Derive<'a> {
    passphrase: &'a Passphrase,
}

impl<'a> Derive<'a> {
    pub fn new(passphrase: &'a Passphrase) -> Self {
        Self { passphrase }
    }

    /// Derives the cipher key and the mac key.
    ///
    /// # Arguments
    /// * `salt` - The 32-byte salt from the file header
    /// * `iterations` - PBKDF2 iteration count, must not be zero
    ///
    /// # Errors
    /// Returns error if `iterations` is zero
    pub fn derive_keys(&self, salt: &[u8; SALT_SIZE], iterations: u32) -> Result<DerivedKeys> {
        ensure!(iterations != 0, "pbkdf2 iteration count cannot be zero");

        let mut okm = [0u8; DERIVED_KEY_LEN];
        pbkdf2::pbkdf2_hmac::<Sha256>(self.passphrase.expose_secret().as_bytes(), salt, iterations, &mut okm);

        let (cipher_half, mac_half) = okm.split_at(KEY_SIZE);
        let mut cipher = [0u8; KEY_SIZE];
        let mut mac = [0u8; KEY_SIZE];
        cipher.copy_from_slice(cipher_half);
        mac.copy_from_slice(mac_half);
        okm.zeroize();

        Ok(DerivedKeys { cipher: SecretKey::new(cipher), mac: SecretKey::new(mac) })
    }

    /// Generates a fresh random salt from the OS RNG.
    ///
    /// # Errors
    /// Returns error if the operating system's random number generator fails
    pub fn generate_salt() -> Result<[u8; SALT_SIZE]> {
        Self::random_bytes()
    }

    /// Generates a fresh random CBC initialization vector from the OS RNG.
    ///
    /// # Errors
    /// Returns error if the operating system's random number generator fails
    pub fn generate_iv() -> Result<[u8; IV_SIZE]> {
        Self::random_bytes()
    }

    fn random_bytes<const N: usize>() -> Result<[u8; N]> {
        let mut bytes = [0u8; N];
        OsRng.try_fill_bytes(&mut bytes).map_err(|e| anyhow!("rng failed: {e}"))?;
        Ok(bytes)
    }
}

use secrecy::{ExposeSecret, SecretBox, SecretString};

use crate::config::KEY_SIZE;

pub struct SecretKey {
    inner: SecretBox<[u8; KEY_SIZE]>,
}

impl SecretKey {
    pub fn new(key: [u8; KEY_SIZE]) -> Self {
        Self { inner: SecretBox::new(Box::new(key)) }
    }

    pub fn expose_secret(&self) -> &[u8; KEY_SIZE] {
        self.inner.expose_secret()
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretKey([... {KEY_SIZE} bytes ...])")
    }
}

pub struct Passphrase {
    inner: SecretString,
}

impl Passphrase {
    pub fn new(passphrase: &str) -> Self {
        Self { inner: SecretString::from(passphrase.to_owned()) }
    }

    pub fn from_string(passphrase: String) -> Self {
        Self { inner: SecretString::from(passphrase) }
    }

    pub fn expose_secret(&self) -> &str {
        self.inner.expose_secret()
    }
}

impl std::fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Passphrase([REDACTED])")
    }
}

//! Common type definitions.
//!
//! - [`Processing`]: which direction a file is processed in
//! - [`Verdict`]: the outcome of authenticating a decrypted container
//! - [`Progress`]: the capability the engine reports chunk progress through

use std::fmt::{Display, Formatter, Result};
use std::path::Path;

use crate::config::FILE_EXTENSION;

/// Represents a processing operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Processing {
    /// Plaintext in, `.aes256` container out.
    Encryption,

    /// `.aes256` container in, plaintext out.
    Decryption,
}

impl Processing {
    /// Classifies a path by its name alone: containers end in `.aes256`.
    #[inline]
    pub fn from_path(path: &Path) -> Self {
        if path.as_os_str().to_string_lossy().ends_with(FILE_EXTENSION) { Self::Decryption } else { Self::Encryption }
    }

    /// Returns a progress label for the operation.
    #[inline]
    pub fn label(self) -> &'static str {
        match self {
            Self::Encryption => "Encrypting",
            Self::Decryption => "Decrypting",
        }
    }
}

impl Display for Processing {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(self.label())
    }
}

/// Outcome of a decryption whose I/O completed.
///
/// `Rejected` covers wrong passphrases, modified files and corruption alike;
/// the tag comparison cannot and does not tell them apart.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The tag matched; the plaintext output can be trusted.
    Authenticated,

    /// The tag did not match; the plaintext output must be discarded.
    Rejected,
}

impl Verdict {
    #[inline]
    pub fn is_authenticated(self) -> bool {
        matches!(self, Self::Authenticated)
    }
}

/// Receives `(completed_chunks, total_chunks)` after every chunk.
///
/// Reporting has no bearing on the result; implementations must not fail.
pub trait Progress {
    fn advance(&mut self, completed: u64, total: u64);
}

impl<F: FnMut(u64, u64)> Progress for F {
    #[inline]
    fn advance(&mut self, completed: u64, total: u64) {
        self(completed, total);
    }
}

/// Discards all progress reports.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl Progress for Silent {
    #[inline]
    fn advance(&mut self, _completed: u64, _total: u64) {}
}

//! # Cryptographic Operations Module
//!
//! The primitives behind the `.aes256` container:
//!
//! - [`Derive`]: PBKDF2-HMAC-SHA256 turning a passphrase and salt into a
//!   cipher key and a mac key
//! - [`CipherSession`]: AES-256-CBC whose chaining state survives across
//!   chunks
//! - [`TagAccumulator`]: HMAC-SHA256 over the IV and every ciphertext chunk
//!
//! None of these touch the filesystem; the stream and processor modules wire
//! them to readers and writers.

mod derive;
mod mac;
mod session;

pub use derive::{Derive, DerivedKeys};
pub use mac::TagAccumulator;
pub use session::CipherSession;

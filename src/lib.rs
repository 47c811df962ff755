//! aes256 - passphrase-based, streaming, authenticated file encryption.
//!
//! Files are encrypted with AES-256-CBC and authenticated with HMAC-SHA256
//! (encrypt-then-MAC). Both keys are derived from the passphrase with
//! PBKDF2-HMAC-SHA256 and a random per-file salt. Data is processed in
//! bounded chunks, so memory use does not grow with file size.
//!
//! Container layout:
//!
//! ```text
//! salt (32) ‖ iv (16) ‖ plaintext length (i64 LE, 8) ‖ ciphertext ‖ tag (32)
//! ```
//!
//! - [`processor`]: stream and file level encryption and decryption
//! - [`header`]: the fixed 56-byte header
//! - [`stream`]: chunk planning and the body pipeline
//! - [`cipher`]: key derivation, the CBC session and the tag accumulator

pub mod app;
pub mod cipher;
pub mod config;
pub mod file;
pub mod header;
pub mod processor;
pub mod secret;
pub mod stream;
pub mod types;
pub mod ui;

pub use config::Settings;
pub use processor::{Processor, decrypt_stream, encrypt_stream};
pub use secret::Passphrase;
pub use types::{Processing, Progress, Silent, Verdict};

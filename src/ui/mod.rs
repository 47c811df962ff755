//! Terminal output for the command-line tool.
//!
//! # Modules
//!
//! - [`display`]: Per-file status lines
//! - [`progress`]: Chunk progress bar
//! - [`prompt`]: Passphrase entry

pub mod display;
pub mod progress;
pub mod prompt;

//! Interactive passphrase entry.

use anyhow::{Context, Result};
use inquire::{Password, PasswordDisplayMode, required};

use crate::secret::Passphrase;

/// Prompts for a passphrase on the terminal.
///
/// The passphrase is typed twice and both entries must match. Empty input is
/// refused by the prompt itself, so the user can retry without restarting.
pub fn passphrase() -> Result<Passphrase> {
    let passphrase = Password::new("Passphrase:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .with_validator(required!("the passphrase cannot be empty"))
        .with_custom_confirmation_message("Confirm passphrase:")
        .with_custom_confirmation_error_message("The passphrases don't match.")
        .prompt()
        .context("failed to read passphrase")?;

    Ok(Passphrase::from_string(passphrase))
}

//! High-level file encryption and decryption operations.
//!
//! Two layers live here:
//!
//! - [`encrypt_stream`] / [`decrypt_stream`] turn any reader into any writer.
//!   They know the container layout but nothing about files.
//! - [`Processor`] applies them to files on disk and owns the cleanup: a
//!   failed encryption or a rejected decryption never leaves an output file
//!   behind.

use std::io::{Read, Write};

use anyhow::{Context, Result, ensure};
use tracing::{info, warn};

use crate::cipher::Derive;
use crate::config::Settings;
use crate::file::File;
use crate::header::Header;
use crate::secret::Passphrase;
use crate::stream::{ChunkPlan, Pipeline};
use crate::types::{Processing, Progress, Verdict};

/// Writes a complete container for `plaintext_len` bytes read from `input`.
///
/// A fresh salt and IV are drawn for every call.
///
/// # Errors
///
/// Returns an error if `input` yields fewer than `plaintext_len` bytes, if
/// writing fails, or if the random number generator fails.
pub fn encrypt_stream<R: Read, W: Write>(input: R, output: W, plaintext_len: u64, passphrase: &Passphrase, settings: &Settings, progress: &mut dyn Progress) -> Result<()> {
    let header = Header::generate(plaintext_len)?;
    encrypt_with_header(&header, input, output, passphrase, settings, progress)
}

fn encrypt_with_header<R: Read, W: Write>(header: &Header, input: R, mut output: W, passphrase: &Passphrase, settings: &Settings, progress: &mut dyn Progress) -> Result<()> {
    let keys = Derive::new(passphrase).derive_keys(header.salt(), settings.iterations)?;
    let plan = ChunkPlan::new(header.plaintext_len(), settings.chunk_size)?;

    output.write_all(&header.serialize()).context("failed to write header")?;

    Pipeline::new(&keys, header.iv(), plan, Processing::Encryption).encrypt(input, output, progress)
}

/// Reads a container from `input` and writes the recovered plaintext.
///
/// Plaintext reaches `output` before the tag has been checked. When the
/// result is [`Verdict::Rejected`] the caller must discard everything that
/// was written.
///
/// # Errors
///
/// Returns an error if the header or the body is truncated or if writing
/// fails. A wrong passphrase or modified data is not an error; it is a
/// rejected verdict.
pub fn decrypt_stream<R: Read, W: Write>(mut input: R, output: W, passphrase: &Passphrase, settings: &Settings, progress: &mut dyn Progress) -> Result<Verdict> {
    let header = Header::deserialize(&mut input)?;
    decrypt_with_header(&header, input, output, passphrase, settings, progress)
}

fn decrypt_with_header<R: Read, W: Write>(header: &Header, input: R, output: W, passphrase: &Passphrase, settings: &Settings, progress: &mut dyn Progress) -> Result<Verdict> {
    let keys = Derive::new(passphrase).derive_keys(header.salt(), settings.iterations)?;
    let plan = ChunkPlan::new(header.plaintext_len(), settings.chunk_size)?;

    Pipeline::new(&keys, header.iv(), plan, Processing::Decryption).decrypt(input, output, progress)
}

/// File-level encryption engine.
///
/// Holds the passphrase and settings for a batch of files. Every file gets its
/// own salt, IV and derived keys.
#[derive(Debug)]
pub struct Processor {
    passphrase: Passphrase,
    settings: Settings,
}

impl Processor {
    pub fn new(passphrase: Passphrase) -> Self {
        Self { passphrase, settings: Settings::default() }
    }

    pub fn with_settings(passphrase: Passphrase, settings: Settings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { passphrase, settings })
    }

    /// Encrypts `input` into a new container at `output`.
    ///
    /// An existing `output` is overwritten. On failure the partial output is
    /// deleted.
    #[tracing::instrument(skip_all, fields(input = %input.path().display()))]
    pub fn encrypt(&self, input: &File, output: &File, progress: &mut dyn Progress) -> Result<()> {
        input.validate()?;

        let plaintext_len = input.size()?;
        let reader = input.reader()?;
        let mut writer = output.writer()?;

        let result = encrypt_stream(reader, &mut writer, plaintext_len, &self.passphrase, &self.settings, progress);
        drop(writer);

        if let Err(err) = result {
            Self::discard(output);
            return Err(err);
        }

        info!(bytes = plaintext_len, output = %output.path().display(), "encrypted");
        Ok(())
    }

    /// Decrypts the container at `input` into `output`.
    ///
    /// The container size is checked against its header before `output` is
    /// created, so a truncated or extended file is refused without writing
    /// anything. Once the body pass has run, `output` is kept only if the
    /// verdict is [`Verdict::Authenticated`].
    #[tracing::instrument(skip_all, fields(input = %input.path().display()))]
    pub fn decrypt(&self, input: &File, output: &File, progress: &mut dyn Progress) -> Result<Verdict> {
        input.validate()?;

        let mut reader = input.reader()?;
        let header = Header::deserialize(&mut reader)?;

        let actual = input.size()?;
        let expected = header.expected_file_len();
        ensure!(actual == expected, "container size mismatch: header implies {expected} bytes, file has {actual}");

        let mut writer = output.writer()?;
        let result = decrypt_with_header(&header, reader, &mut writer, &self.passphrase, &self.settings, progress);
        drop(writer);

        match result {
            Ok(Verdict::Authenticated) => {
                info!(bytes = header.plaintext_len(), output = %output.path().display(), "decrypted");
                Ok(Verdict::Authenticated)
            }
            Ok(Verdict::Rejected) => {
                warn!("authentication failed, discarding output");
                Self::discard(output);
                Ok(Verdict::Rejected)
            }
            Err(err) => {
                Self::discard(output);
                Err(err)
            }
        }
    }

    fn discard(output: &File) {
        if output.exists()
            && let Err(err) = output.delete()
        {
            warn!(error = %err, output = %output.path().display(), "failed to remove partial output");
        }
    }
}

//! Chunk writer.
//!
//! Encryption writes every ciphertext byte, padding included. Decryption
//! writes only the first `plain_len` bytes of each decrypted chunk, dropping
//! the zero padding that the recorded length says was added.

use std::io::Write;

use anyhow::{Context, Result, ensure};

use crate::stream::Chunk;
use crate::types::Processing;

pub struct ChunkWriter<W> {
    inner: W,
    mode: Processing,
    written: u64,
}

impl<W: Write> ChunkWriter<W> {
    pub fn new(inner: W, mode: Processing) -> Self {
        Self { inner, mode, written: 0 }
    }

    pub fn write_chunk(&mut self, chunk: &Chunk, data: &[u8]) -> Result<()> {
        ensure!(data.len() == chunk.padded_len(), "chunk {} has {} bytes, expected {}", chunk.index, data.len(), chunk.padded_len());

        let out = match self.mode {
            Processing::Encryption => data,
            Processing::Decryption => &data[..chunk.plain_len],
        };

        self.inner.write_all(out).with_context(|| format!("failed to write chunk {}", chunk.index))?;
        self.written += out.len() as u64;

        Ok(())
    }

    pub fn write_tag(&mut self, tag: &[u8]) -> Result<()> {
        self.inner.write_all(tag).context("failed to write authentication tag")
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush().context("failed to flush output")
    }

    /// Bytes of chunk data written so far (tag excluded).
    pub const fn written(&self) -> u64 {
        self.written
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.inner
    }
}

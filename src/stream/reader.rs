//! Chunk reader.
//!
//! Fills a reusable buffer with exactly one chunk's worth of input:
//!
//! - **Encryption**: `plain_len` plaintext bytes followed by `padding` zero
//!   bytes, ready to be encrypted in place.
//! - **Decryption**: `plain_len + padding` ciphertext bytes, the full padded
//!   blocks as they were written.
//!
//! The buffer is allocated once per file and reused for every chunk.

use std::io::{ErrorKind, Read};

use anyhow::{Context, Result, bail};

use crate::stream::Chunk;
use crate::types::Processing;

pub struct ChunkReader<R> {
    inner: R,
    mode: Processing,
}

impl<R: Read> ChunkReader<R> {
    pub fn new(inner: R, mode: Processing) -> Self {
        Self { inner, mode }
    }

    /// Reads `chunk` into `buffer` and returns the bytes to process.
    ///
    /// # Errors
    ///
    /// Returns an error if the input ends early: the plaintext shrank while it
    /// was being encrypted, or the container body is truncated.
    pub fn read_chunk<'b>(&mut self, chunk: &Chunk, buffer: &'b mut Vec<u8>) -> Result<&'b mut [u8]> {
        let padded_len = chunk.padded_len();
        buffer.resize(padded_len, 0);

        match self.mode {
            Processing::Encryption => {
                Self::fill(&mut self.inner, &mut buffer[..chunk.plain_len]).with_context(|| format!("input ended before chunk {} was complete", chunk.index))?;
                // the buffer is reused, so stale bytes must not leak into the padding
                buffer[chunk.plain_len..].fill(0);
            }
            Processing::Decryption => {
                Self::fill(&mut self.inner, &mut buffer[..]).with_context(|| format!("ciphertext body truncated in chunk {}", chunk.index))?;
            }
        }

        Ok(&mut buffer[..padded_len])
    }

    /// Reads the trailing authentication tag.
    pub fn read_tag<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut tag = [0u8; N];
        Self::fill(&mut self.inner, &mut tag).context("missing authentication tag")?;
        Ok(tag)
    }

    fn fill(reader: &mut R, buffer: &mut [u8]) -> Result<()> {
        match reader.read_exact(buffer) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => bail!("unexpected end of input"),
            Err(e) => Err(e).context("read failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_encryption_pads_with_zeros() {
        let mut reader = ChunkReader::new(Cursor::new(vec![0xffu8; 5]), Processing::Encryption);
        let mut buffer = vec![0xeeu8; 64];

        let chunk = Chunk { index: 0, plain_len: 5, padding: 11 };
        let data = reader.read_chunk(&chunk, &mut buffer).unwrap();

        assert_eq!(data.len(), 16);
        assert_eq!(&data[..5], &[0xff; 5]);
        assert_eq!(&data[5..], &[0u8; 11]);
    }

    #[test]
    fn test_empty_chunk_is_one_zero_block() {
        let mut reader = ChunkReader::new(Cursor::new(Vec::new()), Processing::Encryption);
        let mut buffer = Vec::new();

        let chunk = Chunk { index: 0, plain_len: 0, padding: 16 };
        assert_eq!(reader.read_chunk(&chunk, &mut buffer).unwrap(), &[0u8; 16]);
    }

    #[test]
    fn test_decryption_reads_padding_too() {
        let input: Vec<u8> = (0..40).collect();
        let mut reader = ChunkReader::new(Cursor::new(input), Processing::Decryption);
        let mut buffer = Vec::new();

        let chunk = Chunk { index: 0, plain_len: 17, padding: 15 };
        let data = reader.read_chunk(&chunk, &mut buffer).unwrap();
        assert_eq!(data.len(), 32);
        assert_eq!(data[31], 31);

        let tag: [u8; 8] = reader.read_tag().unwrap();
        assert_eq!(tag, [32, 33, 34, 35, 36, 37, 38, 39]);
    }

    #[test]
    fn test_short_input_is_an_error() {
        let mut reader = ChunkReader::new(Cursor::new(vec![1u8; 10]), Processing::Decryption);
        let mut buffer = Vec::new();

        let chunk = Chunk { index: 0, plain_len: 16, padding: 0 };
        assert!(reader.read_chunk(&chunk, &mut buffer).is_err());
    }

    #[test]
    fn test_missing_tag_is_an_error() {
        let mut reader = ChunkReader::new(Cursor::new(vec![1u8; 31]), Processing::Decryption);
        assert!(reader.read_tag::<32>().is_err());
    }
}

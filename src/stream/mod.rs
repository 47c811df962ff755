//! Chunked streaming over the ciphertext body.
//!
//! The body is processed in chunks of at most `chunk_size` plaintext bytes so
//! memory stays bounded by one chunk regardless of file size. The number of
//! chunks and the padding of the last one are derived from the plaintext
//! length recorded in the header, never from the data itself.
//!
//! ## Padding
//!
//! The final chunk is zero-padded up to the next 16-byte boundary, and an
//! empty file still produces one all-padding block. Decryption strips exactly
//! `padding(len)` bytes, recomputed from the recorded length. This is
//! length-prefixed zero padding, not PKCS#7: there is no padding marker in the
//! data, and "fixing" it would change the byte layout of every container.

use anyhow::{Result, ensure};

use crate::config::BLOCK_SIZE;

pub mod pipeline;
pub mod reader;
pub mod writer;

pub use pipeline::Pipeline;

/// Zero bytes appended to a plaintext chunk of `len` bytes before encryption.
#[inline]
pub const fn padding(len: usize) -> usize {
    if len == 0 { BLOCK_SIZE } else { (BLOCK_SIZE - len % BLOCK_SIZE) % BLOCK_SIZE }
}

/// Length of the ciphertext body for a plaintext of `plaintext_len` bytes.
#[inline]
pub const fn body_len(plaintext_len: u64) -> u64 {
    if plaintext_len == 0 { BLOCK_SIZE as u64 } else { plaintext_len.div_ceil(BLOCK_SIZE as u64) * BLOCK_SIZE as u64 }
}

/// One step of the streaming loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chunk {
    /// Zero-based position in the body.
    pub index: u64,
    /// Plaintext bytes this chunk contributes.
    pub plain_len: usize,
    /// Zero bytes appended before encryption.
    pub padding: usize,
}

impl Chunk {
    /// Ciphertext bytes this chunk occupies in the body.
    #[inline]
    pub const fn padded_len(&self) -> usize {
        self.plain_len + self.padding
    }
}

/// Splits a plaintext length into chunks.
#[derive(Clone, Copy, Debug)]
pub struct ChunkPlan {
    plaintext_len: u64,
    chunk_size: usize,
    count: u64,
}

impl ChunkPlan {
    pub fn new(plaintext_len: u64, chunk_size: usize) -> Result<Self> {
        ensure!(chunk_size != 0 && chunk_size.is_multiple_of(BLOCK_SIZE), "chunk size must be a non-zero multiple of {BLOCK_SIZE} bytes, got {chunk_size}");

        // an empty file still gets one chunk so the body and tag stay well-formed
        let count = plaintext_len.div_ceil(chunk_size as u64).max(1);

        Ok(Self { plaintext_len, chunk_size, count })
    }

    #[inline]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Largest number of bytes any single chunk needs in memory.
    pub fn max_chunk_len(&self) -> usize {
        usize::try_from(body_len(self.plaintext_len)).map_or(self.chunk_size, |body| body.min(self.chunk_size))
    }

    pub fn chunks(&self) -> impl Iterator<Item = Chunk> + use<> {
        let Self { plaintext_len, chunk_size, count } = *self;

        (0..count).map(move |index| {
            let remaining = plaintext_len - index * chunk_size as u64;
            let plain_len = usize::try_from(remaining).map_or(chunk_size, |remaining| remaining.min(chunk_size));
            Chunk { index, plain_len, padding: padding(plain_len) }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(len: u64, chunk_size: usize) -> Vec<Chunk> {
        ChunkPlan::new(len, chunk_size).unwrap().chunks().collect()
    }

    #[test]
    fn test_padding() {
        assert_eq!(padding(0), 16);
        assert_eq!(padding(1), 15);
        assert_eq!(padding(15), 1);
        assert_eq!(padding(16), 0);
        assert_eq!(padding(17), 15);
        assert_eq!(padding(32), 0);
    }

    #[test]
    fn test_body_len() {
        assert_eq!(body_len(0), 16);
        assert_eq!(body_len(1), 16);
        assert_eq!(body_len(16), 16);
        assert_eq!(body_len(17), 32);
        assert_eq!(body_len(1_000_000), 1_000_000);
        assert_eq!(body_len(1_000_001), 1_000_016);
    }

    #[test]
    fn test_empty_plaintext_has_one_padded_chunk() {
        let chunks = plan(0, 64);
        assert_eq!(chunks, vec![Chunk { index: 0, plain_len: 0, padding: 16 }]);
    }

    #[test]
    fn test_exact_multiple_of_chunk_size() {
        let chunks = plan(192, 64);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.plain_len == 64 && c.padding == 0));
    }

    #[test]
    fn test_partial_last_chunk() {
        let chunks = plan(150, 64);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2], Chunk { index: 2, plain_len: 22, padding: 10 });
    }

    #[test]
    fn test_padded_lengths_sum_to_body_len() {
        for len in [0u64, 1, 15, 16, 17, 63, 64, 65, 127, 128, 129, 1000] {
            let total: u64 = plan(len, 64).iter().map(|c| c.padded_len() as u64).sum();
            assert_eq!(total, body_len(len), "plaintext length {len}");
        }
    }

    #[test]
    fn test_max_chunk_len() {
        assert_eq!(ChunkPlan::new(0, 64).unwrap().max_chunk_len(), 16);
        assert_eq!(ChunkPlan::new(17, 64).unwrap().max_chunk_len(), 32);
        assert_eq!(ChunkPlan::new(1000, 64).unwrap().max_chunk_len(), 64);
    }

    #[test]
    fn test_invalid_chunk_size() {
        assert!(ChunkPlan::new(10, 0).is_err());
        assert!(ChunkPlan::new(10, 24).is_err());
    }
}

use std::io::{Read, Write};

use anyhow::{Result, ensure};
use tracing::{debug, trace};

use crate::cipher::{CipherSession, DerivedKeys, TagAccumulator};
use crate::config::{IV_SIZE, MAC_SIZE};
use crate::stream::ChunkPlan;
use crate::stream::reader::ChunkReader;
use crate::stream::writer::ChunkWriter;
use crate::types::{Processing, Progress, Verdict};

/// One pass over a container body.
///
/// Owns the CBC session and the tag accumulator for a single file. Both are
/// consumed by [`Pipeline::encrypt`] or [`Pipeline::decrypt`], so a pipeline
/// cannot be reused for a second file.
pub struct Pipeline {
    session: CipherSession,
    tag: TagAccumulator,
    plan: ChunkPlan,
    mode: Processing,
}

impl Pipeline {
    pub fn new(keys: &DerivedKeys, iv: &[u8; IV_SIZE], plan: ChunkPlan, mode: Processing) -> Self {
        let session = match mode {
            Processing::Encryption => CipherSession::encrypt(&keys.cipher, iv),
            Processing::Decryption => CipherSession::decrypt(&keys.cipher, iv),
        };
        let tag = TagAccumulator::new(&keys.mac, iv);

        Self { session, tag, plan, mode }
    }

    /// Encrypts the body chunk by chunk, appends the tag and flushes `output`.
    pub fn encrypt<R: Read, W: Write>(self, input: R, output: W, progress: &mut dyn Progress) -> Result<()> {
        ensure!(self.mode == Processing::Encryption, "pipeline was built for decryption");

        let (tag, _, mut writer) = self.run(input, output, progress)?;
        writer.write_tag(&tag.finalize())?;
        writer.flush()
    }

    /// Decrypts the body chunk by chunk, then checks the trailing tag.
    ///
    /// Plaintext is written before the tag is known; on
    /// [`Verdict::Rejected`] everything written to `output` must be discarded
    /// by the caller.
    pub fn decrypt<R: Read, W: Write>(self, input: R, output: W, progress: &mut dyn Progress) -> Result<Verdict> {
        ensure!(self.mode == Processing::Decryption, "pipeline was built for encryption");

        let (tag, mut reader, mut writer) = self.run(input, output, progress)?;
        writer.flush()?;
        let expected: [u8; MAC_SIZE] = reader.read_tag()?;

        Ok(if tag.verify(&expected) { Verdict::Authenticated } else { Verdict::Rejected })
    }

    fn run<R: Read, W: Write>(self, input: R, output: W, progress: &mut dyn Progress) -> Result<(TagAccumulator, ChunkReader<R>, ChunkWriter<W>)> {
        let Self { mut session, mut tag, plan, mode } = self;
        let total = plan.count();

        debug!(chunks = total, max_chunk_len = plan.max_chunk_len(), %mode, "starting body pass");

        let mut reader = ChunkReader::new(input, mode);
        let mut writer = ChunkWriter::new(output, mode);
        let mut buffer = Vec::with_capacity(plan.max_chunk_len());

        for chunk in plan.chunks() {
            let data = reader.read_chunk(&chunk, &mut buffer)?;

            // the tag always covers ciphertext: after encrypting, before decrypting
            match mode {
                Processing::Encryption => {
                    session.update(data)?;
                    tag.update(data);
                }
                Processing::Decryption => {
                    tag.update(data);
                    session.update(data)?;
                }
            }

            writer.write_chunk(&chunk, data)?;
            progress.advance(chunk.index + 1, total);

            trace!(index = chunk.index, plain_len = chunk.plain_len, padding = chunk.padding, "chunk done");
        }

        debug!(bytes = writer.written(), "body pass finished");

        Ok((tag, reader, writer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::Derive;
    use crate::secret::Passphrase;
    use crate::types::Silent;

    fn keys() -> DerivedKeys {
        Derive::new(&Passphrase::new("pipeline")).derive_keys(&[4u8; 32], 1).unwrap()
    }

    fn encrypt(plaintext: &[u8], chunk_size: usize) -> Vec<u8> {
        let plan = ChunkPlan::new(plaintext.len() as u64, chunk_size).unwrap();
        let mut out = Vec::new();
        Pipeline::new(&keys(), &[9u8; IV_SIZE], plan, Processing::Encryption).encrypt(plaintext, &mut out, &mut Silent).unwrap();
        out
    }

    fn decrypt(container: &[u8], plaintext_len: usize, chunk_size: usize) -> (Verdict, Vec<u8>) {
        let plan = ChunkPlan::new(plaintext_len as u64, chunk_size).unwrap();
        let mut out = Vec::new();
        let verdict = Pipeline::new(&keys(), &[9u8; IV_SIZE], plan, Processing::Decryption).decrypt(container, &mut out, &mut Silent).unwrap();
        (verdict, out)
    }

    #[test]
    fn test_chunking_does_not_change_ciphertext() {
        let plaintext: Vec<u8> = (0..200u8).collect();

        let single = encrypt(&plaintext, 1024);
        let chunked = encrypt(&plaintext, 32);

        assert_eq!(single, chunked);
        assert_eq!(single.len(), 208 + MAC_SIZE);
    }

    #[test]
    fn test_decrypt_across_chunks() {
        let plaintext: Vec<u8> = (0..200u8).collect();
        let container = encrypt(&plaintext, 48);

        let (verdict, out) = decrypt(&container, plaintext.len(), 48);
        assert_eq!(verdict, Verdict::Authenticated);
        assert_eq!(out, plaintext);
    }

    #[test]
    fn test_progress_reports_every_chunk() {
        let plaintext = vec![1u8; 100];
        let plan = ChunkPlan::new(100, 32).unwrap();
        let mut seen = Vec::new();
        let mut progress = |completed: u64, total: u64| seen.push((completed, total));

        Pipeline::new(&keys(), &[9u8; IV_SIZE], plan, Processing::Encryption).encrypt(plaintext.as_slice(), Vec::new(), &mut progress).unwrap();

        assert_eq!(seen, vec![(1, 4), (2, 4), (3, 4), (4, 4)]);
    }

    #[test]
    fn test_modified_body_is_rejected() {
        let plaintext = vec![5u8; 64];
        let mut container = encrypt(&plaintext, 32);
        container[40] ^= 0x01;

        let (verdict, _) = decrypt(&container, plaintext.len(), 32);
        assert_eq!(verdict, Verdict::Rejected);
    }

    #[test]
    fn test_wrong_direction() {
        let plan = ChunkPlan::new(0, 32).unwrap();
        let pipeline = Pipeline::new(&keys(), &[0u8; IV_SIZE], plan, Processing::Decryption);
        assert!(pipeline.encrypt(&[][..], Vec::new(), &mut Silent).is_err());
    }
}

//! File Operations
//!
//! A thin abstraction over the paths the engine reads and writes: existence
//! and type checks, size lookup, buffered readers and writers, deletion, and
//! the `.aes256` naming convention.

use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};

use crate::config::FILE_EXTENSION;
use crate::types::Processing;

/// A path the engine operates on.
///
/// Constructing a `File` performs no filesystem access; every query goes to
/// the filesystem when it is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    path: PathBuf,
}

impl File {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current size of the file in bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata cannot be read.
    pub fn size(&self) -> Result<u64> {
        let meta = fs::metadata(&self.path).with_context(|| format!("failed to get metadata: {}", self.path.display()))?;
        Ok(meta.len())
    }

    /// Generate the output path for the given processing direction.
    ///
    /// - **Encryption**: `document.txt` → `document.txt.aes256`
    /// - **Decryption**: `document.txt.aes256` → `document.txt`
    ///
    /// # Errors
    ///
    /// Returns an error when decrypting a path that does not end in
    /// `.aes256`, or whose name is nothing but the extension.
    pub fn output_path(&self, processing: Processing) -> Result<PathBuf> {
        match processing {
            Processing::Encryption => {
                let mut name = self.path.as_os_str().to_os_string();
                name.push(FILE_EXTENSION);
                Ok(PathBuf::from(name))
            }
            Processing::Decryption => {
                let lossy = self.path.to_string_lossy();
                let stripped = lossy.strip_suffix(FILE_EXTENSION).with_context(|| format!("not a {FILE_EXTENSION} file: {}", self.path.display()))?;
                let output = PathBuf::from(stripped);
                ensure!(output.file_name().is_some(), "cannot derive an output name from {}", self.path.display());
                Ok(output)
            }
        }
    }

    #[inline]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.path.is_dir()
    }

    /// Create a buffered reader for the file.
    pub fn reader(&self) -> Result<BufReader<fs::File>> {
        let file = fs::File::open(&self.path).with_context(|| format!("failed to open file: {}", self.path.display()))?;

        Ok(BufReader::new(file))
    }

    /// Create a buffered writer for the file.
    ///
    /// Creates missing parent directories and truncates an existing file.
    pub fn writer(&self) -> Result<BufWriter<fs::File>> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }

        let file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .with_context(|| format!("failed to create file: {}", self.path.display()))?;

        Ok(BufWriter::new(file))
    }

    /// Delete the file from the filesystem.
    pub fn delete(&self) -> Result<()> {
        ensure!(self.exists(), "file not found: {}", self.path.display());

        fs::remove_file(&self.path).with_context(|| format!("failed to delete file: {}", self.path.display()))
    }

    /// Validate that the file can be used as an input.
    ///
    /// Unlike most tools, empty files are accepted: an empty plaintext
    /// encrypts to a valid 104-byte container.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.exists(), "file not found: {}", self.path.display());
        ensure!(!self.is_dir(), "path is a directory: {}", self.path.display());

        Ok(())
    }
}

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{Level, debug};

use crate::config::APP_NAME;
use crate::file::File;
use crate::processor::Processor;
use crate::secret::Passphrase;
use crate::types::{Processing, Progress, Silent, Verdict};
use crate::ui::progress::Bar;
use crate::ui::{display, prompt};

/// Outcome of one file on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Outcome {
    Done,
    Failed,
    Skipped,
}

#[derive(Parser)]
#[command(name = APP_NAME, version, about = "Encrypt and decrypt files with AES-256-CBC and HMAC-SHA256.")]
pub struct App {
    /// Files to process. Names ending in .aes256 are decrypted, all others are encrypted.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Passphrase; prompted for when absent.
    #[arg(short, long)]
    passphrase: Option<String>,

    /// Print nothing. Without --passphrase nothing is done.
    #[arg(long)]
    silent: bool,

    /// Show debug logs.
    #[arg(short, long)]
    verbose: bool,
}

impl App {
    pub fn init() -> Result<Self> {
        let app = Self::parse();

        let level = if app.silent {
            Level::ERROR
        } else if app.verbose {
            Level::DEBUG
        } else {
            Level::WARN
        };

        let subscriber = tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).with_file(true).with_line_number(true).finish();
        tracing::subscriber::set_global_default(subscriber)?;

        Ok(app)
    }

    pub async fn execute(self) -> Result<()> {
        let Self { files, passphrase, silent, .. } = self;

        let passphrase = match passphrase {
            Some(passphrase) => Passphrase::from_string(passphrase),
            None if silent => {
                debug!("no passphrase given in silent mode, nothing to do");
                return Ok(());
            }
            None => prompt::passphrase()?,
        };

        let processor = Arc::new(Processor::new(passphrase));
        let mut failed = 0usize;

        for path in &files {
            if Self::process(&processor, path, silent).await == Outcome::Failed {
                failed += 1;
            }
        }

        if failed > 0 {
            if !silent {
                display::show_summary(failed, files.len());
            }
            bail!("{failed} of {} file(s) failed", files.len());
        }

        Ok(())
    }

    async fn process(processor: &Arc<Processor>, path: &Path, silent: bool) -> Outcome {
        let input = File::new(path);

        if !input.exists() {
            if !silent {
                display::show_missing(path);
            }
            return Outcome::Skipped;
        }

        if input.is_dir() {
            if !silent {
                display::show_failed(&format!("{} is a directory, skipped", path.display()));
            }
            return Outcome::Skipped;
        }

        let processing = Processing::from_path(path);
        if !silent {
            display::show_start(processing, path, input.size().ok());
        }

        let output = match input.output_path(processing) {
            Ok(output) => File::new(output),
            Err(err) => return Self::report(&err.to_string(), silent),
        };

        let task = {
            let processor = Arc::clone(processor);
            let output = output.clone();
            tokio::task::spawn_blocking(move || Self::run(&processor, processing, &input, &output, silent))
        };

        match task.await.context("worker task panicked").and_then(|result| result) {
            Ok(Verdict::Authenticated) => {
                if !silent {
                    display::show_done(output.path());
                }
                Outcome::Done
            }
            Ok(Verdict::Rejected) => Self::report("wrong passphrase or corrupted file", silent),
            Err(err) => {
                debug!(path = %path.display(), "{err:#}");
                Self::report(&format!("{err:#}"), silent)
            }
        }
    }

    fn run(processor: &Processor, processing: Processing, input: &File, output: &File, silent: bool) -> Result<Verdict> {
        let mut bar;
        let mut quiet = Silent;

        let progress: &mut dyn Progress = if silent {
            &mut quiet
        } else {
            bar = Bar::new(processing.label())?;
            &mut bar
        };

        match processing {
            Processing::Encryption => processor.encrypt(input, output, progress).map(|()| Verdict::Authenticated),
            Processing::Decryption => processor.decrypt(input, output, progress),
        }
    }

    fn report(reason: &str, silent: bool) -> Outcome {
        if !silent {
            display::show_failed(reason);
        }
        Outcome::Failed
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;
    use crate::config::{CHUNK_SIZE, Settings};

    fn processor() -> Arc<Processor> {
        Arc::new(Processor::with_settings(Passphrase::new("secret"), Settings::new(CHUNK_SIZE, 1).unwrap()).unwrap())
    }

    #[test]
    fn test_cli_definition() {
        App::command().debug_assert();
    }

    #[test]
    fn test_files_are_required() {
        assert!(App::try_parse_from([APP_NAME]).is_err());
    }

    #[test]
    fn test_parse_arguments() {
        let app = App::try_parse_from([APP_NAME, "-p", "secret", "--silent", "a.txt", "b.txt.aes256"]).unwrap();

        assert_eq!(app.files, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt.aes256")]);
        assert_eq!(app.passphrase.as_deref(), Some("secret"));
        assert!(app.silent);
        assert!(!app.verbose);
    }

    #[tokio::test]
    async fn test_silent_without_passphrase_does_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.txt");
        std::fs::write(&path, b"untouched").unwrap();

        let app = App::try_parse_from([APP_NAME, "--silent", path.to_str().unwrap()]).unwrap();
        app.execute().await.unwrap();

        assert!(!dir.path().join("plain.txt.aes256").exists());
    }

    #[tokio::test]
    async fn test_missing_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = App::process(&processor(), &dir.path().join("missing"), true).await;
        assert_eq!(outcome, Outcome::Skipped);
    }

    #[tokio::test]
    async fn test_rejected_decryption_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.aes256");
        std::fs::write(&path, [0u8; 104]).unwrap();

        let outcome = App::process(&processor(), &path, true).await;

        assert_eq!(outcome, Outcome::Failed);
        assert!(!dir.path().join("garbage").exists());
    }

    #[tokio::test]
    async fn test_encrypt_then_decrypt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"meet at noon").unwrap();

        let processor = processor();
        assert_eq!(App::process(&processor, &path, true).await, Outcome::Done);

        std::fs::remove_file(&path).unwrap();
        let container = dir.path().join("notes.txt.aes256");
        assert_eq!(App::process(&processor, &container, true).await, Outcome::Done);

        assert_eq!(std::fs::read(&path).unwrap(), b"meet at noon");
    }
}

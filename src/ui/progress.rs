use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use crate::types::Progress;

/// Chunk progress bar for a single file.
///
/// Cleared from the terminal when dropped so the status line that follows is
/// not interleaved with a stale bar.
pub struct Bar {
    bar: ProgressBar,
}

impl Bar {
    pub fn new(description: &str) -> Result<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar().template("  {msg} [{bar:40.cyan/blue}] {pos}/{len} chunks ({elapsed})")?.progress_chars("●○ ");

        bar.set_style(style);
        bar.set_message(description.to_owned());

        Ok(Self { bar })
    }
}

impl Progress for Bar {
    fn advance(&mut self, completed: u64, total: u64) {
        self.bar.set_length(total);
        self.bar.set_position(completed);
    }
}

impl Drop for Bar {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

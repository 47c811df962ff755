//! Status lines printed while processing files.

use std::path::Path;

use bytesize::ByteSize;
use console::style;

use crate::types::Processing;

/// Formats a byte count for humans.
pub fn format_bytes(bytes: u64) -> String {
    ByteSize::b(bytes).to_string()
}

/// Prints the line that opens a file's processing, e.g. `Encrypting notes.txt (1.2 KiB)`.
pub fn show_start(processing: Processing, path: &Path, size: Option<u64>) {
    match size {
        Some(size) => println!("{} {} ({})", style(processing.label()).bold(), path.display(), format_bytes(size)),
        None => println!("{} {}", style(processing.label()).bold(), path.display()),
    }
}

/// Prints the successful outcome and where the result was written.
pub fn show_done(output: &Path) {
    println!("  {} {}", style("done").green().bold(), style(output.display()).dim());
}

/// Prints a failed outcome with the reason.
pub fn show_failed(reason: &str) {
    println!("  {} {}", style("FAILED").red().bold(), reason);
}

/// Prints the notice for a path that does not exist.
pub fn show_missing(path: &Path) {
    println!("{}", style(format!("File {} does not exist, skipped.", path.display())).yellow());
}

/// Prints the closing summary when at least one file failed.
pub fn show_summary(failed: usize, total: usize) {
    println!();
    println!("{} {}", style("✗").red(), style(format!("{failed} of {total} file(s) failed")).bold());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(500), "500 B");
        assert_ne!(format_bytes(2048), "2048 B");
    }
}

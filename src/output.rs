//! Result types returned by the conversion entry points.
//!
//! Everything here derives `Serialize`/`Deserialize` so the CLI can print a
//! full report with `--json` and callers can persist run summaries.

use crate::error::FileError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The LaTeX produced for one document plus counters about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// Translated document, lines joined with `\n`.
    pub latex: String,
    pub stats: ConversionStats,
}

/// Counters collected by the engine while walking a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Lines in the source (a trailing newline counts as one empty line).
    pub input_lines: usize,
    /// Lines in the translated output, markers included.
    pub output_lines: usize,
    pub headings: usize,
    pub list_items: usize,
    /// Number of list environments opened, type switches included.
    pub lists_opened: usize,
    /// Number of fenced blocks opened.
    pub literal_blocks: usize,
    /// The document ended inside a fenced block.
    pub unterminated_literal: bool,
}

/// Outcome of converting one file, successful or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub source: PathBuf,
    /// Where the LaTeX was (or would have been) written.
    pub destination: PathBuf,
    /// Bytes of LaTeX written; 0 on failure.
    pub output_bytes: usize,
    /// Present when the conversion succeeded.
    pub stats: Option<ConversionStats>,
    /// Present when the conversion failed.
    pub error: Option<FileError>,
    pub duration_ms: u64,
}

impl FileReport {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome of a batch conversion over a directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchOutput {
    /// One report per discovered document, sorted by source path.
    pub files: Vec<FileReport>,
    pub stats: BatchStats,
}

/// Aggregate counters for a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub discovered: usize,
    pub converted: usize,
    pub failed: usize,
    pub total_duration_ms: u64,
}

impl BatchOutput {
    /// Iterate over the reports that carry an error.
    pub fn failures(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| !f.is_success())
    }

    /// Failures other than a document that vanished before it was read.
    ///
    /// A missing document is a soft failure: it is reported but does not
    /// make the batch as a whole unsuccessful.
    pub fn hard_failures(&self) -> impl Iterator<Item = &FileReport> {
        self.failures()
            .filter(|f| !matches!(f.error, Some(FileError::Missing { .. })))
    }
}

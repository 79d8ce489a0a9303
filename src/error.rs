//! Error types for the md2tex library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Md2TexError`] — **Fatal** for one operation: the source file or
//!   directory is missing, unreadable, or the output cannot be written.
//!   Returned as `Err(Md2TexError)` from the top-level `convert*` functions.
//!
//! * [`FileError`] — **Non-fatal**: one document in a batch failed but the
//!   others are fine. Stored inside [`crate::output::FileReport`] so callers
//!   can inspect partial success.
//!
//! The conversion engine itself has no error type. It is defined on every
//! string input and degrades unparseable markup to literal text.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the md2tex library.
#[derive(Debug, Error)]
pub enum Md2TexError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Source file was not found at the given path.
    #[error("File {} does not exist", .path.display())]
    FileNotFound { path: PathBuf },

    /// Batch directory was not found.
    #[error("Directory {} does not exist", .path.display())]
    DirectoryNotFound { path: PathBuf },

    /// The path exists but is a directory or some other non-file entry.
    #[error("'{}' is not a regular file", .path.display())]
    NotAFile { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{}'\nTry: chmod +r {:?}", .path.display(), .path)]
    PermissionDenied { path: PathBuf },

    /// The file was read but is not valid UTF-8.
    #[error("'{}' is not valid UTF-8 text", .path.display())]
    InvalidEncoding { path: PathBuf },

    /// Any other I/O failure while reading the source.
    #[error("Failed to read '{}': {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create the destination directory or write the LaTeX file.
    #[error("Failed to write output file '{}': {source}", .path.display())]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Md2TexError {
    /// True when the error means "there was nothing to convert", the soft
    /// failure the CLI reports without a non-zero exit.
    pub fn is_missing_input(&self) -> bool {
        matches!(
            self,
            Md2TexError::FileNotFound { .. } | Md2TexError::DirectoryNotFound { .. }
        )
    }
}

/// A non-fatal error for a single document in a batch.
///
/// The batch continues regardless; the error is recorded on the
/// document's [`crate::output::FileReport`].
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum FileError {
    /// The document vanished between discovery and conversion.
    #[error("File {} does not exist", .path.display())]
    Missing { path: PathBuf },

    /// The document could not be read or decoded.
    #[error("{}: read failed: {detail}", .path.display())]
    ReadFailed { path: PathBuf, detail: String },

    /// The converted output could not be written.
    #[error("{}: write failed: {detail}", .path.display())]
    WriteFailed { path: PathBuf, detail: String },
}

impl FileError {
    /// Downgrade a fatal single-file error to its per-file batch form.
    pub fn from_fatal(source: PathBuf, err: &Md2TexError) -> Self {
        match err {
            Md2TexError::FileNotFound { .. } => FileError::Missing { path: source },
            Md2TexError::OutputWriteFailed { path, source: io } => FileError::WriteFailed {
                path: path.clone(),
                detail: io.to_string(),
            },
            other => FileError::ReadFailed {
                path: source,
                detail: other.to_string(),
            },
        }
    }

    /// The path the error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            FileError::Missing { path }
            | FileError::ReadFailed { path, .. }
            | FileError::WriteFailed { path, .. } => path,
        }
    }
}

//! Progress-callback trait for per-file batch events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as a batch converts each document. Single-document conversion
//! reports nothing here; it finishes in one step.
//!
//! # Example
//!
//! ```rust
//! use md2tex::{ConversionProgressCallback, ConversionConfig};
//! use std::path::Path;
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_file_complete(&self, source: &Path, latex_len: usize) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{} done ({} bytes)", source.display(), latex_len);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { completed: AtomicUsize::new(0) });
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by batch conversion as it processes each document.
///
/// Implementations must be `Send + Sync`: with `concurrency > 1` the
/// per-file methods may be called from several tasks at once. All methods
/// default to no-ops so callers only override what they care about.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once after discovery, before any document is read.
    fn on_batch_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called just before a document is read.
    fn on_file_start(&self, source: &Path) {
        let _ = source;
    }

    /// Called when a document was converted and written.
    ///
    /// `latex_len` is the byte length of the produced LaTeX.
    fn on_file_complete(&self, source: &Path, latex_len: usize) {
        let _ = (source, latex_len);
    }

    /// Called when a document failed. The batch carries on.
    fn on_file_error(&self, source: &Path, error: &str) {
        let _ = (source, error);
    }

    /// Called once after every document has been attempted.
    fn on_batch_complete(&self, total_files: usize, success_count: usize) {
        let _ = (total_files, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

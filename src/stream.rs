//! Streaming batch API: emit per-file results as they complete.
//!
//! Unlike the eager [`crate::convert::convert_dir`], which returns only
//! after every document is done, [`convert_dir_stream`] yields one item per
//! document as soon as it finishes. With `concurrency > 1` items may arrive
//! out of order; sort by `source` if order matters.

use crate::config::ConversionConfig;
use crate::convert::convert_report;
use crate::error::{FileError, Md2TexError};
use crate::output::FileReport;
use crate::pipeline::input;
use futures::stream::{self, StreamExt};
use std::pin::Pin;
use tokio_stream::Stream;
use tracing::{info, warn};

/// A boxed stream of per-file results.
pub type FileStream = Pin<Box<dyn Stream<Item = Result<FileReport, FileError>> + Send>>;

/// Convert every source document in `dir`, streaming results as they finish.
///
/// Discovery happens before this returns, so a missing directory is
/// reported here rather than as a stream item.
///
/// # Returns
/// - `Ok(FileStream)` — a stream of `Result<FileReport, FileError>`
/// - `Err(Md2TexError)` — the directory could not be listed
pub async fn convert_dir_stream(
    dir: impl AsRef<std::path::Path>,
    config: &ConversionConfig,
) -> Result<FileStream, Md2TexError> {
    let dir = dir.as_ref();
    let sources = input::discover_sources(dir, &config.source_extension).await?;
    if sources.is_empty() {
        warn!(
            "No *.{} files found in {}",
            config.source_extension,
            dir.display()
        );
    } else {
        info!(
            "Streaming conversion of {} file(s) from {}",
            sources.len(),
            dir.display()
        );
    }

    let concurrency = config.concurrency;
    let config = config.clone();

    let s = stream::iter(sources)
        .map(move |source| {
            let cfg = config.clone();
            async move {
                let mut report = convert_report(&source, &cfg).await;
                match report.error.take() {
                    None => Ok(report),
                    Some(err) => Err(err),
                }
            }
        })
        .buffer_unordered(concurrency);

    Ok(Box::pin(s))
}

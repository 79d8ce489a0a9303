//! Output: derive the destination path and write LaTeX atomically.
//!
//! The file is written to a temporary sibling in the destination directory
//! and then persisted over the final name, so a crash never leaves a
//! half-written `.tex` behind.

use crate::config::ConversionConfig;
use crate::error::Md2TexError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Destination for `source`: `output_dir/<stem>.<target_extension>`.
///
/// Only the file stem of `source` is kept; its directory is replaced by the
/// configured output directory.
pub fn output_path_for(source: &Path, config: &ConversionConfig) -> PathBuf {
    let mut name = source
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "output".into());
    name.push(".");
    name.push(&config.target_extension);
    config.output_dir.join(name)
}

/// Write `contents` to `dest`, creating missing parent directories.
pub async fn write_output(dest: &Path, contents: &str) -> Result<(), Md2TexError> {
    let dest_buf = dest.to_path_buf();
    let contents = contents.to_owned();

    tokio::task::spawn_blocking(move || write_atomic(&dest_buf, &contents))
        .await
        .map_err(|e| Md2TexError::Internal(format!("Write task panicked: {e}")))??;

    debug!("Wrote {}", dest.display());
    Ok(())
}

fn write_atomic(dest: &Path, contents: &str) -> Result<(), Md2TexError> {
    let fail = |source: std::io::Error| Md2TexError::OutputWriteFailed {
        path: dest.to_path_buf(),
        source,
    };

    let parent = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(fail)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(fail)?;
    tmp.write_all(contents.as_bytes()).map_err(fail)?;
    tmp.persist(dest).map_err(|e| fail(e.error))?;
    Ok(())
}

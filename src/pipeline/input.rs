//! Input resolution: validate a source path, read it as UTF-8, and
//! enumerate the documents of a batch directory.
//!
//! Existence is checked up front so a missing file surfaces as
//! [`Md2TexError::FileNotFound`] (a soft failure for the CLI) rather than a
//! raw I/O error.

use crate::error::Md2TexError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Check that `path` names an existing regular file.
pub async fn resolve_source(path: &Path) -> Result<PathBuf, Md2TexError> {
    let meta = match tokio::fs::metadata(path).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Md2TexError::FileNotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            return Err(Md2TexError::PermissionDenied {
                path: path.to_path_buf(),
            })
        }
        Err(e) => {
            return Err(Md2TexError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    if !meta.is_file() {
        return Err(Md2TexError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    debug!("Resolved source: {}", path.display());
    Ok(path.to_path_buf())
}

/// Read a resolved source as UTF-8 text.
pub async fn read_source(path: &Path) -> Result<String, Md2TexError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => Md2TexError::FileNotFound {
            path: path.to_path_buf(),
        },
        ErrorKind::PermissionDenied => Md2TexError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => Md2TexError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    String::from_utf8(bytes).map_err(|_| Md2TexError::InvalidEncoding {
        path: path.to_path_buf(),
    })
}

/// List the regular files directly inside `dir` whose extension is
/// `extension`, sorted by path. Subdirectories are not descended into.
pub async fn discover_sources(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, Md2TexError> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Md2TexError::DirectoryNotFound {
                path: dir.to_path_buf(),
            })
        }
        Err(e) => {
            return Err(Md2TexError::ReadFailed {
                path: dir.to_path_buf(),
                source: e,
            })
        }
    };

    let mut sources = Vec::new();
    loop {
        let entry = entries
            .next_entry()
            .await
            .map_err(|e| Md2TexError::ReadFailed {
                path: dir.to_path_buf(),
                source: e,
            })?;
        let Some(entry) = entry else { break };

        let path = entry.path();
        if !has_extension(&path, extension) {
            continue;
        }
        // Follows symlinks, so a link to a Markdown file counts.
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => sources.push(path),
            _ => debug!("Skipping non-file entry {}", path.display()),
        }
    }

    sources.sort();
    debug!(
        "Discovered {} *.{} file(s) in {}",
        sources.len(),
        extension,
        dir.display()
    );
    Ok(sources)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(extension)
}

//! Conversion entry points: in-memory, single file, and whole directory.
//!
//! [`convert_str`] is the pure core. The file variants wrap it with the
//! collaborators in [`crate::pipeline::input`] and [`crate::pipeline::write`];
//! every document, batch or not, gets its own engine instance.

use crate::config::ConversionConfig;
use crate::error::{FileError, Md2TexError};
use crate::output::{BatchOutput, BatchStats, ConversionOutput, FileReport};
use crate::pipeline::engine::{convert_document, EngineOptions};
use crate::pipeline::{input, write};
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Convert Markdown text to LaTeX.
///
/// Total and side-effect free: every input yields output, and unparseable
/// markup passes through unchanged.
///
/// # Example
/// ```rust
/// use md2tex::{convert_str, ConversionConfig};
///
/// let out = convert_str("# Intro\n\nSee [ref:Knuth84].", &ConversionConfig::default());
/// assert_eq!(out.latex, "\\chapter{Intro}\n\nSee \\cite{Knuth84}.");
/// ```
pub fn convert_str(text: &str, config: &ConversionConfig) -> ConversionOutput {
    convert_document(text, engine_options(config))
}

/// Read a Markdown file and convert it, without writing anything.
///
/// # Errors
/// - [`Md2TexError::FileNotFound`] when the file does not exist
/// - [`Md2TexError::NotAFile`], [`Md2TexError::PermissionDenied`],
///   [`Md2TexError::InvalidEncoding`], [`Md2TexError::ReadFailed`]
pub async fn convert_file(
    source: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Md2TexError> {
    let source = input::resolve_source(source.as_ref()).await?;
    let text = input::read_source(&source).await?;
    Ok(convert_str(&text, config))
}

/// Convert a Markdown file and write the result to
/// `output_dir/<stem>.<target_extension>`, creating `output_dir` if needed.
///
/// # Errors
/// Everything [`convert_file`] returns, plus
/// [`Md2TexError::OutputWriteFailed`].
pub async fn convert_to_file(
    source: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<FileReport, Md2TexError> {
    let start = Instant::now();
    let source = source.as_ref();
    let output = convert_file(source, config).await?;

    let destination = write::output_path_for(source, config);
    write::write_output(&destination, &output.latex).await?;
    info!("Converted: {} → {}", source.display(), destination.display());

    Ok(FileReport {
        source: source.to_path_buf(),
        destination,
        output_bytes: output.latex.len(),
        stats: Some(output.stats),
        error: None,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

/// Synchronous wrapper around [`convert_to_file`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    source: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<FileReport, Md2TexError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Md2TexError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert_to_file(source, config))
}

/// Convert every `*.<source_extension>` file directly inside `dir`.
///
/// Up to `config.concurrency` documents are in flight at once. A document
/// that fails is recorded in its [`FileReport`] and the batch carries on.
///
/// # Errors
/// Only when the directory itself cannot be listed, e.g.
/// [`Md2TexError::DirectoryNotFound`].
pub async fn convert_dir(
    dir: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<BatchOutput, Md2TexError> {
    let total_start = Instant::now();
    let dir = dir.as_ref();
    let sources = input::discover_sources(dir, &config.source_extension).await?;

    if sources.is_empty() {
        warn!(
            "No *.{} files found in {}",
            config.source_extension,
            dir.display()
        );
        return Ok(BatchOutput::default());
    }
    info!(
        "Found {} *.{} file(s) to convert in {}",
        sources.len(),
        config.source_extension,
        dir.display()
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(sources.len());
    }

    let mut files: Vec<FileReport> = stream::iter(sources.iter())
        .map(|source| convert_report(source, config))
        .buffer_unordered(config.concurrency)
        .collect()
        .await;

    // Sort by source for consistent output
    files.sort_by(|a, b| a.source.cmp(&b.source));

    let converted = files.iter().filter(|f| f.is_success()).count();
    let stats = BatchStats {
        discovered: sources.len(),
        converted,
        failed: files.len() - converted,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Batch complete: {}/{} files, {}ms total",
        stats.converted, stats.discovered, stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(stats.discovered, stats.converted);
    }

    Ok(BatchOutput { files, stats })
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn engine_options(config: &ConversionConfig) -> EngineOptions {
    EngineOptions {
        close_unterminated_literal: config.close_unterminated_literal,
    }
}

/// Convert one batch member, folding any failure into the report.
///
/// Never returns an error so one bad document cannot abort the batch.
pub(crate) async fn convert_report(source: &Path, config: &ConversionConfig) -> FileReport {
    let start = Instant::now();
    if let Some(ref cb) = config.progress_callback {
        cb.on_file_start(source);
    }

    let report = match convert_to_file(source, config).await {
        Ok(report) => {
            if let Some(ref cb) = config.progress_callback {
                cb.on_file_complete(source, report.output_bytes);
            }
            report
        }
        Err(e) => {
            warn!("Failed to convert {}: {}", source.display(), e);
            if let Some(ref cb) = config.progress_callback {
                cb.on_file_error(source, &e.to_string());
            }
            FileReport {
                source: source.to_path_buf(),
                destination: write::output_path_for(source, config),
                output_bytes: 0,
                stats: None,
                error: Some(FileError::from_fatal(source.to_path_buf(), &e)),
                duration_ms: start.elapsed().as_millis() as u64,
            }
        }
    };
    debug!("{} done in {}ms", source.display(), report.duration_ms);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn convert_str_uses_fresh_engine_per_call() {
        let config = ConversionConfig::default();
        let first = convert_str("```\nopen", &config);
        assert!(first.stats.unterminated_literal);
        let second = convert_str("# After", &config);
        assert_eq!(second.latex, "\\chapter{After}");
    }

    #[test]
    fn convert_str_honours_hardened_literal() {
        let config = ConversionConfig::builder()
            .close_unterminated_literal(true)
            .build()
            .unwrap();
        let out = convert_str("```\nopen", &config);
        assert_eq!(out.latex, "\\begin{verbatim}\nopen\n\\end{verbatim}");
    }

    #[test]
    fn convert_str_document() {
        let md = "# Introduction\n\nThis thesis studies **graphs**.\n\n- one\n- two\n\n## Related *work*";
        let out = convert_str(md, &ConversionConfig::default());
        assert_eq!(
            out.latex,
            "\\chapter{Introduction}\n\
             \n\
             This thesis studies \\textbf{graphs}.\n\
             \n\
             \\begin{itemize}\n\
             \\item one\n\
             \\item two\n\
             \\end{itemize}\n\
             \n\
             \\section{Related \\textit{work}}"
        );
    }
}

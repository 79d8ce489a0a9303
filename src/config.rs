//! Configuration types for Markdown-to-LaTeX conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The engine itself needs only one knob
//! ([`ConversionConfig::close_unterminated_literal`]); everything else steers
//! the file collaborators around it: where sources are discovered, where
//! output lands, and how many documents a batch converts at once.

use crate::error::Md2TexError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;

/// Configuration for a Markdown-to-LaTeX conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use md2tex::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .output_dir("build/tex")
///     .concurrency(8)
///     .build()
///     .unwrap();
/// assert_eq!(config.target_extension, "tex");
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Directory converted files are written to. Created on demand. Default: `tex`.
    pub output_dir: PathBuf,

    /// Directory enumerated by batch mode when no directory is given. Default: `content`.
    pub content_dir: PathBuf,

    /// Extension (without the dot) of source documents. Default: `md`.
    pub source_extension: String,

    /// Extension (without the dot) of written files. Default: `tex`.
    pub target_extension: String,

    /// Number of documents converted at once in batch mode. Default: 4.
    ///
    /// Each document gets its own engine instance, so this only bounds how
    /// many files are open and in flight at the same time.
    pub concurrency: usize,

    /// Emit the literal-block close marker when a document ends inside a
    /// fenced block. Default: false.
    ///
    /// Off reproduces the historical output, where an unterminated fence is
    /// simply never closed.
    pub close_unterminated_literal: bool,

    /// Receives per-file batch events. Default: None.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("tex"),
            content_dir: PathBuf::from("content"),
            source_extension: "md".to_string(),
            target_extension: "tex".to_string(),
            concurrency: 4,
            close_unterminated_literal: false,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("output_dir", &self.output_dir)
            .field("content_dir", &self.content_dir)
            .field("source_extension", &self.source_extension)
            .field("target_extension", &self.target_extension)
            .field("concurrency", &self.concurrency)
            .field("close_unterminated_literal", &self.close_unterminated_literal)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn content_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.content_dir = dir.into();
        self
    }

    /// Accepts `md` or `.md`; the leading dot is dropped.
    pub fn source_extension(mut self, ext: impl Into<String>) -> Self {
        self.config.source_extension = strip_dot(ext.into());
        self
    }

    /// Accepts `tex` or `.tex`; the leading dot is dropped.
    pub fn target_extension(mut self, ext: impl Into<String>) -> Self {
        self.config.target_extension = strip_dot(ext.into());
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn close_unterminated_literal(mut self, v: bool) -> Self {
        self.config.close_unterminated_literal = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Md2TexError> {
        let c = &self.config;
        validate_extension("source", &c.source_extension)?;
        validate_extension("target", &c.target_extension)?;
        if c.concurrency == 0 {
            return Err(Md2TexError::InvalidConfig(
                "Concurrency must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

fn strip_dot(ext: String) -> String {
    match ext.strip_prefix('.') {
        Some(rest) => rest.to_string(),
        None => ext,
    }
}

fn validate_extension(which: &str, ext: &str) -> Result<(), Md2TexError> {
    if ext.is_empty() {
        return Err(Md2TexError::InvalidConfig(format!(
            "{which} extension must not be empty"
        )));
    }
    if ext.contains(['/', '\\', '.']) {
        return Err(Md2TexError::InvalidConfig(format!(
            "{which} extension must be a bare extension like 'md', got '{ext}'"
        )));
    }
    Ok(())
}

//! # md2tex
//!
//! Convert thesis chapters written in a small Markdown dialect to LaTeX.
//!
//! The dialect is deliberately narrow: ATX headings, flat bulleted and
//! numbered lists, fenced literal blocks, bold/italic emphasis, inline code
//! and `[ref:key]` citations. Anything else passes through untouched, so the
//! output can still be edited by hand before it goes into the thesis build.
//!
//! ## Pipeline Overview
//!
//! ```text
//! content/*.md
//!  │
//!  ├─ 1. Input    validate the path, read UTF-8, discover batch files
//!  ├─ 2. Engine   line state machine: headings, lists, literal blocks
//!  ├─ 3. Inline   strong → emphasis → code span → citation
//!  └─ 4. Output   tex/<stem>.tex, written atomically, plus per-file stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use md2tex::{convert_dir, convert_str, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!
//!     let out = convert_str("## Method\n\n1. measure\n2. repeat", &config);
//!     println!("{}", out.latex);
//!
//!     let batch = convert_dir("content", &config).await?;
//!     eprintln!("{}/{} converted", batch.stats.converted, batch.stats.discovered);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `md2tex` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! md2tex = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert_dir, convert_file, convert_str, convert_sync, convert_to_file};
pub use error::{FileError, Md2TexError};
pub use output::{BatchOutput, BatchStats, ConversionOutput, ConversionStats, FileReport};
pub use pipeline::engine::{BlockState, Converter, EngineOptions};
pub use pipeline::markup::ListKind;
pub use pipeline::write::output_path_for;
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use stream::{convert_dir_stream, FileStream};

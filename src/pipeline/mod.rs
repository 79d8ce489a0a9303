//! Pipeline stages for Markdown-to-LaTeX conversion.
//!
//! Each submodule implements exactly one step, so each can be tested on its
//! own and the LaTeX spelling can change without touching the parser.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ engine ──────────────────────────▶ write
//! (read)    │ per line: classify ─▶ inline     (atomic)
//!           └──────────── markup ◀─┘
//! ```
//!
//! 1. [`input`]    — validate the source path, read UTF-8, discover batch files
//! 2. [`engine`]   — the line state machine; owns list / literal-block state
//! 3. [`classify`] — heading and list-item recognition
//! 4. [`inline`]   — emphasis, code span and citation rewriting
//! 5. [`markup`]   — the LaTeX commands and environments emitted
//! 6. [`write`]    — derive the destination path and persist the output

pub mod classify;
pub mod engine;
pub mod inline;
pub mod input;
pub mod markup;
pub mod write;

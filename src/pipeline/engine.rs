//! The line-oriented conversion engine.
//!
//! A [`Converter`] walks a document once, line by line, carrying a single
//! [`BlockState`] across lines. Each line is offered to an ordered chain of
//! rules and the first rule that claims it decides what is emitted:
//!
//! ```text
//! fence ─▶ literal ─▶ heading ─▶ list item ─▶ (close list) ─▶ blank ─▶ paragraph
//! ```
//!
//! The "close list" rule never claims a line. It only ends an open list
//! before the line falls through to the blank or paragraph rule. A line
//! that starts with a list marker but has no item text (`- `) does not end
//! the list; it is emitted as text inside it.
//!
//! Every emission for a line is pushed before the next line is read, so list
//! and block markers always sit right next to the line that triggered them.

use crate::output::{ConversionOutput, ConversionStats};
use crate::pipeline::classify::{classify_heading, classify_list_item, has_list_marker};
use crate::pipeline::inline::format_inline;
use crate::pipeline::markup::{self, ListKind};
use tracing::{debug, trace, warn};

/// Fence marker that opens and closes a literal block.
const FENCE: &str = "```";

/// Parsing state carried from one line to the next.
///
/// Being inside a literal block and inside a list are mutually exclusive:
/// opening a block always closes the list first, so a single enum covers
/// every reachable combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockState {
    /// Ordinary text, no list open.
    #[default]
    Prose,
    /// A list environment of the given kind is open.
    List(ListKind),
    /// Inside a fenced block; lines are copied verbatim.
    Literal,
}

/// Whether a rule consumed the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Handled,
    Continue,
}

type Rule = fn(&mut Converter, &str) -> Flow;

/// Rules in priority order. The first one returning [`Flow::Handled`] wins.
const RULES: &[(&str, Rule)] = &[
    ("fence", Converter::fence),
    ("literal", Converter::literal),
    ("heading", Converter::heading),
    ("list_item", Converter::list_item),
    ("close_list", Converter::close_list_before_text),
    ("blank", Converter::blank),
    ("paragraph", Converter::paragraph),
];

/// Options the engine reads. Everything else in
/// [`crate::ConversionConfig`] belongs to the file collaborators.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineOptions {
    /// Emit the block-close marker if the document ends inside a fence.
    pub close_unterminated_literal: bool,
}

/// A single-document converter.
///
/// Not meant to be shared: each document gets its own instance, which is
/// what lets a batch convert several documents in parallel.
#[derive(Debug, Default)]
pub struct Converter {
    options: EngineOptions,
    state: BlockState,
    out: Vec<String>,
    stats: ConversionStats,
}

impl Converter {
    pub fn new(options: EngineOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Current block state. Mostly useful in tests.
    pub fn state(&self) -> BlockState {
        self.state
    }

    /// Convert a whole document.
    ///
    /// State is reset on entry, so calling this twice on one instance gives
    /// the same result as using two fresh instances.
    pub fn convert(&mut self, text: &str) -> ConversionOutput {
        self.state = BlockState::Prose;
        self.out.clear();
        self.stats = ConversionStats::default();

        for line in text.split('\n') {
            self.stats.input_lines += 1;
            self.process_line(line);
        }
        self.finish();

        self.stats.output_lines = self.out.len();
        ConversionOutput {
            latex: self.out.join("\n"),
            stats: std::mem::take(&mut self.stats),
        }
    }

    fn process_line(&mut self, line: &str) {
        for (name, rule) in RULES {
            if rule(self, line) == Flow::Handled {
                trace!(rule = *name, "line claimed");
                return;
            }
        }
    }

    fn finish(&mut self) {
        match self.state {
            BlockState::List(kind) => self.end_list(kind),
            BlockState::Literal => {
                self.stats.unterminated_literal = true;
                if self.options.close_unterminated_literal {
                    warn!("Document ended inside a fenced block; closing it");
                    self.emit(markup::end_literal());
                    self.state = BlockState::Prose;
                } else {
                    warn!("Document ended inside a fenced block; it is left open");
                }
            }
            BlockState::Prose => {}
        }
    }

    // ── Rules ────────────────────────────────────────────────────────────

    fn fence(&mut self, line: &str) -> Flow {
        if !line.trim().starts_with(FENCE) {
            return Flow::Continue;
        }
        match self.state {
            BlockState::Literal => {
                self.emit(markup::end_literal());
                self.state = BlockState::Prose;
            }
            BlockState::List(kind) => {
                self.end_list(kind);
                self.begin_literal();
            }
            BlockState::Prose => self.begin_literal(),
        }
        Flow::Handled
    }

    fn literal(&mut self, line: &str) -> Flow {
        if self.state != BlockState::Literal {
            return Flow::Continue;
        }
        self.emit(line.to_string());
        Flow::Handled
    }

    fn heading(&mut self, line: &str) -> Flow {
        let Some(heading) = classify_heading(line) else {
            return Flow::Continue;
        };
        if let BlockState::List(kind) = self.state {
            self.end_list(kind);
        }
        self.stats.headings += 1;
        self.emit(heading.latex);
        Flow::Handled
    }

    fn list_item(&mut self, line: &str) -> Flow {
        let Some(item) = classify_list_item(line) else {
            return Flow::Continue;
        };
        match self.state {
            BlockState::List(open) if open == item.kind => {}
            BlockState::List(open) => {
                self.end_list(open);
                self.begin_list(item.kind);
            }
            _ => self.begin_list(item.kind),
        }
        self.stats.list_items += 1;
        self.emit(item.latex);
        Flow::Handled
    }

    fn close_list_before_text(&mut self, line: &str) -> Flow {
        if let BlockState::List(kind) = self.state {
            if !has_list_marker(line) {
                self.end_list(kind);
            }
        }
        Flow::Continue
    }

    fn blank(&mut self, line: &str) -> Flow {
        if !line.trim().is_empty() {
            return Flow::Continue;
        }
        self.emit(String::new());
        Flow::Handled
    }

    fn paragraph(&mut self, line: &str) -> Flow {
        self.emit(format_inline(line));
        Flow::Handled
    }

    // ── Emission helpers ─────────────────────────────────────────────────

    fn emit(&mut self, line: String) {
        self.out.push(line);
    }

    fn begin_list(&mut self, kind: ListKind) {
        debug!(?kind, "open list");
        self.stats.lists_opened += 1;
        self.emit(markup::begin_list(kind));
        self.state = BlockState::List(kind);
    }

    fn end_list(&mut self, kind: ListKind) {
        debug!(?kind, "close list");
        self.emit(markup::end_list(kind));
        self.state = BlockState::Prose;
    }

    fn begin_literal(&mut self) {
        debug!("open literal block");
        self.stats.literal_blocks += 1;
        self.emit(markup::begin_literal());
        self.state = BlockState::Literal;
    }
}

/// Convert one document with a fresh engine.
pub fn convert_document(text: &str, options: EngineOptions) -> ConversionOutput {
    Converter::new(options).convert(text)
}

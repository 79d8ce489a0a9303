//! LaTeX vocabulary emitted by the engine.
//!
//! The parsing stages only decide *what* a line is; the exact spelling of
//! the commands lives here so it can change without touching classification.

/// Which list environment is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// `1.` style items → `enumerate`.
    Ordered,
    /// `-`, `*`, `+` items → `itemize`.
    Unordered,
}

impl ListKind {
    pub fn environment(self) -> &'static str {
        match self {
            ListKind::Ordered => "enumerate",
            ListKind::Unordered => "itemize",
        }
    }
}

/// Sectioning commands indexed by heading level minus one.
const HEADING_COMMANDS: [&str; 6] = [
    "chapter",
    "section",
    "subsection",
    "subsubsection",
    "paragraph",
    "subparagraph",
];

/// Per-line item token placed between the indent and the item text.
pub const ITEM: &str = "\\item ";

const LITERAL_ENV: &str = "verbatim";

/// Sectioning command for `level` (1–6). Levels past 6 use the last one.
pub fn heading_command(level: usize) -> &'static str {
    HEADING_COMMANDS[level.clamp(1, HEADING_COMMANDS.len()) - 1]
}

pub fn heading(level: usize, title: &str) -> String {
    format!("\\{}{{{}}}", heading_command(level), title)
}

pub fn begin_list(kind: ListKind) -> String {
    begin(kind.environment())
}

pub fn end_list(kind: ListKind) -> String {
    end(kind.environment())
}

pub fn begin_literal() -> String {
    begin(LITERAL_ENV)
}

pub fn end_literal() -> String {
    end(LITERAL_ENV)
}

pub fn item(indent: &str, content: &str) -> String {
    format!("{indent}{ITEM}{content}")
}

pub fn strong(text: &str) -> String {
    format!("\\textbf{{{text}}}")
}

pub fn emphasis(text: &str) -> String {
    format!("\\textit{{{text}}}")
}

pub fn literal_span(text: &str) -> String {
    format!("\\texttt{{{text}}}")
}

pub fn citation(key: &str) -> String {
    format!("\\cite{{{key}}}")
}

fn begin(env: &str) -> String {
    format!("\\begin{{{env}}}")
}

fn end(env: &str) -> String {
    format!("\\end{{{env}}}")
}

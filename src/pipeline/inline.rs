//! Inline formatting: rewrite emphasis, code spans and citations in one line.
//!
//! ## Pass Order
//!
//! Passes run in a fixed order and each one sees the output of the previous:
//!
//! 1. Strong emphasis `**x**` / `__x__` → `\textbf{x}`
//! 2. Emphasis `*x*` / `_x_` → `\textit{x}`, only for delimiters that are not
//!    doubled, so the strong markers from pass 1 are never re-read
//! 3. Code span `` `x` `` → `\texttt{x}`
//! 4. Citation `[ref:KEY]` → `\cite{KEY}`, except when written inside a
//!    code span; a citation around a code span is still rewritten
//!
//! Swapping passes 1 and 2 changes the output for `**bold** and *italic*`,
//! so the order is part of the contract. Unbalanced delimiters are left as
//! literal text; no pass can fail.

use crate::pipeline::markup;
use once_cell::sync::Lazy;
use regex::{Captures, Match, Regex};
use std::ops::Range;

static RE_STRONG_STAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static RE_STRONG_UNDERSCORE: Lazy<Regex> = Lazy::new(|| Regex::new(r"__(.+?)__").unwrap());
static RE_EMPH_STAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*]+?)\*").unwrap());
static RE_EMPH_UNDERSCORE: Lazy<Regex> = Lazy::new(|| Regex::new(r"_([^_]+?)_").unwrap());
static RE_CODE_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(.+?)`").unwrap());
static RE_CITATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[ref:([^\]]+)\]").unwrap());

/// Apply all inline passes to a single line.
///
/// A line with no recognised pattern comes back unchanged.
pub fn format_inline(line: &str) -> String {
    let s = replace_strong(line);
    let s = replace_emphasis(&s);
    let (s, spans) = replace_code_spans(&s);
    replace_citations(&s, &spans)
}

// ── Pass 1: Strong emphasis ──────────────────────────────────────────────────

fn replace_strong(input: &str) -> String {
    let s = RE_STRONG_STAR.replace_all(input, wrap_strong);
    RE_STRONG_UNDERSCORE.replace_all(&s, wrap_strong).into_owned()
}

fn wrap_strong(caps: &Captures<'_>) -> String {
    markup::strong(&caps[1])
}

// ── Pass 2: Emphasis ─────────────────────────────────────────────────────────

fn replace_emphasis(input: &str) -> String {
    let s = replace_lone_delimited(input, &RE_EMPH_STAR, b'*');
    replace_lone_delimited(&s, &RE_EMPH_UNDERSCORE, b'_')
}

/// Wrap `re` matches in `\textit{}` unless the opening delimiter is preceded
/// by, or the closing delimiter followed by, another `delim`.
///
/// The `regex` crate has no look-around, so candidates are vetted against
/// their neighbours here and a rejected candidate resumes the search one
/// byte further on. `delim` is ASCII, so that offset is a char boundary.
fn replace_lone_delimited(input: &str, re: &Regex, delim: u8) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut copied = 0;
    let mut pos = 0;

    while let Some(caps) = re.captures_at(input, pos) {
        let Some(whole) = caps.get(0) else { break };
        let (start, end) = (whole.start(), whole.end());

        let doubled_before = start > 0 && bytes[start - 1] == delim;
        let doubled_after = bytes.get(end) == Some(&delim);
        if doubled_before || doubled_after {
            pos = start + 1;
            continue;
        }

        out.push_str(&input[copied..start]);
        out.push_str(&markup::emphasis(&caps[1]));
        copied = end;
        pos = end;
    }

    out.push_str(&input[copied..]);
    out
}

// ── Pass 3: Code spans ───────────────────────────────────────────────────────

/// Rewrite code spans, returning the new line and the byte range each
/// `\texttt{..}` occupies in it.
fn replace_code_spans(input: &str) -> (String, Vec<Range<usize>>) {
    let mut out = String::with_capacity(input.len() + 16);
    let mut spans = Vec::new();
    let mut last = 0;
    for caps in RE_CODE_SPAN.captures_iter(input) {
        let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push_str(&input[last..whole.start()]);
        let start = out.len();
        out.push_str(&markup::literal_span(body.as_str()));
        spans.push(start..out.len());
        last = whole.end();
    }
    out.push_str(&input[last..]);
    (out, spans)
}

// ── Pass 4: Citations ────────────────────────────────────────────────────────

/// Rewrite citations over the whole line, except one lying entirely inside
/// a code span. A citation wrapping a span, or straddling one, is rewritten.
fn replace_citations(input: &str, code_spans: &[Range<usize>]) -> String {
    let in_code = |m: &Match<'_>| {
        code_spans
            .iter()
            .any(|r| r.start <= m.start() && m.end() <= r.end)
    };
    RE_CITATION
        .replace_all(input, |caps: &Captures<'_>| match caps.get(0) {
            Some(m) if in_code(&m) => m.as_str().to_string(),
            _ => markup::citation(&caps[1]),
        })
        .into_owned()
}

// ── Tests ────────────────────────────────────────────────────────────────────

//! Line classifiers: headings and list items.
//!
//! Both classifiers are total. A line that does not match comes back as
//! `None`, never as an error, and the engine moves on to the next rule.

use crate::pipeline::inline::format_inline;
use crate::pipeline::markup::{self, ListKind};
use once_cell::sync::Lazy;
use regex::Regex;

static RE_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").unwrap());
static RE_ORDERED_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\s*)\d+\.\s+(.+)$").unwrap());
static RE_UNORDERED_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\s*)[-*+]\s+(.+)$").unwrap());
static RE_LIST_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(\d+\.|-|\*|\+)\s+").unwrap());

/// A line recognised as a heading, already rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// 1 (chapter) through 6 (subparagraph).
    pub level: usize,
    pub latex: String,
}

/// A line recognised as a list item, already rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub kind: ListKind,
    /// Indent, item token and formatted content.
    pub latex: String,
}

/// Classify `line` as a heading.
///
/// The `#` run must start the line and be followed by whitespace; the title
/// is trimmed and inline-formatted before wrapping.
pub fn classify_heading(line: &str) -> Option<Heading> {
    let caps = RE_HEADING.captures(line)?;
    let level = caps.get(1)?.as_str().len();
    let title = format_inline(caps.get(2)?.as_str().trim());
    Some(Heading {
        level,
        latex: markup::heading(level, &title),
    })
}

/// Classify `line` as a list item. Ordered items are checked first.
///
/// The leading whitespace is kept verbatim in front of the item token.
pub fn classify_list_item(line: &str) -> Option<ListItem> {
    let (kind, caps) = if let Some(caps) = RE_ORDERED_ITEM.captures(line) {
        (ListKind::Ordered, caps)
    } else {
        (ListKind::Unordered, RE_UNORDERED_ITEM.captures(line)?)
    };
    let indent = caps.get(1)?.as_str();
    let content = format_inline(caps.get(2)?.as_str());
    Some(ListItem {
        kind,
        latex: markup::item(indent, &content),
    })
}

/// True when `line` opens with a list marker, even one with no item text
/// after it (`- `). Such a line does not end an open list.
pub fn has_list_marker(line: &str) -> bool {
    RE_LIST_MARKER.is_match(line)
}

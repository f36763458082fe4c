//! Block-level translation.

use crate::markdown::inline::parse_inline;
use crate::model::block::{Block, HeadingLevel};
use once_cell::sync::Lazy;
use regex::Regex;

static DIVIDER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-{3,}$").expect("valid divider regex"));

const ESCAPED_LINE_BREAK: &str = "\\n";

/// Translates a text body into an ordered list of blocks.
///
/// Literal `\n` escapes are normalized to real line breaks first. Blank
/// lines become empty paragraphs, except trailing empty lines at the very
/// end of the body, which are dropped.
pub fn translate(text: &str) -> Vec<Block> {
    let normalized = text.replace(ESCAPED_LINE_BREAK, "\n");
    let mut lines: Vec<&str> = normalized
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }

    lines.into_iter().map(translate_line).collect()
}

/// Translates a single line.
///
/// Heading and divider markers are matched on the trimmed line; paragraphs
/// keep the line's original spacing.
pub fn translate_line(line: &str) -> Block {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Block::empty_paragraph();
    }

    if let Some(rest) = trimmed.strip_prefix("# ") {
        return Block::heading(HeadingLevel::One, parse_inline(rest));
    }
    if let Some(rest) = trimmed.strip_prefix("## ") {
        return Block::heading(HeadingLevel::Two, parse_inline(rest));
    }
    if let Some(rest) = trimmed.strip_prefix("### ") {
        return Block::heading(HeadingLevel::Three, parse_inline(rest));
    }
    if DIVIDER_RE.is_match(trimmed) {
        return Block::Divider;
    }

    Block::paragraph(parse_inline(line))
}

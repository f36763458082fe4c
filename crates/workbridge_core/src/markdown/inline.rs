//! Inline bold-span parsing.

use crate::model::block::TextRun;

pub const BOLD_DELIMITER: &str = "**";

/// Splits one line into plain and bold runs.
///
/// Segments between `**` delimiters alternate plain/bold starting plain.
/// Empty segments only flip the state. Delimiter balance is not checked: an
/// odd number of `**` leaves the tail of the line in the last toggled state.
pub fn parse_inline(text: &str) -> Vec<TextRun> {
    if !text.contains(BOLD_DELIMITER) {
        if text.is_empty() {
            return Vec::new();
        }
        return vec![TextRun::plain(text)];
    }

    let mut runs = Vec::new();
    let mut bold = false;
    for segment in text.split(BOLD_DELIMITER) {
        if !segment.is_empty() {
            runs.push(TextRun {
                text: segment.to_string(),
                bold,
            });
        }
        bold = !bold;
    }
    runs
}

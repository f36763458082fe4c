//! Line-granular markdown to block translation.
//!
//! # Responsibility
//! - Turn a flat meeting body into typed blocks for the document service.
//!
//! # Invariants
//! - One input line produces exactly one block.
//! - Only headings (`#`, `##`, `###`), dividers and `**bold**` spans are
//!   recognized; everything else is plain paragraph text.

mod inline;
mod translator;

pub use inline::{parse_inline, BOLD_DELIMITER};
pub use translator::{translate, translate_line};

//! Typed content blocks produced by the markdown translator.
//!
//! Blocks are ephemeral: they are built right before an export and never
//! persisted.

/// A span of text, either plain or bold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }
}

/// Heading depth supported by the document service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    One,
    Two,
    Three,
}

impl HeadingLevel {
    pub fn depth(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading {
        level: HeadingLevel,
        runs: Vec<TextRun>,
    },
    Divider,
    /// Empty `runs` renders as a blank line.
    Paragraph { runs: Vec<TextRun> },
}

impl Block {
    pub fn heading(level: HeadingLevel, runs: Vec<TextRun>) -> Self {
        Self::Heading { level, runs }
    }

    pub fn paragraph(runs: Vec<TextRun>) -> Self {
        Self::Paragraph { runs }
    }

    pub fn empty_paragraph() -> Self {
        Self::Paragraph { runs: Vec::new() }
    }

    pub fn is_empty_paragraph(&self) -> bool {
        matches!(self, Self::Paragraph { runs } if runs.is_empty())
    }
}

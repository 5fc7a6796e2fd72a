//! Fenced Block Regions
//!
//! Plain value types describing where a fenced block sits in a document,
//! plus the text extraction used by the overlay actions.

use std::ops::Range;

/// A fenced code block located in a document
///
/// The span is half-open and covers both fence lines, backticks included.
/// Offsets are UTF-8 byte offsets into the text the block was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FencedBlock {
    /// Offset of the first character of the opening fence line
    pub start: usize,
    /// Offset just past the last backtick of the closing fence
    pub end: usize,
}

impl FencedBlock {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Slice this block out of `document`
    ///
    /// Returns `None` when the span no longer fits the text, which happens
    /// when the document changed without the block being recomputed.
    pub fn text<'a>(&self, document: &'a str) -> Option<&'a str> {
        document.get(self.range())
    }
}

/// Extract the code between the fence lines
///
/// Drops the first and last line of the region and terminates the result
/// with a single newline.
pub fn inner_code(region_text: &str) -> String {
    let lines: Vec<&str> = region_text.split('\n').collect();
    let body = lines
        .get(1..lines.len().saturating_sub(1))
        .unwrap_or_default();

    let mut code = body.join("\n");
    code.push('\n');
    code
}

/// Extract the lowercase language tag from the opening fence line
///
/// An empty string means the fence carried no tag.
pub fn language_identifier(region_text: &str) -> String {
    let first_line = region_text.split('\n').next().unwrap_or_default();

    let after_spaces = first_line.trim_start_matches(' ');
    let tag = if after_spaces.starts_with('`') {
        after_spaces.trim_start_matches('`')
    } else {
        first_line
    };

    tag.trim().to_lowercase()
}

use tower_lsp::lsp_types::Position;

use crate::overlay::{OverlayHandle, OverlayManager};

/// State for each open markdown document
#[derive(Debug)]
pub struct DocumentState {
    pub content: String,
    pub overlays: OverlayManager,
    lines: LineIndex,
}

impl DocumentState {
    /// State for a freshly opened document
    pub fn load(content: String) -> Self {
        let mut overlays = OverlayManager::new();
        overlays.on_loaded(&content);
        let lines = LineIndex::new(&content);
        Self {
            content,
            overlays,
            lines,
        }
    }

    /// Store new content; returns whether the overlays were recomputed
    pub fn modify(&mut self, content: String) -> bool {
        self.lines = LineIndex::new(&content);
        self.content = content;
        self.overlays.on_modified(&self.content)
    }

    /// Current text of the block behind `handle`
    pub fn region_text(&self, handle: OverlayHandle) -> Option<&str> {
        let overlay = self.overlays.get(handle)?;
        overlay.block.text(&self.content)
    }

    pub fn position_at(&self, offset: usize) -> Position {
        self.lines.position(&self.content, offset)
    }
}

/// Byte offsets of every line start, built once per content version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { line_starts }
    }

    /// Convert a byte offset in `text` to an LSP position (UTF-16 columns)
    ///
    /// `text` must be the content the index was built from. Offsets past the
    /// end clamp to the end; offsets inside a character round down to its
    /// start.
    pub fn position(&self, text: &str, offset: usize) -> Position {
        let mut offset = offset.min(text.len());
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }

        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let line_start = self.line_starts[line];
        let character: usize = text[line_start..offset].chars().map(char::len_utf16).sum();

        Position::new(line as u32, character as u32)
    }
}

/// Whether overlays apply to documents of this language
pub fn is_applicable(language_id: &str) -> bool {
    language_id.to_lowercase().contains("markdown")
}

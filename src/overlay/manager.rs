//! Overlay Manager
//!
//! Owns the overlay set of one document. Every recomputation derives the
//! whole set from scratch and swaps it in; nothing is diffed.

use serde::{Deserialize, Serialize};

use super::Overlay;
use crate::fence::find_fenced_blocks;

/// Documents larger than this are not rescanned on modification
pub const MAX_DOCUMENT_SIZE: usize = 1 << 20;

/// Opaque reference to one overlay of one overlay set
///
/// Handles from a set that has since been replaced no longer resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OverlayHandle {
    generation: u64,
    index: usize,
}

/// Current overlays of a document
#[derive(Debug, Default)]
pub struct OverlayManager {
    overlays: Vec<Overlay>,
    generation: u64,
}

impl OverlayManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document finished loading: always recompute
    pub fn on_loaded(&mut self, text: &str) {
        self.recompute(text);
    }

    /// Document was modified: recompute unless it is too large
    ///
    /// Returns whether the overlay set was replaced.
    pub fn on_modified(&mut self, text: &str) -> bool {
        if text.len() > MAX_DOCUMENT_SIZE {
            log::debug!(
                "skipping overlay recomputation for {} byte document",
                text.len()
            );
            return false;
        }

        self.recompute(text);
        true
    }

    /// Replace the overlay set with one overlay per fenced block in `text`
    pub fn recompute(&mut self, text: &str) {
        let overlays = find_fenced_blocks(text)
            .into_iter()
            .map(Overlay::for_block)
            .collect();

        self.overlays = overlays;
        self.generation += 1;
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    /// Overlays paired with the handles that address them
    pub fn iter(&self) -> impl Iterator<Item = (OverlayHandle, &Overlay)> {
        let generation = self.generation;
        self.overlays
            .iter()
            .enumerate()
            .map(move |(index, overlay)| (OverlayHandle { generation, index }, overlay))
    }

    /// Look up an overlay of the current set
    pub fn get(&self, handle: OverlayHandle) -> Option<&Overlay> {
        if handle.generation != self.generation {
            return None;
        }
        self.overlays.get(handle.index)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

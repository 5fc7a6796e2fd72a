//! Block Overlays
//!
//! One overlay per fenced block, anchored on the line above the opening
//! fence and offering the block actions.

pub mod manager;

pub use manager::{OverlayHandle, OverlayManager, MAX_DOCUMENT_SIZE};

use crate::action::Action;
use crate::fence::FencedBlock;

/// Static body rendered for every overlay by hosts that display HTML
const MARKUP_TEMPLATE: &str = r#"<body id="codefence-overlay">
    <style>
        div {
            padding: 0.2rem 0;
            margin-bottom: 3px;
        }
        a {
            padding: 0.4rem;
            border-radius: 5px;
            color: #000;
            background-color: #CCCCCC;
            text-decoration: none;
        }
    </style>
    <div>
{links}
    </div>
</body>"#;

/// A decoration attached to one fenced block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    /// Offset the decoration is attached to
    pub anchor: usize,
    /// Snapshot of the block span at recomputation time
    pub block: FencedBlock,
    /// Actions offered, in display order
    pub actions: [Action; 2],
}

impl Overlay {
    /// Build the overlay for `block`
    ///
    /// The anchor sits one position before the opening fence so the overlay
    /// renders on the preceding line.
    pub fn for_block(block: FencedBlock) -> Self {
        Self {
            anchor: block.start.saturating_sub(1),
            block,
            actions: [Action::Copy, Action::NewTab],
        }
    }

    /// HTML body with one link per action, `href` set to the action name
    ///
    /// For hosts that render overlays as HTML phantoms and route link clicks
    /// through `handle_named_action`. The LSP host shows code lenses instead
    /// and does not call this.
    pub fn markup(&self) -> String {
        let links: Vec<String> = self
            .actions
            .iter()
            .map(|action| format!("        <a href=\"{}\">{}</a>", action.name(), action.label()))
            .collect();

        MARKUP_TEMPLATE.replace("{links}", &links.join("\n"))
    }
}

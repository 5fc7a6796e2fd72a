//! Overlay Actions
//!
//! What happens when one of an overlay's links is clicked.

pub mod handler;
pub mod host;

pub use handler::{handle_action, handle_named_action};
pub use host::{Host, ViewId};

use std::fmt;
use std::str::FromStr;

/// An action offered by every overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Put the block's code on the clipboard
    Copy,
    /// Open the block's code in a new view
    NewTab,
}

impl Action {
    pub const ALL: [Action; 2] = [Action::Copy, Action::NewTab];

    /// Identifier used in links and command names
    pub fn name(&self) -> &'static str {
        match self {
            Action::Copy => "copy",
            Action::NewTab => "new_tab",
        }
    }

    /// Text shown to the user
    pub fn label(&self) -> &'static str {
        match self {
            Action::Copy => "copy",
            Action::NewTab => "open in tab",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.name() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown overlay action '{}'", s))
    }
}

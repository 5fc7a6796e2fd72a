//! Code Fence Language Server
//!
//! Adds "copy" and "open in tab" actions to every fenced code block of a
//! markdown document.
//!
//! This library provides:
//! - Fenced block detection
//! - Per-document overlay management
//! - Overlay actions behind a host editor trait
//! - Language tag to grammar resolution
//! - An LSP host exposing overlays as code lenses

pub mod action;
pub mod config;
pub mod fence;
pub mod grammar;
pub mod lsp;
pub mod overlay;

// Re-exports for clean public API
pub use action::{handle_action, Action, Host, ViewId};
pub use config::Config;
pub use fence::{find_fenced_blocks, FencedBlock};
pub use grammar::{resolve, GrammarCatalog, GrammarTable};
pub use overlay::{Overlay, OverlayHandle, OverlayManager, MAX_DOCUMENT_SIZE};

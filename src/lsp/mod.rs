//! LSP Protocol Implementation
//!
//! Publishes block overlays as code lenses and runs their actions through
//! `workspace/executeCommand`.

pub mod backend;
pub mod document;
pub mod handlers;
pub mod host;
pub mod server;

pub use backend::Backend;
pub use host::{ActionReport, LspHost, ViewReport};

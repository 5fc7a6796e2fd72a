//! Fenced Code Blocks
//!
//! Locating backtick-fenced blocks in a document and pulling their code and
//! language tag back out.

pub mod block;
pub mod finder;

pub use block::{inner_code, language_identifier, FencedBlock};
pub use finder::find_fenced_blocks;

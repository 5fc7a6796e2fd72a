//! Fence Finder
//!
//! Single pass over the document text locating backtick-fenced blocks.
//!
//! An opening fence is a line made of optional spaces, three or more
//! backticks and an optional `[\w-]*` language tag. The block closes at the
//! first later line consisting of exactly the same spaces-and-backticks
//! prefix. The `regex` crate has no backreferences, so the opener is matched
//! with a regex and the closer with a plain string search.

use std::sync::LazyLock;

use regex::Regex;

use super::block::FencedBlock;

static FENCE_OPENER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^( *`{3,})[\w\-]*\n").expect("fence opener pattern is valid")
});

/// Find all fenced code blocks in `text`, in document order
///
/// Blocks never overlap: scanning resumes after the closing fence of the
/// previous block. Openers without a matching closer are skipped.
pub fn find_fenced_blocks(text: &str) -> Vec<FencedBlock> {
    let mut blocks = Vec::new();
    let mut pos = 0;

    while pos <= text.len() {
        let Some(captures) = FENCE_OPENER.captures_at(text, pos) else {
            break;
        };
        let (Some(opener), Some(prefix)) = (captures.get(0), captures.get(1)) else {
            break;
        };

        match find_closer(text, opener.end(), prefix.as_str()) {
            Some(end) => {
                blocks.push(FencedBlock::new(opener.start(), end));
                pos = end;
            }
            None => {
                // Openers start with an ASCII space or backtick
                pos = opener.start() + 1;
            }
        }
    }

    log::trace!("found {} fenced blocks", blocks.len());
    blocks
}

/// Locate the end of the closing fence for a block whose body starts at
/// `body_start`
///
/// The closer is a newline followed by `prefix`, followed by another newline
/// or the end of the text. The earliest such position wins.
fn find_closer(text: &str, body_start: usize, prefix: &str) -> Option<usize> {
    let needle = format!("\n{prefix}");
    let mut from = body_start;

    while let Some(found) = text.get(from..)?.find(&needle) {
        let candidate = from + found;
        let close_end = candidate + needle.len();

        match text.as_bytes().get(close_end) {
            None | Some(b'\n') => return Some(close_end),
            Some(_) => from = candidate + 1,
        }
    }

    None
}

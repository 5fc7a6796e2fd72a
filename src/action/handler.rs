//! Action Handler
//!
//! Runs a clicked overlay action against the host.

use super::{Action, Host};
use crate::fence::{inner_code, language_identifier};
use crate::grammar::GrammarTable;

pub const COPIED_MESSAGE: &str = "Code copied to clipboard";

/// Run an action given by name
///
/// Unknown names are ignored.
pub fn handle_named_action<H: Host>(
    name: &str,
    region_text: &str,
    host: &mut H,
    grammars: &GrammarTable,
) {
    match name.parse::<Action>() {
        Ok(action) => handle_action(action, region_text, host, grammars),
        Err(e) => log::debug!("{}", e),
    }
}

/// Run `action` for the block whose full text (fences included) is
/// `region_text`
pub fn handle_action<H: Host>(
    action: Action,
    region_text: &str,
    host: &mut H,
    grammars: &GrammarTable,
) {
    let code = inner_code(region_text);

    match action {
        Action::Copy => {
            host.set_clipboard(&code);
            host.status_message(COPIED_MESSAGE);
        }
        Action::NewTab => {
            let view = host.new_view();
            host.append(view, &code);

            let identifier = language_identifier(region_text);
            if identifier.is_empty() {
                return;
            }

            let available = host.grammar_resources();
            match grammars.resolve(&identifier, &available) {
                Some(grammar) => {
                    log::debug!("assigning {} for '{}'", grammar, identifier);
                    host.assign_grammar(view, &grammar);
                }
                None => log::debug!("no grammar found for '{}'", identifier),
            }
        }
    }
}

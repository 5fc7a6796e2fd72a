//! Host Editor Interface
//!
//! The editor capabilities the overlay actions rely on. Every call is
//! synchronous and assumed to succeed.

/// Identifies a view created through [`Host::new_view`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(pub usize);

/// Editor operations needed by the action handler
pub trait Host {
    /// Replace the system clipboard contents
    fn set_clipboard(&mut self, text: &str);

    /// Show a transient status message
    fn status_message(&mut self, message: &str);

    /// Create an empty view in the current window
    fn new_view(&mut self) -> ViewId;

    /// Append text at the end of a view
    fn append(&mut self, view: ViewId, text: &str);

    /// Assign a grammar resource to a view
    fn assign_grammar(&mut self, view: ViewId, grammar: &str);

    /// All grammar resources currently available, in host order
    fn grammar_resources(&self) -> Vec<String>;
}

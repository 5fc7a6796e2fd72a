//! Host implementation for language server clients
//!
//! The clipboard is written directly on the machine running the server.
//! Everything else is collected during the action and handed back to the
//! client: status messages go out as `window/showMessage`, new views are
//! returned in the command result for the client to open.

use serde::{Deserialize, Serialize};

use crate::action::{Host, ViewId};

/// A view the client should open
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewReport {
    pub content: String,
    pub grammar: Option<String>,
}

/// Result of `workspace/executeCommand`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionReport {
    pub views: Vec<ViewReport>,
}

/// Collects the effects of one action
#[derive(Debug, Default)]
pub struct LspHost {
    resources: Vec<String>,
    statuses: Vec<String>,
    views: Vec<ViewReport>,
}

impl LspHost {
    /// Host seeing the given grammar resources
    pub fn new(resources: Vec<String>) -> Self {
        Self {
            resources,
            ..Default::default()
        }
    }

    /// Status messages raised so far
    pub fn statuses(&self) -> &[String] {
        &self.statuses
    }

    pub fn into_report(self) -> ActionReport {
        ActionReport { views: self.views }
    }
}

impl Host for LspHost {
    fn set_clipboard(&mut self, text: &str) {
        if let Ok(mut clipboard) = arboard::Clipboard::new() {
            let _ = clipboard.set_text(text);
        }
    }

    fn status_message(&mut self, message: &str) {
        self.statuses.push(message.to_string());
    }

    fn new_view(&mut self) -> ViewId {
        self.views.push(ViewReport {
            content: String::new(),
            grammar: None,
        });
        ViewId(self.views.len() - 1)
    }

    fn append(&mut self, view: ViewId, text: &str) {
        if let Some(report) = self.views.get_mut(view.0) {
            report.content.push_str(text);
        }
    }

    fn assign_grammar(&mut self, view: ViewId, grammar: &str) {
        if let Some(report) = self.views.get_mut(view.0) {
            report.grammar = Some(grammar.to_string());
        }
    }

    fn grammar_resources(&self) -> Vec<String> {
        self.resources.clone()
    }
}

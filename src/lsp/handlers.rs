use serde_json::Value;
use tower_lsp::jsonrpc::Result as LspResult;
use tower_lsp::lsp_types::*;

use crate::action::{handle_action, Action};
use crate::lsp::backend::Backend;
use crate::lsp::document::{is_applicable, DocumentState};
use crate::lsp::host::LspHost;
use crate::overlay::OverlayHandle;

/// Prefix of every command the server executes
pub const COMMAND_PREFIX: &str = "codefence.";

/// Command name for an overlay action, e.g. `codefence.new_tab`
pub fn command_name(action: Action) -> String {
    format!("{}{}", COMMAND_PREFIX, action.name())
}

/// Action behind a command name
pub fn action_for_command(command: &str) -> Option<Action> {
    command.strip_prefix(COMMAND_PREFIX)?.parse().ok()
}

/// Arguments attached to every overlay command: `[uri, handle]`
#[derive(Debug, Clone, PartialEq)]
pub struct CommandArgs {
    pub uri: Url,
    pub handle: OverlayHandle,
}

impl CommandArgs {
    pub fn to_arguments(&self) -> Vec<Value> {
        vec![
            Value::String(self.uri.to_string()),
            serde_json::to_value(self.handle).unwrap_or(Value::Null),
        ]
    }

    pub fn from_arguments(arguments: &[Value]) -> anyhow::Result<Self> {
        let [uri, handle] = arguments else {
            anyhow::bail!("expected [uri, handle], got {} arguments", arguments.len());
        };

        Ok(Self {
            uri: serde_json::from_value(uri.clone())?,
            handle: serde_json::from_value(handle.clone())?,
        })
    }
}

/// Trait for tracking document lifecycle
#[tower_lsp::async_trait]
pub trait HandleDocumentSync {
    async fn handle_did_open(&self, params: DidOpenTextDocumentParams);
    async fn handle_did_change(&self, params: DidChangeTextDocumentParams);
    async fn handle_did_close(&self, params: DidCloseTextDocumentParams);
}

/// Trait for handling code lens requests
#[tower_lsp::async_trait]
pub trait HandleCodeLens {
    async fn handle_code_lens(&self, params: CodeLensParams) -> LspResult<Option<Vec<CodeLens>>>;
}

/// Trait for handling executed overlay commands
#[tower_lsp::async_trait]
pub trait HandleExecuteCommand {
    async fn handle_execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> LspResult<Option<Value>>;
}

#[tower_lsp::async_trait]
impl HandleDocumentSync for Backend {
    async fn handle_did_open(&self, params: DidOpenTextDocumentParams) {
        let document = params.text_document;
        if !is_applicable(&document.language_id) {
            log::debug!(
                "ignoring {} ({})",
                document.uri,
                document.language_id
            );
            return;
        }

        let doc_state = DocumentState::load(document.text);
        log::debug!(
            "{} opened with {} code blocks",
            document.uri,
            doc_state.overlays.overlays().len()
        );

        let mut docs = self.documents.lock().await;
        docs.insert(document.uri, doc_state);
        drop(docs);

        self.refresh_code_lenses();
    }

    async fn handle_did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let Some(change) = params.content_changes.into_iter().last() else {
            return;
        };

        let mut docs = self.documents.lock().await;
        let recomputed = match docs.get_mut(&uri) {
            Some(doc_state) => doc_state.modify(change.text),
            None => return,
        };
        drop(docs);

        if recomputed {
            self.refresh_code_lenses();
        }
    }

    async fn handle_did_close(&self, params: DidCloseTextDocumentParams) {
        let mut docs = self.documents.lock().await;
        docs.remove(&params.text_document.uri);
    }
}

#[tower_lsp::async_trait]
impl HandleCodeLens for Backend {
    async fn handle_code_lens(&self, params: CodeLensParams) -> LspResult<Option<Vec<CodeLens>>> {
        let uri = params.text_document.uri;

        let docs = self.documents.lock().await;
        let doc_state = match docs.get(&uri) {
            Some(state) => state,
            None => return Ok(None),
        };

        let mut lenses = Vec::new();
        for (handle, overlay) in doc_state.overlays.iter() {
            let range = Range::new(
                doc_state.position_at(overlay.anchor),
                doc_state.position_at(overlay.block.start),
            );
            let arguments = CommandArgs {
                uri: uri.clone(),
                handle,
            }
            .to_arguments();

            for action in overlay.actions {
                lenses.push(CodeLens {
                    range,
                    command: Some(Command {
                        title: action.label().to_string(),
                        command: command_name(action),
                        arguments: Some(arguments.clone()),
                    }),
                    data: None,
                });
            }
        }

        Ok(Some(lenses))
    }
}

#[tower_lsp::async_trait]
impl HandleExecuteCommand for Backend {
    async fn handle_execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> LspResult<Option<Value>> {
        let Some(action) = action_for_command(&params.command) else {
            log::debug!("unknown command {}", params.command);
            return Ok(None);
        };

        let args = match CommandArgs::from_arguments(&params.arguments) {
            Ok(args) => args,
            Err(e) => {
                log::debug!("bad arguments for {}: {}", params.command, e);
                return Ok(None);
            }
        };

        let region_text = {
            let docs = self.documents.lock().await;
            let region = docs
                .get(&args.uri)
                .and_then(|state| state.region_text(args.handle));
            match region {
                Some(text) => text.to_string(),
                None => {
                    log::debug!("stale overlay for {}", args.uri);
                    return Ok(None);
                }
            }
        };

        let resources = self.grammar_resources.read().await.clone();
        let mut host = LspHost::new(resources);
        handle_action(action, &region_text, &mut host, &self.grammar_table);

        for status in host.statuses() {
            self.client
                .show_message(MessageType::INFO, status.clone())
                .await;
        }

        let report = serde_json::to_value(host.into_report())
            .map_err(|_| tower_lsp::jsonrpc::Error::internal_error())?;
        Ok(Some(report))
    }
}

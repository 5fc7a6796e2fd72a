use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use crate::action::Action;
use crate::grammar::{GrammarCatalog, GrammarTable};
use crate::lsp::document::DocumentState;
use crate::lsp::handlers::{
    command_name, HandleCodeLens, HandleDocumentSync, HandleExecuteCommand,
};

/// The main LSP backend that holds state and implements the Language Server Protocol
pub struct Backend {
    pub client: Client,
    pub documents: Arc<Mutex<HashMap<Url, DocumentState>>>,
    pub grammar_table: GrammarTable,
    pub grammar_resources: Arc<RwLock<Vec<String>>>,
    pub catalog: Arc<Mutex<GrammarCatalog>>,
    code_lens_refresh: AtomicBool,
}

impl Backend {
    pub fn new(
        client: Client,
        grammar_table: GrammarTable,
        catalog: GrammarCatalog,
    ) -> Self {
        Self {
            client,
            documents: Arc::new(Mutex::new(HashMap::new())),
            grammar_table,
            grammar_resources: catalog.shared(),
            catalog: Arc::new(Mutex::new(catalog)),
            code_lens_refresh: AtomicBool::new(false),
        }
    }

    /// Ask the client to re-request code lenses, if it supports that
    pub fn refresh_code_lenses(&self) {
        if !self.code_lens_refresh.load(Ordering::Relaxed) {
            return;
        }

        let client = self.client.clone();
        tokio::spawn(async move {
            if let Err(e) = client.code_lens_refresh().await {
                log::debug!("code lens refresh failed: {}", e);
            }
        });
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(
        &self,
        params: InitializeParams,
    ) -> tower_lsp::jsonrpc::Result<InitializeResult> {
        let refresh_support = params
            .capabilities
            .workspace
            .as_ref()
            .and_then(|workspace| workspace.code_lens.as_ref())
            .and_then(|code_lens| code_lens.refresh_support)
            .unwrap_or(false);
        self.code_lens_refresh
            .store(refresh_support, Ordering::Relaxed);

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                code_lens_provider: Some(CodeLensOptions {
                    resolve_provider: Some(false),
                }),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: Action::ALL.into_iter().map(command_name).collect(),
                    work_done_progress_options: Default::default(),
                }),
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "codefence-ls".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        let mut catalog = self.catalog.lock().await;
        let roots: Vec<String> = catalog
            .roots()
            .iter()
            .map(|root| root.display().to_string())
            .collect();
        self.client
            .log_message(
                MessageType::INFO,
                format!(
                    "codefence-language-server initialized, grammar roots: [{}]",
                    roots.join(", ")
                ),
            )
            .await;

        if let Err(e) = catalog.initialize(Some(self.client.clone())).await {
            log::warn!("Failed to initialize grammar catalog: {:#}", e);
            self.client
                .log_message(
                    MessageType::ERROR,
                    format!("Failed to initialize grammar catalog: {}", e),
                )
                .await;
        }
    }

    async fn shutdown(&self) -> tower_lsp::jsonrpc::Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        self.handle_did_open(params).await
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        self.handle_did_change(params).await
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.handle_did_close(params).await
    }

    async fn code_lens(
        &self,
        params: CodeLensParams,
    ) -> tower_lsp::jsonrpc::Result<Option<Vec<CodeLens>>> {
        self.handle_code_lens(params).await
    }

    async fn execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> tower_lsp::jsonrpc::Result<Option<Value>> {
        self.handle_execute_command(params).await
    }
}

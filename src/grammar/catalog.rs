//! Grammar Catalog
//!
//! Discovers the grammar resources installed on disk and keeps the list
//! current while the server runs.
//!
//! Each root is laid out like a Sublime Text `Packages` directory. A file
//! `<root>/Python/Python.sublime-syntax` becomes the resource id
//! `Packages/Python/Python.sublime-syntax`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{mpsc, RwLock};
use tower_lsp::lsp_types::MessageType;
use tower_lsp::Client;

use crate::config;

const TM_LANGUAGE_EXTENSION: &str = "tmLanguage";
const SUBLIME_SYNTAX_EXTENSION: &str = "sublime-syntax";

/// Events from the file watcher
#[derive(Debug)]
enum WatcherEvent {
    GrammarFileChanged(PathBuf),
    WatcherError(notify::Error),
}

/// Shared, live list of available grammar resources
pub struct GrammarCatalog {
    /// Resource ids, `.tmLanguage` first then `.sublime-syntax`
    resources: Arc<RwLock<Vec<String>>>,
    /// Directories scanned for grammars
    roots: Vec<PathBuf>,
    /// File watcher
    _watcher: Option<RecommendedWatcher>,
    /// Channel to receive watcher events
    watcher_rx: Option<mpsc::UnboundedReceiver<WatcherEvent>>,
    /// LSP client for logging
    client: Option<Client>,
}

impl GrammarCatalog {
    pub fn new(config: &config::Config) -> Self {
        Self::with_roots(config.grammar_roots.clone())
    }

    pub fn with_roots(roots: Vec<PathBuf>) -> Self {
        Self {
            resources: Arc::new(RwLock::new(Vec::new())),
            roots,
            _watcher: None,
            watcher_rx: None,
            client: None,
        }
    }

    /// Scan all roots and start watching them
    pub async fn initialize(&mut self, client: Option<Client>) -> Result<()> {
        self.client = client;

        let count = self.reload().await;
        if let Some(client) = &self.client {
            client
                .log_message(
                    MessageType::INFO,
                    format!("Found {} grammar resources", count),
                )
                .await;
        }

        self.start_watching()?;

        Ok(())
    }

    /// Rescan every root, returning the number of resources found
    pub async fn reload(&self) -> usize {
        Self::reload_shared(&self.resources, &self.roots).await
    }

    async fn reload_shared(resources: &RwLock<Vec<String>>, roots: &[PathBuf]) -> usize {
        let scanned = scan_roots(roots).await;
        let count = scanned.len();
        *resources.write().await = scanned;
        log::debug!("grammar catalog holds {} resources", count);
        count
    }

    /// Snapshot of the current resource list
    pub async fn resources(&self) -> Vec<String> {
        self.resources.read().await.clone()
    }

    /// Handle to the live resource list
    pub fn shared(&self) -> Arc<RwLock<Vec<String>>> {
        self.resources.clone()
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Start file watching for grammar roots
    fn start_watching(&mut self) -> Result<()> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.watcher_rx = Some(rx);

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| match res {
                Ok(event) => {
                    if let EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) =
                        event.kind
                    {
                        for path in event.paths {
                            if is_grammar_file(&path) {
                                let _ = tx.send(WatcherEvent::GrammarFileChanged(path));
                            }
                        }
                    }
                }
                Err(e) => {
                    let _ = tx.send(WatcherEvent::WatcherError(e));
                }
            },
            Config::default().with_poll_interval(Duration::from_secs(1)),
        )
        .context("Failed to create grammar watcher")?;

        for root in &self.roots {
            if root.is_dir() {
                watcher
                    .watch(root, RecursiveMode::Recursive)
                    .with_context(|| format!("Failed to watch {}", root.display()))?;
            }
        }

        self._watcher = Some(watcher);
        self.start_watcher_task();

        Ok(())
    }

    /// Process watcher events in the background, rescanning on each change
    fn start_watcher_task(&mut self) {
        let Some(mut rx) = self.watcher_rx.take() else {
            return;
        };
        let resources = self.resources.clone();
        let roots = self.roots.clone();
        let client = self.client.clone();

        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                match event {
                    WatcherEvent::GrammarFileChanged(path) => {
                        log::info!("Grammar file changed: {}", path.display());
                        let count = Self::reload_shared(&resources, &roots).await;
                        if let Some(client) = &client {
                            client
                                .log_message(
                                    MessageType::INFO,
                                    format!("Grammar catalog reloaded ({} resources)", count),
                                )
                                .await;
                        }
                    }
                    WatcherEvent::WatcherError(e) => {
                        log::warn!("Grammar watcher error: {}", e);
                        if let Some(client) = &client {
                            client
                                .log_message(
                                    MessageType::ERROR,
                                    format!("Grammar watcher error: {}", e),
                                )
                                .await;
                        }
                    }
                }
            }
        });
    }
}

/// Whether `path` names a grammar file
pub fn is_grammar_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some(TM_LANGUAGE_EXTENSION | SUBLIME_SYNTAX_EXTENSION)
    )
}

/// Scan `roots` and return resource ids in catalog order
///
/// Roots that are missing or unreadable are skipped.
pub async fn scan_roots(roots: &[PathBuf]) -> Vec<String> {
    let mut tm_languages = Vec::new();
    let mut sublime_syntaxes = Vec::new();

    for root in roots {
        if !root.is_dir() {
            continue;
        }

        match scan_root(root).await {
            Ok(found) => {
                for (path, id) in found {
                    if path.extension().and_then(|s| s.to_str()) == Some(TM_LANGUAGE_EXTENSION) {
                        tm_languages.push(id);
                    } else {
                        sublime_syntaxes.push(id);
                    }
                }
            }
            Err(e) => log::warn!("{:#}", e),
        }
    }

    tm_languages.sort();
    tm_languages.dedup();
    sublime_syntaxes.sort();
    sublime_syntaxes.dedup();

    tm_languages.extend(sublime_syntaxes);
    tm_languages
}

/// Walk one root, returning each grammar file with its resource id
async fn scan_root(root: &Path) -> Result<Vec<(PathBuf, String)>> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .with_context(|| format!("Failed to read grammar directory: {}", dir.display()))?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let file_type = entry.file_type().await?;

            if file_type.is_dir() {
                pending.push(path);
            } else if is_grammar_file(&path) {
                if let Some(id) = resource_id(root, &path) {
                    found.push((path, id));
                }
            }
        }
    }

    Ok(found)
}

/// `Packages/<path relative to root>` with `/` separators
fn resource_id(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    Some(format!("Packages/{}", parts.join("/")))
}

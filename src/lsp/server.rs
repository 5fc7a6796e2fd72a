use std::thread;
use std::time::Duration;

use anyhow::Result;
use tokio::io::{stdin, stdout};
use tower_lsp::{LspService, Server};

use crate::grammar::{load_grammar_table, GrammarCatalog};
use crate::lsp::backend::Backend;
use crate::Config;

/// Start the LSP server
pub async fn serve() -> Result<()> {
    let config = Config::from_args_and_env()?;

    // stdout carries the protocol, so logs go to stderr
    let _ = env_logger::Builder::new()
        .parse_filters(&config.log_level)
        .try_init();

    let grammar_table = load_grammar_table(&config.rule_files).await;
    log::info!(
        "{} grammar rules, roots: {:?}",
        grammar_table.rules().len(),
        config.grammar_roots
    );

    let catalog = GrammarCatalog::new(&config);

    // Under the integration test, exit shortly so the test can read stdout to EOF
    if std::env::var("CODEFENCE_LS_TEST_EXIT").as_deref() == Ok("1") {
        thread::spawn(|| {
            thread::sleep(Duration::from_secs(1));
            std::process::exit(0);
        });
    }

    let (service, socket) =
        LspService::build(move |client| Backend::new(client, grammar_table, catalog)).finish();

    Server::new(stdin(), stdout(), socket).serve(service).await;

    Ok(())
}

// Action Code Language Server Protocol implementation
//
// Provides IDE features:
// - Style, semantic, and reserved-word diagnostics
// - Hover information (catalog descriptions, inferred types)
// - Go to definition, references, highlight, rename
// - Code completion and document/workspace symbols

mod server;

use std::path::PathBuf;
use std::sync::Arc;

use acode_types::CatalogSources;
use tower_lsp::{LspService, Server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // stdout carries the protocol; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let catalog_dir = std::env::var_os("ACODE_CATALOG_DIR")
        .map_or_else(|| PathBuf::from("resource"), PathBuf::from);
    let catalog = Arc::new(acode_types::load_catalog(&CatalogSources::in_dir(
        &catalog_dir,
    )));

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) =
        LspService::new(move |client| server::AcodeLanguageServer::new(client, catalog));
    Server::new(stdin, stdout, socket).serve(service).await;
}

//! Cross-file symbol aggregation.
//!
//! The [`SymbolIndex`] maps a document id to the declarations that
//! document currently contains. Entries are replaced wholesale per
//! scan, never patched, and a document with no declarations has no
//! entry at all. The index is rebuilt from source files at session
//! start by [`scan_workspace`] and kept current afterwards through
//! per-document rescans, debounced by [`Debouncer`] so a burst of edits
//! costs one scan.

mod debounce;
mod index;
mod walk;

pub use debounce::Debouncer;
pub use index::SymbolIndex;
pub use walk::{scan_workspace, RECOGNIZED_EXTENSIONS};

use acode_ir::SymbolRecord;

/// Tokenize a document and collect its declarations.
pub fn scan_source(source: &str) -> Vec<SymbolRecord> {
    let tokens = acode_lexer::tokenize(source);
    acode_scope::document_symbols(source, &tokens)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;

//! Declaration symbols collected per document.

use crate::Span;

/// What a declaration introduces.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SymbolKind {
    Function,
    Variable,
}

/// One declaration found in a document.
///
/// Records are owned by the document that produced them and rebuilt
/// wholesale on each reanalysis — never patched in place.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct SymbolRecord {
    pub name: String,
    pub kind: SymbolKind,
    /// Span of the declaring identifier token.
    pub span: Span,
}

impl SymbolRecord {
    pub fn new(name: impl Into<String>, kind: SymbolKind, span: Span) -> Self {
        SymbolRecord {
            name: name.into(),
            kind,
            span,
        }
    }
}

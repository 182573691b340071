//! Name resolution and reference collection within one document.

use acode_ir::{Span, Token, TokenKind};

use crate::decl::is_declaration;
use crate::scope::enclosing_function;

/// Find the declaration of `name` governing a reference at `offset`.
///
/// The enclosing function scope wins outright: if `offset` lies in a
/// function and that scope declares `name` anywhere, its first
/// declaration is the answer, shadowing any global of the same name.
/// Otherwise the first document-wide declaration is returned. Cross-file
/// fallbacks are the caller's concern; `None` here just means "not
/// declared in this document".
pub fn resolve(source: &str, tokens: &[Token], name: &str, offset: u32) -> Option<Span> {
    if let Some(scope) = enclosing_function(source, tokens, offset) {
        if let Some(span) = first_declaration(source, tokens, name, Some(scope)) {
            return Some(span);
        }
    }
    first_declaration(source, tokens, name, None)
}

/// Every token with text `name` in the scope selected by the same rules
/// as [`resolve`]: the enclosing function if it declares the name, else
/// the whole document. Used for references, highlight, and rename.
pub fn find_references(source: &str, tokens: &[Token], name: &str, offset: u32) -> Vec<Span> {
    let scope = enclosing_function(source, tokens, offset)
        .filter(|s| first_declaration(source, tokens, name, Some(*s)).is_some());
    tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Ident && t.text(source) == name)
        .filter(|t| scope.map_or(true, |s| s.contains(t.span.start)))
        .map(|t| t.span)
        .collect()
}

fn first_declaration(
    source: &str,
    tokens: &[Token],
    name: &str,
    scope: Option<Span>,
) -> Option<Span> {
    tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| t.kind == TokenKind::Ident && t.text(source) == name)
        .filter(|(_, t)| scope.map_or(true, |s| s.contains(t.span.start)))
        .find(|(i, _)| is_declaration(source, tokens, *i))
        .map(|(_, t)| t.span)
}

//! Declaration classification: which identifier occurrences introduce a
//! name rather than reference one.

use acode_ir::{SymbolKind, SymbolRecord, Token, TokenKind};

use crate::prev_significant;
use crate::scope::{enclosing_function, signature_range};

/// Whether the identifier token at `index` is a declaration site.
///
/// Declarations are: `var name`, `var : Type name`, `function name`, the
/// loop variable directly inside `each(` / `eachLine(`, and a parameter
/// name inside a function's own signature. Everything else is a
/// reference.
pub fn is_declaration(source: &str, tokens: &[Token], index: usize) -> bool {
    let Some(tok) = tokens.get(index) else {
        return false;
    };
    if tok.kind != TokenKind::Ident {
        return false;
    }
    let Some(p1) = prev_significant(tokens, index) else {
        return false;
    };
    let prev = &tokens[p1];
    let prev_text = prev.text(source);

    if prev.kind == TokenKind::Keyword && (prev_text == "var" || prev_text == "function") {
        return true;
    }

    // var : Type name
    if prev.kind == TokenKind::Ident {
        if let Some(p2) = prev_significant(tokens, p1) {
            if tokens[p2].kind == TokenKind::Punct && tokens[p2].text(source) == ":" {
                if let Some(p3) = prev_significant(tokens, p2) {
                    if tokens[p3].kind == TokenKind::Keyword && tokens[p3].text(source) == "var" {
                        return true;
                    }
                }
            }
        }
    }

    // each(x){...} / eachLine(line){...} — the sole argument is the loop
    // variable being introduced.
    if prev.kind == TokenKind::Punct && prev_text == "(" {
        if let Some(p2) = prev_significant(tokens, p1) {
            let callee = tokens[p2].text(source);
            if tokens[p2].kind == TokenKind::Ident && (callee == "each" || callee == "eachLine") {
                return true;
            }
        }
    }

    in_enclosing_signature(source, tokens, index)
}

/// Whether token `index` sits inside the parameter list of the nearest
/// enclosing function's signature.
fn in_enclosing_signature(source: &str, tokens: &[Token], index: usize) -> bool {
    let offset = tokens[index].span.start;
    let Some(scope) = enclosing_function(source, tokens, offset) else {
        return false;
    };
    for (i, tok) in tokens.iter().enumerate() {
        if tok.kind == TokenKind::Keyword
            && tok.text(source) == "function"
            && tok.span.start == scope.start
        {
            return signature_range(source, tokens, i)
                .map_or(false, |params| params.contains(offset));
        }
    }
    false
}

/// Every declaration in the document, in source order.
pub fn document_symbols(source: &str, tokens: &[Token]) -> Vec<SymbolRecord> {
    let mut symbols = Vec::new();
    for (i, tok) in tokens.iter().enumerate() {
        if !is_declaration(source, tokens, i) {
            continue;
        }
        let kind = prev_significant(tokens, i)
            .filter(|&p| {
                tokens[p].kind == TokenKind::Keyword && tokens[p].text(source) == "function"
            })
            .map_or(SymbolKind::Variable, |_| SymbolKind::Function);
        symbols.push(SymbolRecord::new(tok.text(source), kind, tok.span));
    }
    symbols
}

/// Typed local declarations visible at `offset`, as `(name, type name)`
/// pairs ready for the inference engine's local map.
///
/// Document-wide declarations come first and enclosing-scope ones last,
/// so inserting the pairs into a map in order makes the inner scope
/// shadow the outer one. Untyped `var name` declarations are omitted:
/// they contribute no type information.
pub fn local_types(source: &str, tokens: &[Token], offset: u32) -> Vec<(String, String)> {
    let scope = enclosing_function(source, tokens, offset);
    let mut globals = Vec::new();
    let mut locals = Vec::new();
    for (i, tok) in tokens.iter().enumerate() {
        if tok.kind != TokenKind::Keyword || tok.text(source) != "var" {
            continue;
        }
        let Some((name, ty)) = typed_declaration_at(source, tokens, i) else {
            continue;
        };
        match (enclosing_function(source, tokens, tok.span.start), scope) {
            (None, _) => globals.push((name, ty)),
            (Some(declaring), Some(current)) if declaring == current => locals.push((name, ty)),
            _ => {}
        }
    }
    globals.extend(locals);
    globals
}

/// `var : Type name` starting at the `var` keyword token `kw`.
fn typed_declaration_at(source: &str, tokens: &[Token], kw: usize) -> Option<(String, String)> {
    let mut rest = tokens[kw + 1..].iter().filter(|t| !t.is_trivia());
    let colon = rest.next()?;
    if colon.kind != TokenKind::Punct || colon.text(source) != ":" {
        return None;
    }
    let ty = rest.next()?;
    if ty.kind != TokenKind::Ident {
        return None;
    }
    let name = rest.next()?;
    if name.kind != TokenKind::Ident {
        return None;
    }
    Some((name.text(source).to_string(), ty.text(source).to_string()))
}

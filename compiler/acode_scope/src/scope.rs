//! Function-scope discovery by brace matching.

use acode_ir::{Span, Token, TokenKind};

/// The innermost function scope containing `offset`, if any.
///
/// A scope runs from its `function` keyword through the matching closing
/// brace, end-inclusive for the offset test so the caret sitting right
/// after `}` still counts as inside.
pub fn enclosing_function(source: &str, tokens: &[Token], offset: u32) -> Option<Span> {
    let mut innermost: Option<Span> = None;
    for (i, tok) in tokens.iter().enumerate() {
        if tok.kind == TokenKind::Keyword && tok.text(source) == "function" {
            if let Some(span) = function_span(source, tokens, i) {
                if span.touches(offset) && innermost.map_or(true, |cur| span.start >= cur.start) {
                    innermost = Some(span);
                }
            }
        }
    }
    innermost
}

/// Span from the `function` keyword at token `kw` through its matching
/// closing brace. `None` for an unterminated body.
fn function_span(source: &str, tokens: &[Token], kw: usize) -> Option<Span> {
    let mut depth = 0u32;
    for tok in &tokens[kw..] {
        if tok.kind != TokenKind::Punct {
            continue;
        }
        match tok.text(source) {
            "{" => depth += 1,
            "}" if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return Some(Span::new(tokens[kw].span.start, tok.span.end));
                }
            }
            _ => {}
        }
    }
    None
}

/// Byte range of the parameter list of the function declared at token
/// `kw`: the tokens strictly between the signature's `(` and its
/// matching `)`.
pub(crate) fn signature_range(source: &str, tokens: &[Token], kw: usize) -> Option<Span> {
    let mut depth = 0u32;
    let mut open: Option<u32> = None;
    for tok in &tokens[kw..] {
        if tok.kind != TokenKind::Punct {
            continue;
        }
        match tok.text(source) {
            "(" => {
                if open.is_none() {
                    open = Some(tok.span.end);
                }
                depth += 1;
            }
            ")" if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return open.map(|start| Span::new(start, tok.span.start));
                }
            }
            // The body started before any parameter list appeared.
            "{" if open.is_none() => return None,
            _ => {}
        }
    }
    None
}

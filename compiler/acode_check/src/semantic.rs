//! Semantic warnings: declared type vs. inferred value type on
//! initialization and assignment.
//!
//! Deliberately quiet: a warning fires only when the target type is
//! known, inference on the right-hand side is conclusive, and the
//! compatibility matrix rules the pairing out.

use acode_diagnostic::{Diagnostic, ErrorCode};
use acode_ir::{Span, Token, TokenKind};
use acode_types::{infer, is_compatible, Catalog, LocalTypes, Ty};

pub(crate) fn check(
    source: &str,
    tokens: &[Token],
    catalog: &Catalog,
    out: &mut Vec<Diagnostic>,
) {
    let sig: Vec<&Token> = tokens.iter().filter(|t| !t.is_trivia()).collect();
    for i in 1..sig.len() {
        let op = sig[i];
        if op.kind != TokenKind::Operator || op.text(source) != "=" {
            continue;
        }
        let lhs = sig[i - 1];
        if lhs.kind != TokenKind::Ident {
            continue;
        }
        let Some(expr_span) = rhs_span(source, &sig, i) else {
            continue;
        };
        let target = target_type(source, tokens, lhs, catalog);
        if target.is_unknown() {
            continue;
        }
        let locals = local_map(source, tokens, lhs.span.start);
        let value = infer(&source[expr_span.to_range()], &locals, catalog);
        if !value.is_unknown() && !is_compatible(&target, &value) {
            out.push(Diagnostic::warning(
                ErrorCode::A101,
                expr_span,
                format!(
                    "`{}` holds {target} but this value is {value}",
                    lhs.text(source)
                ),
            ));
        }
    }
}

/// Span of the right-hand side: from the token after `=` to the next
/// `;`, the end of the line, or the end of input.
fn rhs_span(source: &str, sig: &[&Token], eq: usize) -> Option<Span> {
    let first = sig.get(eq + 1)?;
    if first.kind == TokenKind::Punct && first.text(source) == ";" {
        return None;
    }
    let mut end = first.span.end;
    for pair in sig[eq + 1..].windows(2) {
        let (tok, next) = (pair[0], pair[1]);
        if next.kind == TokenKind::Punct && next.text(source) == ";" {
            end = tok.span.end;
            return Some(Span::new(first.span.start, end));
        }
        let gap = &source[tok.span.end as usize..next.span.start as usize];
        if gap.contains('\n') {
            end = tok.span.end;
            return Some(Span::new(first.span.start, end));
        }
        end = next.span.end;
    }
    Some(Span::new(first.span.start, end))
}

/// Declared type of the assignment target: the local map for plain
/// names, the attribute catalog for `$`-prefixed ones.
fn target_type(source: &str, tokens: &[Token], lhs: &Token, catalog: &Catalog) -> Ty {
    let text = lhs.text(source);
    if let Some(bare) = text.strip_prefix('$') {
        return catalog
            .attribute(bare)
            .map_or(Ty::Unknown, |attr| Ty::from_name(&attr.attr_type));
    }
    local_map(source, tokens, lhs.span.start)
        .get(text)
        .cloned()
        .unwrap_or(Ty::Unknown)
}

fn local_map(source: &str, tokens: &[Token], offset: u32) -> LocalTypes {
    let mut map = LocalTypes::default();
    for (name, ty_name) in acode_scope::local_types(source, tokens, offset) {
        map.insert(name, Ty::from_name(&ty_name));
    }
    map
}

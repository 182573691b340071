//! Style warnings: typographic quotes, likely missing terminators,
//! off-canonical casing, unknown export tags, stray carets.

use acode_diagnostic::{Diagnostic, ErrorCode};
use acode_export::Tag;
use acode_ir::{Span, Token, TokenKind};
use acode_types::Catalog;

const SMART_QUOTES: [char; 4] = ['\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}'];

pub(crate) fn check(
    source: &str,
    tokens: &[Token],
    catalog: &Catalog,
    out: &mut Vec<Diagnostic>,
) {
    check_smart_quotes(source, out);
    check_terminators(source, tokens, out);
    check_casing(source, tokens, catalog, out);
    check_reserved_declarations(source, tokens, out);
}

fn check_smart_quotes(source: &str, out: &mut Vec<Diagnostic>) {
    for (i, c) in source.char_indices() {
        if SMART_QUOTES.contains(&c) {
            let start = u32::try_from(i).unwrap_or(u32::MAX);
            let span = Span::new(start, start + u32::try_from(c.len_utf8()).unwrap_or(1));
            out.push(Diagnostic::warning(
                ErrorCode::A001,
                span,
                "typographic quote; Action Code needs a straight quote",
            ));
        }
    }
}

/// Flag statement-shaped lines that do not end in `;`.
///
/// Only lines that start with `var` or contain a plain `=` assignment
/// are considered statements; bare expression fragments (the usual
/// content of `^value(...)^`) never trip this.
fn check_terminators(source: &str, tokens: &[Token], out: &mut Vec<Diagnostic>) {
    let sig: Vec<&Token> = tokens.iter().filter(|t| !t.is_trivia()).collect();
    let mut line: Vec<&Token> = Vec::new();
    let mut i = 0;
    while i < sig.len() {
        line.push(sig[i]);
        let line_ends = match sig.get(i + 1) {
            Some(next) => {
                let gap = &source[sig[i].span.end as usize..next.span.start as usize];
                gap.contains('\n')
            }
            None => true,
        };
        if line_ends {
            check_statement_line(source, &line, out);
            line.clear();
        }
        i += 1;
    }
}

fn check_statement_line(source: &str, line: &[&Token], out: &mut Vec<Diagnostic>) {
    let Some(first) = line.first() else { return };
    let starts_with_var = first.kind == TokenKind::Keyword && first.text(source) == "var";
    let has_assignment = line
        .iter()
        .any(|t| t.kind == TokenKind::Operator && t.text(source) == "=");
    if !starts_with_var && !has_assignment {
        return;
    }
    let Some(last) = line.last() else { return };
    let last_text = last.text(source);
    // Operators and open braces mean the statement continues.
    if last.kind == TokenKind::Operator
        || matches!(last_text, ";" | "{" | "}" | "," | "(")
    {
        return;
    }
    out.push(Diagnostic::warning(
        ErrorCode::A002,
        last.span,
        "statement is probably missing its `;` terminator",
    ));
}

fn check_casing(source: &str, tokens: &[Token], catalog: &Catalog, out: &mut Vec<Diagnostic>) {
    for tok in tokens {
        if tok.kind != TokenKind::Ident {
            continue;
        }
        let text = tok.text(source);
        if let Some(bare) = text.strip_prefix('$') {
            if catalog.attribute(bare).is_none() {
                if let Some(canonical) = catalog.attribute_ci(bare) {
                    out.push(Diagnostic::warning(
                        ErrorCode::A003,
                        tok.span,
                        format!("attribute is spelled `${}`", canonical.name),
                    ));
                }
            }
        } else if let Some(canonical) = catalog.operator_ci(text) {
            if canonical.name != text {
                out.push(Diagnostic::warning(
                    ErrorCode::A003,
                    tok.span,
                    format!("operator is spelled `{}`", canonical.name),
                ));
            }
        }
    }
}

/// `var <reserved>` is the one guaranteed failure in the dialect.
fn check_reserved_declarations(source: &str, tokens: &[Token], out: &mut Vec<Diagnostic>) {
    let sig: Vec<&Token> = tokens.iter().filter(|t| !t.is_trivia()).collect();
    for (i, tok) in sig.iter().enumerate() {
        if tok.kind != TokenKind::Keyword {
            continue;
        }
        let name = tok.text(source);
        if name == "var" || name == "function" {
            continue;
        }
        let declared = match i.checked_sub(1).map(|p| sig[p]) {
            Some(prev) if prev.kind == TokenKind::Keyword && prev.text(source) == "var" => true,
            Some(prev) if prev.kind == TokenKind::Ident => {
                // var : Type <reserved>
                i >= 3
                    && sig[i - 2].kind == TokenKind::Punct
                    && sig[i - 2].text(source) == ":"
                    && sig[i - 3].kind == TokenKind::Keyword
                    && sig[i - 3].text(source) == "var"
            }
            _ => false,
        };
        if declared {
            out.push(Diagnostic::error(
                ErrorCode::A201,
                tok.span,
                format!("`{name}` is a reserved word and cannot name a variable"),
            ));
        }
    }
}

// ─── Export documents ────────────────────────────────────────────────────

pub(crate) fn check_tag_names(tags: &[Tag], catalog: &Catalog, out: &mut Vec<Diagnostic>) {
    // An empty vocabulary means the catalog failed to load; stay quiet
    // rather than flagging every tag in the workspace.
    if catalog.export_tags().is_empty() {
        return;
    }
    for tag in tags {
        if catalog.export_tag(&tag.name).is_none() {
            out.push(Diagnostic::warning(
                ErrorCode::A004,
                tag.span,
                format!("unknown export tag `^{}^`", tag.name),
            ));
        }
    }
}

pub(crate) fn check_stray_carets(offsets: &[u32], out: &mut Vec<Diagnostic>) {
    for &at in offsets {
        out.push(Diagnostic::warning(
            ErrorCode::A005,
            Span::new(at, at + 1),
            "`^` is not part of any export tag",
        ));
    }
}

//! The per-document validation pass.
//!
//! Produces the full diagnostic set for one document in isolation:
//! style warnings, semantic type-mismatch warnings, and the
//! reserved-word hard error. Export documents additionally get their
//! tag vocabulary and stray carets checked; the Action Code embedded in
//! expression-wrapping tags is validated per content segment, so a
//! nested child tag's delimiters are never misread as expression
//! syntax.
//!
//! One document's analysis never looks at another document.

mod semantic;
mod style;

use acode_diagnostic::Diagnostic;
use acode_export::{build_tree, parse_tags, stray_carets, TagNode};
use acode_ir::Span;
use acode_types::Catalog;

/// How a document should be interpreted.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Dialect {
    /// Plain Action Code.
    Action,
    /// Template text with `^tag^` markers embedding Action Code.
    Export,
}

/// Validate one document, returning every diagnostic for it.
pub fn check_document(source: &str, dialect: Dialect, catalog: &Catalog) -> Vec<Diagnostic> {
    match dialect {
        Dialect::Action => check_action(source, 0, catalog),
        Dialect::Export => check_export(source, catalog),
    }
}

/// Validate a stretch of Action Code. `base` is the document offset of
/// `text`, added to every diagnostic span.
fn check_action(text: &str, base: u32, catalog: &Catalog) -> Vec<Diagnostic> {
    let tokens = acode_lexer::tokenize(text);
    let mut diagnostics = Vec::new();
    style::check(text, &tokens, catalog, &mut diagnostics);
    semantic::check(text, &tokens, catalog, &mut diagnostics);
    if base != 0 {
        for d in &mut diagnostics {
            d.span = Span::new(d.span.start + base, d.span.end + base);
        }
    }
    diagnostics
}

fn check_export(source: &str, catalog: &Catalog) -> Vec<Diagnostic> {
    let tags = parse_tags(source);
    let mut diagnostics = Vec::new();
    style::check_tag_names(&tags, catalog, &mut diagnostics);
    style::check_stray_carets(&stray_carets(source, &tags), &mut diagnostics);

    // Tag trees can nest to pathological depth; walk with an explicit
    // stack instead of recursing.
    let tree = build_tree(&tags);
    let mut stack: Vec<&TagNode> = tree.iter().collect();
    while let Some(node) = stack.pop() {
        let wraps_expression = catalog.export_tag(&node.tag.name).map_or_else(
            || acode_types::EXPRESSION_TAGS.contains(&node.tag.name.as_str()),
            |def| def.wraps_expression,
        );
        if wraps_expression {
            // Child tag spans are skipped by projection; each remaining
            // segment is plain Action Code with document-true offsets.
            for segment in node.content_segments() {
                let text = &source[segment.to_range()];
                diagnostics.extend(check_action(text, segment.start, catalog));
            }
        }
        stack.extend(node.children.iter());
    }
    diagnostics.sort_by_key(|d| (d.span.start, d.span.end));
    diagnostics
}

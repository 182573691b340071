use acode_ir::{SymbolKind, Token};
use acode_lexer::tokenize;
use pretty_assertions::assert_eq;

use crate::{
    document_symbols, enclosing_function, find_references, is_declaration, local_types, resolve,
};

fn toks(source: &str) -> Vec<Token> {
    tokenize(source)
}

/// Byte offset of the `n`th occurrence of `needle` (0-based).
fn offset_of(source: &str, needle: &str, n: usize) -> u32 {
    let mut from = 0;
    for _ in 0..n {
        let at = source[from..].find(needle).unwrap();
        from += at + needle.len();
    }
    u32::try_from(from + source[from..].find(needle).unwrap()).unwrap()
}

/// Token index whose span starts at `offset`.
fn token_at(tokens: &[Token], offset: u32) -> usize {
    tokens.iter().position(|t| t.span.start == offset).unwrap()
}

// ─── Scopes ──────────────────────────────────────────────────────────────

#[test]
fn offset_inside_function_finds_its_scope() {
    let src = "var g;\nfunction f(x) { var y; }\nvar h;";
    let tokens = toks(src);
    let inside = offset_of(src, "y", 0);
    let scope = enclosing_function(src, &tokens, inside).unwrap();
    assert_eq!(scope.start, offset_of(src, "function", 0));
    assert_eq!(&src[scope.to_range()], "function f(x) { var y; }");
    assert_eq!(enclosing_function(src, &tokens, 0), None);
}

#[test]
fn innermost_of_nested_functions_wins() {
    let src = "function outer() { function inner() { var z; } }";
    let tokens = toks(src);
    let at_z = offset_of(src, "z", 0);
    let scope = enclosing_function(src, &tokens, at_z).unwrap();
    assert_eq!(scope.start, offset_of(src, "function inner", 0));
}

#[test]
fn braces_in_strings_do_not_close_scopes() {
    let src = "function f() { var s = \"}\"; var t; }";
    let tokens = toks(src);
    let scope = enclosing_function(src, &tokens, offset_of(src, "t", 0)).unwrap();
    assert_eq!(scope.end, u32::try_from(src.len()).unwrap());
}

#[test]
fn unterminated_body_has_no_scope() {
    let src = "function f() { var x;";
    let tokens = toks(src);
    assert_eq!(enclosing_function(src, &tokens, offset_of(src, "x", 0)), None);
}

// ─── Declarations ────────────────────────────────────────────────────────

#[test]
fn declaration_forms_are_recognized() {
    let src = "var alpha; var : Number nval; function fun1(parm) { each(item) { item; } } alpha;";
    let tokens = toks(src);
    for needle in ["alpha", "nval", "fun1", "parm", "item"] {
        let i = token_at(&tokens, offset_of(src, needle, 0));
        assert!(is_declaration(src, &tokens, i), "{needle} should declare");
    }
    // The trailing `alpha;` and the loop body `item;` are references.
    let alpha_ref = token_at(&tokens, offset_of(src, "alpha", 1));
    assert!(!is_declaration(src, &tokens, alpha_ref));
    let item_ref = token_at(&tokens, offset_of(src, "item", 1));
    assert!(!is_declaration(src, &tokens, item_ref));
}

#[test]
fn type_name_in_typed_declaration_is_not_a_declaration() {
    let src = "var : Number count;";
    let tokens = toks(src);
    let ty = token_at(&tokens, offset_of(src, "Number", 0));
    assert!(!is_declaration(src, &tokens, ty));
    let name = token_at(&tokens, offset_of(src, "count", 0));
    assert!(is_declaration(src, &tokens, name));
}

#[test]
fn symbols_carry_their_kind() {
    let src = "var total;\nfunction render(x) { var inner; }";
    let symbols = document_symbols(src, &toks(src));
    let names: Vec<(&str, SymbolKind)> = symbols
        .iter()
        .map(|s| (s.name.as_str(), s.kind))
        .collect();
    assert_eq!(
        names,
        vec![
            ("total", SymbolKind::Variable),
            ("render", SymbolKind::Function),
            ("x", SymbolKind::Variable),
            ("inner", SymbolKind::Variable),
        ]
    );
}

// ─── Resolution ──────────────────────────────────────────────────────────

#[test]
fn same_name_in_two_functions_resolves_to_own_scope() {
    let src = "function a() { var v; v = 1; }\nfunction b() { var v; v = 2; }";
    let tokens = toks(src);
    let use_in_a = offset_of(src, "v = 1", 0);
    let use_in_b = offset_of(src, "v = 2", 0);
    let decl_a = resolve(src, &tokens, "v", use_in_a).unwrap();
    let decl_b = resolve(src, &tokens, "v", use_in_b).unwrap();
    assert_eq!(decl_a.start, offset_of(src, "var v", 0) + 4);
    assert_eq!(decl_b.start, offset_of(src, "var v", 1) + 4);
    assert!(decl_b.start > offset_of(src, "function b", 0));
}

#[test]
fn local_declaration_shadows_global() {
    let src = "var v;\nfunction f() { var v; v = 1; }";
    let tokens = toks(src);
    let inner_use = offset_of(src, "v = 1", 0);
    let decl = resolve(src, &tokens, "v", inner_use).unwrap();
    assert_eq!(decl.start, offset_of(src, "var v", 1) + 4);
}

#[test]
fn reference_before_declaration_still_resolves() {
    let src = "function f() { v = 1; var v; }";
    let tokens = toks(src);
    let early_use = offset_of(src, "v = 1", 0);
    let decl = resolve(src, &tokens, "v", early_use).unwrap();
    assert_eq!(decl.start, offset_of(src, "var v", 0) + 4);
}

#[test]
fn undeclared_name_resolves_to_nothing() {
    let src = "function f() { ghost = 1; }";
    assert_eq!(resolve(src, &toks(src), "ghost", offset_of(src, "ghost", 0)), None);
}

#[test]
fn references_stay_inside_the_declaring_scope() {
    let src = "function a() { var v; v; }\nfunction b() { var v; v; v; }";
    let tokens = toks(src);
    let in_b = offset_of(src, "function b", 0) + 20;
    let refs = find_references(src, &tokens, "v", in_b);
    assert_eq!(refs.len(), 3);
    let b_start = offset_of(src, "function b", 0);
    assert!(refs.iter().all(|s| s.start > b_start));
}

#[test]
fn global_references_span_the_document() {
    let src = "var v; v;\nfunction f() { v; }";
    let tokens = toks(src);
    let refs = find_references(src, &tokens, "v", offset_of(src, "v", 1));
    assert_eq!(refs.len(), 3);
}

// ─── Local type extraction ───────────────────────────────────────────────

#[test]
fn typed_locals_feed_inference_in_shadowing_order() {
    let src = "var : String v;\nfunction f() { var : List v; var plain; v; }";
    let tokens = toks(src);
    let inside = offset_of(src, "v;", 1);
    let pairs = local_types(src, &tokens, inside);
    assert_eq!(
        pairs,
        vec![
            ("v".to_string(), "String".to_string()),
            ("v".to_string(), "List".to_string()),
        ]
    );
    // At top level only the global is visible.
    assert_eq!(
        local_types(src, &tokens, 0),
        vec![("v".to_string(), "String".to_string())]
    );
}

use acode_ir::TokenKind;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::tokenize;

/// Helper: tokenize and return `(kind, text)` pairs.
fn lex(source: &str) -> Vec<(TokenKind, &str)> {
    tokenize(source)
        .into_iter()
        .map(|t| (t.kind, t.text(source)))
        .collect()
}

/// Helper: tokenize and return kinds only.
fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source).into_iter().map(|t| t.kind).collect()
}

/// Helper: concatenation of all token texts.
fn rejoin(source: &str) -> String {
    tokenize(source).iter().map(|t| t.text(source)).collect()
}

// ─── Exhaustiveness ──────────────────────────────────────────────────────

#[test]
fn concatenation_reproduces_source() {
    let sources = [
        "",
        "x",
        "var x = 1;",
        "function f(a, b) { return a + b; }",
        "\"unterminated",
        "'",
        "// comment only",
        "$Color = \"red\"; $Name.contains(\"x\")",
        "^value($Name)^ literal ^",
        "\u{201C}smart\u{201D} quotes and \u{2018}more\u{2019}",
        "each (x in list) { }",
    ];
    for source in sources {
        assert_eq!(rejoin(source), source, "mismatch for {source:?}");
    }
}

#[test]
fn spans_are_contiguous() {
    let source = "var x = -1.5; // done\nf(\"a\\\"b\")";
    let tokens = tokenize(source);
    let mut expected_start = 0;
    for t in &tokens {
        assert_eq!(t.span.start, expected_start, "gap before {t:?}");
        assert!(t.span.len() > 0, "zero-length token {t:?}");
        expected_start = t.span.end;
    }
    assert_eq!(expected_start as usize, source.len());
}

#[test]
fn empty_source_yields_no_tokens() {
    assert_eq!(tokenize(""), vec![]);
}

#[test]
fn lone_quote_is_one_string_token() {
    assert_eq!(lex("\""), vec![(TokenKind::Str, "\"")]);
    assert_eq!(lex("'"), vec![(TokenKind::Str, "'")]);
}

// ─── Strings & Escapes ───────────────────────────────────────────────────

#[test]
fn escaped_quote_stays_inside_string() {
    assert_eq!(lex(r#""a\"b""#), vec![(TokenKind::Str, r#""a\"b""#)]);
    assert_eq!(lex(r"'it\'s'"), vec![(TokenKind::Str, r"'it\'s'")]);
}

#[test]
fn backslash_consumes_any_following_character() {
    // The escaped char needs no special meaning — it is taken verbatim.
    assert_eq!(lex(r#""a\zb""#), vec![(TokenKind::Str, r#""a\zb""#)]);
}

#[test]
fn unterminated_string_runs_to_eof() {
    assert_eq!(lex("\"abc"), vec![(TokenKind::Str, "\"abc")]);
}

#[test]
fn mixed_quotes_do_not_terminate_each_other() {
    assert_eq!(lex("\"it's\""), vec![(TokenKind::Str, "\"it's\"")]);
}

// ─── Numbers & Minus Disambiguation ──────────────────────────────────────

#[test]
fn minus_after_identifier_is_an_operator() {
    assert_eq!(
        lex("x-1"),
        vec![
            (TokenKind::Ident, "x"),
            (TokenKind::Operator, "-"),
            (TokenKind::Number, "1"),
        ]
    );
}

#[test]
fn leading_minus_at_start_is_one_number() {
    assert_eq!(lex("-1"), vec![(TokenKind::Number, "-1")]);
}

#[test]
fn minus_after_operator_starts_a_number() {
    assert_eq!(
        lex("x = -2.5"),
        vec![
            (TokenKind::Ident, "x"),
            (TokenKind::Whitespace, " "),
            (TokenKind::Operator, "="),
            (TokenKind::Whitespace, " "),
            (TokenKind::Number, "-2.5"),
        ]
    );
}

#[test]
fn minus_after_closing_paren_is_an_operator() {
    assert_eq!(
        kinds("f(x)-1"),
        vec![
            TokenKind::Ident,
            TokenKind::Punct,
            TokenKind::Ident,
            TokenKind::Punct,
            TokenKind::Operator,
            TokenKind::Number,
        ]
    );
}

#[test]
fn at_most_one_decimal_point() {
    assert_eq!(
        lex("1.2.3"),
        vec![
            (TokenKind::Number, "1.2"),
            (TokenKind::Punct, "."),
            (TokenKind::Number, "3"),
        ]
    );
}

#[test]
fn dot_without_digit_is_punct() {
    assert_eq!(
        lex("1.x"),
        vec![
            (TokenKind::Number, "1"),
            (TokenKind::Punct, "."),
            (TokenKind::Ident, "x"),
        ]
    );
}

// ─── Identifiers, Keywords, Sigils ───────────────────────────────────────

#[test]
fn keywords_resolve() {
    assert_eq!(kinds("var"), vec![TokenKind::Keyword]);
    assert_eq!(kinds("function"), vec![TokenKind::Keyword]);
    assert_eq!(kinds("if"), vec![TokenKind::Keyword]);
}

#[test]
fn keyword_prefix_is_plain_identifier() {
    assert_eq!(kinds("variable"), vec![TokenKind::Ident]);
    assert_eq!(kinds("iff"), vec![TokenKind::Ident]);
}

#[test]
fn sigil_attribute_names_are_identifiers() {
    assert_eq!(lex("$Color"), vec![(TokenKind::Ident, "$Color")]);
    // Even when the bare name would be reserved
    assert_eq!(kinds("$if"), vec![TokenKind::Ident]);
}

#[test]
fn each_is_not_reserved() {
    assert_eq!(kinds("each"), vec![TokenKind::Ident]);
    assert_eq!(kinds("eachLine"), vec![TokenKind::Ident]);
}

// ─── Comments ────────────────────────────────────────────────────────────

#[test]
fn line_comment_stops_before_newline() {
    assert_eq!(
        lex("// note\nx"),
        vec![
            (TokenKind::Comment, "// note"),
            (TokenKind::Whitespace, "\n"),
            (TokenKind::Ident, "x"),
        ]
    );
}

#[test]
fn single_slash_is_an_operator() {
    assert_eq!(kinds("a/b"), vec![TokenKind::Ident, TokenKind::Operator, TokenKind::Ident]);
}

// ─── Operators & Punctuation ─────────────────────────────────────────────

#[test]
fn two_char_operators_lex_as_one_token() {
    for op in ["==", "!=", "<=", ">=", "&&", "||", "+=", "-="] {
        assert_eq!(lex(op), vec![(TokenKind::Operator, op)], "for {op}");
    }
}

#[test]
fn caret_is_punctuation() {
    assert_eq!(lex("^"), vec![(TokenKind::Punct, "^")]);
}

#[test]
fn braces_inside_strings_are_part_of_the_string() {
    assert_eq!(lex("\"{}\""), vec![(TokenKind::Str, "\"{}\"")]);
}

// ─── Fallback ────────────────────────────────────────────────────────────

#[test]
fn smart_quote_becomes_one_punct_token() {
    let source = "\u{201C}";
    let tokens = tokenize(source);
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Punct);
    assert_eq!(tokens[0].text(source), "\u{201C}");
}

#[test]
fn determinism() {
    let source = "var x = f(\"a\").g(-1); ^value($Name)^";
    assert_eq!(tokenize(source), tokenize(source));
}

// ─── Property Tests ──────────────────────────────────────────────────────

proptest! {
    /// For arbitrary input, token texts concatenate back to the source and
    /// the scan terminates (implicitly — proptest would hang otherwise).
    #[test]
    fn exhaustive_over_arbitrary_input(source in "\\PC*") {
        prop_assert_eq!(rejoin(&source), source);
    }

    /// Total token length always equals input length.
    #[test]
    fn total_length_over_quotelike_input(source in "[\"'\\\\a1 .^-]{0,40}") {
        let total: u32 = tokenize(&source).iter().map(|t| t.span.len()).sum();
        prop_assert_eq!(total as usize, source.len());
    }
}

use acode_ir::Span;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::{build_tree, parse_tags, stray_carets};

#[test]
fn zero_argument_tag() {
    let text = "before ^root^ after";
    let tags = parse_tags(text);
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].name, "root");
    assert_eq!(tags[0].span, Span::new(7, 13));
    assert_eq!(tags[0].content, None);
    assert_eq!(stray_carets(text, &tags), Vec::<u32>::new());
}

#[test]
fn tag_with_argument() {
    let text = "^value($Name)^";
    let tags = parse_tags(text);
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].name, "value");
    assert_eq!(tags[0].span, Span::new(0, 14));
    assert_eq!(tags[0].arg_text(text), Some("$Name"));
}

#[test]
fn nested_tag_yields_exactly_two_tags() {
    let text = "^include(^value(a)^)^";
    let tags = parse_tags(text);
    assert_eq!(tags.len(), 2);

    let outer = &tags[0];
    let inner = &tags[1];
    assert_eq!(outer.name, "include");
    assert_eq!(outer.arg_text(text), Some("^value(a)^"));
    assert_eq!(inner.name, "value");
    assert_eq!(inner.arg_text(text), Some("a"));

    // The inner tag's span lies fully inside the outer's content span.
    let outer_content = outer.content.unwrap();
    assert!(outer_content.contains_span(inner.span));
}

#[test]
fn unterminated_tag_is_one_stray_caret() {
    let text = "^value(unterminated";
    let tags = parse_tags(text);
    assert_eq!(tags, vec![]);
    assert_eq!(stray_carets(text, &tags), vec![0]);
}

#[test]
fn closing_paren_without_caret_abandons_the_tag() {
    let text = "^value(a) trailing";
    let tags = parse_tags(text);
    assert_eq!(tags, vec![]);
    assert_eq!(stray_carets(text, &tags), vec![0]);
}

#[test]
fn caret_without_name_is_stray() {
    let text = "a ^ b ^^ c";
    let tags = parse_tags(text);
    assert_eq!(tags, vec![]);
    assert_eq!(stray_carets(text, &tags), vec![2, 6, 7]);
}

#[test]
fn parens_inside_quoted_argument_do_not_affect_depth() {
    let text = "^value(\"smile :)\")^";
    let tags = parse_tags(text);
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].arg_text(text), Some("\"smile :)\""));
}

#[test]
fn escaped_quote_inside_argument_string() {
    let text = r#"^value("a\")b")^"#;
    let tags = parse_tags(text);
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].arg_text(text), Some(r#""a\")b""#));
}

#[test]
fn sibling_tags_both_found() {
    let text = "^title^ and ^text^";
    let tags = parse_tags(text);
    let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["title", "text"]);
}

#[test]
fn deeply_nested_tags_all_found() {
    // ^a(^a(^a( ... x ... )^)^)^ to a depth no recursive scan could take.
    let depth = 5_000;
    let mut text = String::new();
    for _ in 0..depth {
        text.push_str("^a(");
    }
    text.push('x');
    for _ in 0..depth {
        text.push_str(")^");
    }
    let tags = parse_tags(&text);
    assert_eq!(tags.len(), depth);
    let tree = build_tree(&tags);
    assert_eq!(tree.len(), 1);
}

#[test]
fn tree_projection_skips_child_spans() {
    let text = "^if($Prominence(parent) + ^value(n)^ > 3)^";
    let tags = parse_tags(text);
    assert_eq!(tags.len(), 2);
    let tree = build_tree(&tags);
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].children.len(), 1);
    assert_eq!(
        tree[0].projected_content(text),
        "$Prominence(parent) +  > 3"
    );
}

#[test]
fn content_segments_empty_for_argless_tag() {
    let text = "^root^";
    let tags = parse_tags(text);
    let tree = build_tree(&tags);
    assert_eq!(tree[0].content_segments(), vec![]);
}

#[test]
fn determinism() {
    let text = "^include(^value(a)^)^ stray ^ ^title^";
    assert_eq!(parse_tags(text), parse_tags(text));
}

proptest! {
    /// The parser terminates on arbitrary input and every discovered
    /// child span is contained in its parent's content span.
    #[test]
    fn containment_over_arbitrary_input(text in "[\\^()a-z\"\\\\ ]{0,60}") {
        let tags = parse_tags(&text);
        for (i, outer) in tags.iter().enumerate() {
            for inner in &tags[i + 1..] {
                if let Some(content) = outer.content {
                    if outer.span.contains_span(inner.span) {
                        prop_assert!(content.contains_span(inner.span));
                    }
                }
            }
        }
    }
}

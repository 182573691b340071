//! Export Code tag discovery.
//!
//! Export Code interleaves literal text with `^tag^` / `^tag(args)^`
//! directives, whose arguments may contain further tags to arbitrary
//! depth. This crate finds every well-formed tag span, builds the
//! containment tree, and reports stray carets.
//!
//! Discovery uses an explicit worklist of content regions instead of
//! recursion, so pathological nesting depth cannot exhaust the stack.

mod tree;

pub use tree::{build_tree, TagNode};

use acode_ir::Span;

/// One discovered export tag.
///
/// `span` covers the whole directive including both carets. `content` is
/// the argument span in document coordinates, `None` for argument-less
/// tags like `^root^`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Tag {
    pub name: String,
    pub span: Span,
    pub content: Option<Span>,
}

impl Tag {
    /// The argument text, if any.
    pub fn arg_text<'a>(&self, source: &'a str) -> Option<&'a str> {
        self.content.map(|c| &source[c.to_range()])
    }
}

/// Discover every well-formed tag in `text`, including tags nested inside
/// other tags' arguments, as one flat list.
///
/// The list is ordered by start offset, outermost first at equal starts.
/// A child's span always lies fully inside its parent's content span.
pub fn parse_tags(text: &str) -> Vec<Tag> {
    let bytes = text.as_bytes();
    let mut tags = Vec::new();

    // Worklist of content regions still to scan. Children discovered in a
    // region push their own content back onto the worklist; offsets stay
    // document-relative throughout, so no rebasing pass is needed.
    let mut pending: Vec<(usize, usize)> = vec![(0, bytes.len())];

    while let Some((start, end)) = pending.pop() {
        scan_region(text, bytes, start, end, &mut tags, &mut pending);
    }

    tags.sort_by(|a, b| {
        a.span
            .start
            .cmp(&b.span.start)
            .then(b.span.end.cmp(&a.span.end))
    });
    tags
}

/// Single forward pass over one region, appending discovered tags and
/// queueing their content spans for the next worklist round.
#[allow(clippy::cast_possible_truncation)]
fn scan_region(
    text: &str,
    bytes: &[u8],
    start: usize,
    end: usize,
    tags: &mut Vec<Tag>,
    pending: &mut Vec<(usize, usize)>,
) {
    let mut i = start;
    while i < end {
        if bytes[i] != b'^' {
            i += 1;
            continue;
        }

        // Candidate tag: consume an identifier-like name run.
        let name_start = i + 1;
        let mut j = name_start;
        while j < end && is_name_byte(bytes[j]) {
            j += 1;
        }
        if j == name_start {
            // No name after the caret — stray; keep scanning after it.
            i += 1;
            continue;
        }

        match bytes.get(j) {
            // ^name^ — zero-argument tag, closing immediately.
            Some(b'^') if j < end => {
                tags.push(Tag {
                    name: text[name_start..j].to_string(),
                    span: Span::new(i as u32, (j + 1) as u32),
                    content: None,
                });
                i = j + 1;
            }
            // ^name( — balanced argument scan.
            Some(b'(') if j < end => {
                match balanced_args(bytes, j + 1, end) {
                    // Valid only if the byte right after the closing paren
                    // is another caret.
                    Some(close) if bytes.get(close + 1) == Some(&b'^') && close + 1 < end => {
                        let content = Span::new((j + 1) as u32, close as u32);
                        tags.push(Tag {
                            name: text[name_start..j].to_string(),
                            span: Span::new(i as u32, (close + 2) as u32),
                            content: Some(content),
                        });
                        pending.push((j + 1, close));
                        i = close + 2;
                    }
                    // Depth never returned to zero, or no closing caret —
                    // abandon the candidate; the caret stays stray.
                    _ => i += 1,
                }
            }
            _ => i += 1,
        }
    }
}

/// Scan a parenthesized argument from `from` (just past the opening paren).
///
/// Tracks paren depth starting at 1 and a single active string quote with
/// its own backslash-escape flag; parens inside an active string never
/// affect depth. Returns the offset of the closing paren, or `None` if the
/// region ends first.
fn balanced_args(bytes: &[u8], from: usize, end: usize) -> Option<usize> {
    let mut depth = 1u32;
    let mut quote: Option<u8> = None;
    let mut escaped = false;
    let mut k = from;
    while k < end {
        let b = bytes[k];
        if escaped {
            escaped = false;
        } else if let Some(q) = quote {
            match b {
                b'\\' => escaped = true,
                _ if b == q => quote = None,
                _ => {}
            }
        } else {
            match b {
                b'"' | b'\'' => quote = Some(b),
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(k);
                    }
                }
                _ => {}
            }
        }
        k += 1;
    }
    None
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Offsets of every `^` in the document not covered by any discovered tag
/// span. Each is reported individually as an unclosed/stray caret.
#[allow(clippy::cast_possible_truncation)]
pub fn stray_carets(text: &str, tags: &[Tag]) -> Vec<u32> {
    text.bytes()
        .enumerate()
        .filter(|&(i, b)| b == b'^' && !tags.iter().any(|t| t.span.contains(i as u32)))
        .map(|(i, _)| i as u32)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;

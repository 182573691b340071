//! Containment tree over discovered tags.
//!
//! Tags nest by offset containment: a child's span lies fully inside its
//! parent's content span. The tree makes that nesting explicit so that
//! validation of a parent's argument can skip child spans by projection
//! instead of blanking characters out of a copied string.

use acode_ir::Span;

use crate::Tag;

/// One node of the tag containment tree.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct TagNode {
    pub tag: Tag,
    pub children: Vec<TagNode>,
}

impl TagNode {
    /// Sub-spans of this tag's content not covered by any child tag.
    ///
    /// Empty segments are dropped. For a tag without arguments, or whose
    /// argument is entirely child tags, the result is empty.
    pub fn content_segments(&self) -> Vec<Span> {
        let Some(content) = self.tag.content else {
            return Vec::new();
        };
        let mut segments = Vec::new();
        let mut cursor = content.start;
        for child in &self.children {
            if child.tag.span.start > cursor {
                segments.push(Span::new(cursor, child.tag.span.start));
            }
            cursor = child.tag.span.end;
        }
        if cursor < content.end {
            segments.push(Span::new(cursor, content.end));
        }
        segments
    }

    /// The argument text with child tag spans projected away, for handing
    /// to the expression validator.
    pub fn projected_content(&self, source: &str) -> String {
        self.content_segments()
            .iter()
            .map(|s| &source[s.to_range()])
            .collect()
    }
}

/// Build the containment forest from a flat tag list.
///
/// Expects the ordering produced by [`parse_tags`](crate::parse_tags):
/// by start offset, outermost first at equal starts.
pub fn build_tree(tags: &[Tag]) -> Vec<TagNode> {
    let mut roots: Vec<TagNode> = Vec::new();
    for tag in tags {
        let node = TagNode {
            tag: tag.clone(),
            children: Vec::new(),
        };
        insert(&mut roots, node);
    }
    roots
}

/// Insert `node` as deep as containment allows, iteratively.
///
/// Because the input is ordered by start offset, a node can only nest
/// inside the most recently inserted sibling at each level. The walk is
/// a loop rather than recursion so nesting depth is not stack-bounded.
fn insert(roots: &mut Vec<TagNode>, node: TagNode) {
    let mut level = roots;
    loop {
        let descend = level.last().is_some_and(|last| {
            last.tag
                .content
                .is_some_and(|c| c.contains_span(node.tag.span))
        });
        if !descend {
            level.push(node);
            return;
        }
        let idx = level.len() - 1;
        level = &mut level[idx].children;
    }
}

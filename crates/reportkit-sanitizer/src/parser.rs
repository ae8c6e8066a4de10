//! Fragment parsing.
//!
//! The fragment is placed inside a minimal document shell that declares
//! UTF-8 explicitly and wraps the content in a `div` with a reserved id.
//! After tokenizing and tree building, that `div` is looked up by id and
//! handed to the sanitizer as the fragment root.
//!
//! ## Tree Construction
//!
//! - Void elements never take children.
//! - An end tag closes the nearest open element with the same name, popping
//!   everything above it; with no such element open it is ignored.
//! - There are no implied end tags, so the serializer's output re-parses to
//!   an identical tree.
//! - The wrapper fences the stack of open elements: nothing in the fragment
//!   can close the wrapper or the shell around it.
//!
//! Parsing never fails; unmatched and malformed markup is absorbed.

use std::collections::HashMap;

use crate::dom::{Attribute, Document, NodeId, NodeKind};
use crate::tokenizer::{Token, Tokenizer};

/// Reserved id of the wrapper element.
pub const WRAPPER_ID: &str = "sanitizer-root";

/// Shell placed in front of every fragment. End tags are implied at EOF.
const SHELL_PREFIX: &str = concat!(
    "<!DOCTYPE html><html><head><meta charset=\"utf-8\"></head><body>",
    "<div id=\"sanitizer-root\">"
);

/// Elements that never have content.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// A parsed fragment and the handle of its wrapper element.
#[derive(Debug)]
pub struct Fragment {
    pub document: Document,
    pub root: NodeId,
}

/// Parse `input` inside the document shell.
///
/// Returns `None` if the wrapper element cannot be found afterwards.
pub fn parse_fragment(input: &str) -> Option<Fragment> {
    let mut source = String::with_capacity(SHELL_PREFIX.len() + input.len());
    source.push_str(SHELL_PREFIX);
    source.push_str(input);

    let document = TreeBuilder::new().build(Tokenizer::new(&source));
    let root = document.element_by_id(WRAPPER_ID)?;
    Some(Fragment { document, root })
}

/// Stack-of-open-elements tree builder.
struct TreeBuilder {
    document: Document,
    open: Vec<NodeId>,
    /// Count of open elements per tag name above the fence.
    open_counts: HashMap<String, usize>,
    /// Elements at indices below this can never be popped.
    fence: usize,
    fenced: bool,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            document: Document::new(),
            open: vec![Document::ROOT],
            open_counts: HashMap::new(),
            fence: 1,
            fenced: false,
        }
    }

    fn current(&self) -> NodeId {
        self.open.last().copied().unwrap_or(Document::ROOT)
    }

    fn build(mut self, tokens: impl Iterator<Item = Token>) -> Document {
        for token in tokens {
            match token {
                Token::StartTag {
                    name, attributes, ..
                } => self.start_tag(name, attributes),
                Token::EndTag { name } => self.end_tag(&name),
                Token::Text(text) => {
                    self.insert(NodeKind::Text(text));
                }
                Token::Comment(text) => {
                    self.insert(NodeKind::Comment(text));
                }
                Token::Doctype => {}
            }
        }
        self.document
    }

    fn insert(&mut self, kind: NodeKind) -> NodeId {
        let parent = self.current();
        let node = self.document.create(kind);
        self.document.append(parent, node);
        node
    }

    fn start_tag(&mut self, name: String, attributes: Vec<Attribute>) {
        let wraps = !self.fenced
            && attributes
                .iter()
                .any(|a| a.name == "id" && a.value == WRAPPER_ID);
        let void = is_void(&name);

        let node = self.insert(NodeKind::Element {
            tag: name.clone(),
            attributes,
        });
        if void {
            return;
        }

        self.open.push(node);
        if wraps {
            self.fenced = true;
            self.fence = self.open.len();
            self.open_counts.clear();
        } else {
            *self.open_counts.entry(name).or_default() += 1;
        }
    }

    fn end_tag(&mut self, name: &str) {
        if self.open_counts.get(name).copied().unwrap_or(0) == 0 {
            return;
        }
        while self.open.len() > self.fence {
            let Some(node) = self.open.pop() else { break };
            let Some(tag) = self.document.tag(node).map(str::to_string) else {
                continue;
            };
            if let Some(count) = self.open_counts.get_mut(&tag) {
                *count = count.saturating_sub(1);
            }
            if tag == name {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Compact tree dump: elements as `tag(children)`, text quoted.
    fn dump(document: &Document, node: NodeId) -> String {
        document
            .children(node)
            .iter()
            .map(|&child| match document.kind(child) {
                NodeKind::Element { tag, .. } => format!("{}({})", tag, dump(document, child)),
                NodeKind::Text(text) => format!("{:?}", text),
                NodeKind::Comment(text) => format!("#{}", text),
                NodeKind::Document => "doc".to_string(),
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    fn parse(input: &str) -> String {
        let fragment = parse_fragment(input).unwrap();
        dump(&fragment.document, fragment.root)
    }

    #[test]
    fn test_wrapper_located() {
        let fragment = parse_fragment("<p>x</p>").unwrap();
        assert_eq!(fragment.document.tag(fragment.root), Some("div"));
    }

    #[test]
    fn test_empty_fragment() {
        assert_eq!(parse(""), "");
    }

    #[test]
    fn test_nesting() {
        assert_eq!(
            parse("<p>a<b>b</b>c</p>"),
            r#"p("a",b("b"),"c")"#
        );
    }

    #[test]
    fn test_void_elements() {
        assert_eq!(parse("a<br>b<img src=x>c"), r#""a",br(),"b",img(),"c""#);
    }

    #[test]
    fn test_unclosed_elements_close_at_end() {
        assert_eq!(parse("<ul><li>one<li>two"), r#"ul(li("one",li("two")))"#);
    }

    #[test]
    fn test_misnested_end_tags() {
        // </b> pops the open <i> along with it
        assert_eq!(parse("<b><i>x</b>y</i>"), r#"b(i("x")),"y""#);
    }

    #[test]
    fn test_stray_end_tags_ignored() {
        assert_eq!(parse("a</p>b</span>"), r#""ab""#);
    }

    #[test]
    fn test_fragment_cannot_close_wrapper() {
        assert_eq!(
            parse("<p>a</p></div></body></html><p>b</p>"),
            r#"p("a"),p("b")"#
        );
    }

    #[test]
    fn test_spoofed_wrapper_id_is_content() {
        let fragment = parse_fragment("<div id=\"sanitizer-root\">x</div>").unwrap();
        let children = fragment.document.children(fragment.root);
        assert_eq!(children.len(), 1);
        assert_eq!(fragment.document.tag(children[0]), Some("div"));
    }

    #[test]
    fn test_comments_kept_as_nodes() {
        assert_eq!(parse("<!--c--><p>t</p>"), r#"#c,p("t")"#);
    }

    #[test]
    fn test_self_closing_non_void_stays_open() {
        assert_eq!(parse("<span/>x"), r#"span("x")"#);
    }

    #[test]
    fn test_deep_nesting() {
        let input = "<b>".repeat(50_000) + "x";
        let fragment = parse_fragment(&input).unwrap();
        let mut node = fragment.root;
        let mut depth = 0;
        while let Some(&child) = fragment.document.children(node).first() {
            node = child;
            depth += 1;
        }
        assert_eq!(depth, 50_001);
    }
}

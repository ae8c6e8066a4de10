//! Canonical HTML serialization.
//!
//! Output is fully determined by the tree:
//!
//! - attribute values are always double-quoted, with `&`, `"`, `<` and `>`
//!   escaped
//! - text escapes `&`, `<` and `>`
//! - void elements are written without an end tag, every other element
//!   always gets one
//!
//! Because every `<` in text and attribute values is escaped, no serialized
//! text can be re-read as markup.

use crate::dom::{Document, NodeId, NodeKind};
use crate::parser::is_void;

enum Step {
    Open(NodeId),
    Close(NodeId),
}

/// Serialize the children of `node`, in order. `node` itself is not written.
pub fn serialize_children(document: &Document, node: NodeId) -> String {
    let mut out = String::new();
    let mut steps: Vec<Step> = document
        .children(node)
        .iter()
        .rev()
        .map(|&child| Step::Open(child))
        .collect();

    while let Some(step) = steps.pop() {
        match step {
            Step::Open(id) => match document.kind(id) {
                NodeKind::Text(text) => escape_into(&mut out, text, false),
                NodeKind::Comment(text) => {
                    out.push_str("<!--");
                    out.push_str(text);
                    out.push_str("-->");
                }
                NodeKind::Element { tag, attributes } => {
                    out.push('<');
                    out.push_str(tag);
                    for attribute in attributes {
                        out.push(' ');
                        out.push_str(&attribute.name);
                        out.push_str("=\"");
                        escape_into(&mut out, &attribute.value, true);
                        out.push('"');
                    }
                    out.push('>');
                    if is_void(tag) {
                        continue;
                    }
                    steps.push(Step::Close(id));
                    steps.extend(document.children(id).iter().rev().map(|&c| Step::Open(c)));
                }
                NodeKind::Document => {
                    steps.extend(document.children(id).iter().rev().map(|&c| Step::Open(c)));
                }
            },
            Step::Close(id) => {
                if let Some(tag) = document.tag(id) {
                    out.push_str("</");
                    out.push_str(tag);
                    out.push('>');
                }
            }
        }
    }

    out
}

fn escape_into(out: &mut String, value: &str, attribute: bool) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Attribute;

    fn element(document: &mut Document, parent: NodeId, tag: &str, attributes: Vec<Attribute>) -> NodeId {
        let node = document.create(NodeKind::Element {
            tag: tag.to_string(),
            attributes,
        });
        document.append(parent, node);
        node
    }

    fn text(document: &mut Document, parent: NodeId, value: &str) {
        let node = document.create(NodeKind::Text(value.to_string()));
        document.append(parent, node);
    }

    #[test]
    fn test_nested_elements() {
        let mut doc = Document::new();
        let p = element(&mut doc, Document::ROOT, "p", vec![]);
        text(&mut doc, p, "a");
        let b = element(&mut doc, p, "b", vec![]);
        text(&mut doc, b, "b");
        assert_eq!(serialize_children(&doc, Document::ROOT), "<p>a<b>b</b></p>");
    }

    #[test]
    fn test_text_escaping() {
        let mut doc = Document::new();
        text(&mut doc, Document::ROOT, "1 < 2 && \"q\" > 0");
        assert_eq!(
            serialize_children(&doc, Document::ROOT),
            "1 &lt; 2 &amp;&amp; \"q\" &gt; 0"
        );
    }

    #[test]
    fn test_attribute_escaping() {
        let mut doc = Document::new();
        element(
            &mut doc,
            Document::ROOT,
            "span",
            vec![Attribute::new("class", "a\"b<c>&d'e")],
        );
        assert_eq!(
            serialize_children(&doc, Document::ROOT),
            "<span class=\"a&quot;b&lt;c&gt;&amp;d'e\"></span>"
        );
    }

    #[test]
    fn test_void_and_empty_elements() {
        let mut doc = Document::new();
        element(&mut doc, Document::ROOT, "br", vec![]);
        element(&mut doc, Document::ROOT, "img", vec![Attribute::new("alt", "")]);
        element(&mut doc, Document::ROOT, "p", vec![]);
        assert_eq!(
            serialize_children(&doc, Document::ROOT),
            "<br><img alt=\"\"><p></p>"
        );
    }

    #[test]
    fn test_deep_tree() {
        let mut doc = Document::new();
        let mut parent = Document::ROOT;
        for _ in 0..100_000 {
            parent = element(&mut doc, parent, "b", vec![]);
        }
        let out = serialize_children(&doc, Document::ROOT);
        assert_eq!(out.len(), 100_000 * "<b></b>".len());
        assert!(out.starts_with("<b><b>"));
        assert!(out.ends_with("</b></b>"));
    }
}

//! # Tree Sanitizer
//!
//! Walks the parsed fragment and enforces the policy on every node.
//!
//! | Node | Action |
//! |------|--------|
//! | Comment | Removed |
//! | Dangerous element | Removed with its subtree |
//! | Element not on the allowlist | Unwrapped; its children take its place and are checked in turn |
//! | Allowed element | Attributes filtered, children checked |
//! | Text | Kept as is (escaped at serialization) |
//!
//! ## Traversal
//!
//! The walk uses an explicit work stack, so nesting depth is bounded only by
//! memory. For each visited parent the child list is taken out of the arena
//! and rebuilt in a single pass: removed nodes are skipped, unwrapped nodes
//! are replaced in place by their own children, and the rebuilt list is put
//! back. Removal and unwrapping therefore cost O(children), and the whole
//! walk is linear in the number of nodes.
//!
//! ## Attributes
//!
//! The attribute list of an allowed element is taken as a snapshot and
//! rebuilt. An attribute is dropped if its name starts with `on`, if the
//! policy does not permit it on the tag, if it is `href`/`src` with a
//! script-capable scheme, or if its value carries a script URL or CSS
//! expression anywhere. A link with `target="_blank"` and no `rel` then gets
//! `rel="noopener noreferrer"`.

use tracing::trace;

use crate::dom::{Attribute, Document, NodeId, NodeKind};
use crate::policy::Policy;
use crate::report::SanitizeReport;
use crate::safety;

/// Value injected on `target="_blank"` links without `rel`.
pub const NOOPENER_REL: &str = "noopener noreferrer";

/// Why an attribute was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    EventHandler,
    NotAllowed,
    UnsafeUrl,
    UnsafeValue,
}

/// What to do with one node.
enum Action {
    Keep,
    Descend,
    Unwrap,
    RemoveElement,
    RemoveComment,
}

/// Enforces a [`Policy`] on a parsed tree in place.
pub struct TreeSanitizer<'p> {
    policy: &'p Policy,
}

impl<'p> TreeSanitizer<'p> {
    pub fn new(policy: &'p Policy) -> Self {
        Self { policy }
    }

    /// Sanitize every descendant of `root`. `root` itself is left alone.
    pub fn sanitize(&self, document: &mut Document, root: NodeId, report: &mut SanitizeReport) {
        let mut parents = vec![root];

        while let Some(parent) = parents.pop() {
            let mut pending = document.take_children(parent);
            pending.reverse();
            let mut kept = Vec::with_capacity(pending.len());

            while let Some(node) = pending.pop() {
                match self.classify(document.kind(node)) {
                    Action::Keep => kept.push(node),
                    Action::Descend => {
                        self.sanitize_attributes(document, node, report);
                        kept.push(node);
                        parents.push(node);
                    }
                    Action::Unwrap => {
                        let promoted = document.take_children(node);
                        document.orphan(node);
                        pending.extend(promoted.into_iter().rev());
                        report.unwrapped_elements += 1;
                    }
                    Action::RemoveElement => {
                        document.orphan(node);
                        report.removed_elements += 1;
                    }
                    Action::RemoveComment => {
                        document.orphan(node);
                        report.removed_comments += 1;
                    }
                }
            }

            document.set_children(parent, kept);
        }
    }

    fn classify(&self, kind: &NodeKind) -> Action {
        match kind {
            NodeKind::Text(_) => Action::Keep,
            NodeKind::Comment(_) => Action::RemoveComment,
            NodeKind::Element { tag, .. } if self.policy.is_dangerous(tag) => {
                Action::RemoveElement
            }
            NodeKind::Element { tag, .. } if self.policy.is_allowed(tag) => Action::Descend,
            NodeKind::Element { .. } => Action::Unwrap,
            // A nested document node cannot come out of the parser
            NodeKind::Document => Action::RemoveElement,
        }
    }

    fn sanitize_attributes(&self, document: &mut Document, node: NodeId, report: &mut SanitizeReport) {
        let NodeKind::Element { tag, attributes } = document.kind_mut(node) else {
            return;
        };

        let snapshot = std::mem::take(attributes);
        let mut kept = Vec::with_capacity(snapshot.len());
        for attribute in snapshot {
            match self.reject(tag, &attribute) {
                Some(reason) => {
                    trace!(tag = %tag, attribute = %attribute.name, ?reason, "attribute stripped");
                    report.stripped_attributes += 1;
                }
                None => kept.push(attribute),
            }
        }

        let blank_target = kept
            .iter()
            .any(|a| a.name == "target" && a.value.eq_ignore_ascii_case("_blank"));
        if tag == "a" && blank_target && !kept.iter().any(|a| a.name == "rel") {
            kept.push(Attribute::new("rel", NOOPENER_REL));
            report.injected_rel += 1;
        }

        *attributes = kept;
    }

    fn reject(&self, tag: &str, attribute: &Attribute) -> Option<Rejection> {
        let name = attribute.name.as_str();
        let value = attribute.value.as_str();

        if name.len() >= 2 && name.as_bytes()[..2].eq_ignore_ascii_case(b"on") {
            return Some(Rejection::EventHandler);
        }
        if !self.policy.permits_attribute(tag, name) {
            return Some(Rejection::NotAllowed);
        }
        if (name == "href" || name == "src") && safety::is_unsafe_url(value) {
            return Some(Rejection::UnsafeUrl);
        }
        if safety::has_unsafe_value(value) {
            return Some(Rejection::UnsafeValue);
        }
        None
    }
}

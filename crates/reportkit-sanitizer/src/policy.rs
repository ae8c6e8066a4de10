//! # Allowlist Policy
//!
//! The policy decides, for every element and attribute, whether it survives
//! sanitization. Anything not explicitly listed is rejected.
//!
//! ## Element Classes
//!
//! | Class | Treatment |
//! |-------|-----------|
//! | Allowed | Kept; attributes filtered |
//! | Dangerous | Removed together with everything inside it |
//! | Anything else | Unwrapped: tag dropped, children kept |
//!
//! A tag listed as both allowed and dangerous is treated as dangerous.
//!
//! ## Thread Safety
//!
//! A [`Policy`] has no mutating methods. Build it once and share it freely.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Result, SanitizeError};

/// Tags that may remain as elements under the default policy.
pub const DEFAULT_ALLOWED_TAGS: &[&str] = &[
    "a",
    "abbr",
    "b",
    "blockquote",
    "br",
    "code",
    "div",
    "em",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "hr",
    "i",
    "img",
    "li",
    "ol",
    "p",
    "span",
    "strong",
    "table",
    "tbody",
    "td",
    "th",
    "thead",
    "tr",
    "u",
    "ul",
];

/// Tags removed with their content under the default policy.
///
/// Script-bearing, resource-loading and interactive form elements, plus raw
/// style/meta/base elements.
pub const DEFAULT_DANGEROUS_TAGS: &[&str] = &[
    "script", "style", "iframe", "frame", "frameset", "object", "embed", "applet", "form",
    "input", "button", "select", "textarea", "link", "meta", "base", "svg", "math", "template",
    "noscript",
];

/// Per-tag attribute allowlist under the default policy.
pub const DEFAULT_ALLOWED_ATTRIBUTES: &[(&str, &[&str])] = &[
    ("a", &["href", "title", "target", "rel"]),
    ("img", &["src", "alt", "title", "width", "height"]),
];

/// Attributes allowed on every allowed tag under the default policy.
pub const DEFAULT_GLOBAL_ATTRIBUTES: &[&str] = &["class"];

/// Immutable allowlist configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    allowed_tags: BTreeSet<String>,
    dangerous_tags: BTreeSet<String>,
    allowed_attributes: BTreeMap<String, BTreeSet<String>>,
    global_attributes: BTreeSet<String>,
}

impl Policy {
    /// Build a custom policy.
    ///
    /// Names are lowercased. Every name must be non-empty and consist of
    /// ASCII alphanumerics or `-`.
    ///
    /// # Errors
    ///
    /// Returns [`SanitizeError::InvalidPolicy`] for an unusable name.
    pub fn new(
        allowed_tags: &[&str],
        dangerous_tags: &[&str],
        allowed_attributes: &[(&str, &[&str])],
        global_attributes: &[&str],
    ) -> Result<Self> {
        let mut attributes: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (tag, names) in allowed_attributes {
            let entry = attributes.entry(normalize_name(tag)?).or_default();
            for name in *names {
                entry.insert(normalize_name(name)?);
            }
        }

        Ok(Self {
            allowed_tags: collect_names(allowed_tags)?,
            dangerous_tags: collect_names(dangerous_tags)?,
            allowed_attributes: attributes,
            global_attributes: collect_names(global_attributes)?,
        })
    }

    /// Returns true if `tag` must be removed along with its subtree.
    pub fn is_dangerous(&self, tag: &str) -> bool {
        self.dangerous_tags.contains(tag)
    }

    /// Returns true if `tag` may remain as an element.
    pub fn is_allowed(&self, tag: &str) -> bool {
        self.allowed_tags.contains(tag) && !self.is_dangerous(tag)
    }

    /// Returns true if attribute `name` may appear on `tag`.
    pub fn permits_attribute(&self, tag: &str, name: &str) -> bool {
        self.global_attributes.contains(name)
            || self
                .allowed_attributes
                .get(tag)
                .is_some_and(|names| names.contains(name))
    }

    /// Dangerous tag names in lexical order.
    pub fn dangerous_tags(&self) -> impl Iterator<Item = &str> {
        self.dangerous_tags.iter().map(String::as_str)
    }

    /// Allowed tag names in lexical order.
    pub fn allowed_tags(&self) -> impl Iterator<Item = &str> {
        self.allowed_tags.iter().map(String::as_str)
    }
}

impl Default for Policy {
    fn default() -> Self {
        let set = |names: &[&str]| names.iter().map(|n| n.to_string()).collect();
        Self {
            allowed_tags: set(DEFAULT_ALLOWED_TAGS),
            dangerous_tags: set(DEFAULT_DANGEROUS_TAGS),
            allowed_attributes: DEFAULT_ALLOWED_ATTRIBUTES
                .iter()
                .map(|(tag, names)| (tag.to_string(), set(names)))
                .collect(),
            global_attributes: set(DEFAULT_GLOBAL_ATTRIBUTES),
        }
    }
}

fn collect_names(names: &[&str]) -> Result<BTreeSet<String>> {
    names.iter().map(|n| normalize_name(n)).collect()
}

fn normalize_name(name: &str) -> Result<String> {
    let valid = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-');
    if !valid {
        return Err(SanitizeError::InvalidPolicy(format!(
            "invalid name {:?}",
            name
        )));
    }
    Ok(name.to_ascii_lowercase())
}

//! # Attribute Value Safety Checks
//!
//! Browsers ignore ASCII tabs and newlines inside a URL scheme and skip
//! leading control characters, so `jav\tascript:` still runs script. Both
//! checks below first normalize the value by dropping every whitespace and
//! ASCII control character and lowercasing the rest, then match against the
//! normalized form.
//!
//! | Check | Applies to | Rejects |
//! |-------|------------|---------|
//! | [`is_unsafe_url`] | `href`, `src` | `javascript:`, `data:`, `vbscript:` prefix |
//! | [`has_unsafe_value`] | every attribute | `javascript:` or `expression(` anywhere |
//!
//! Character references are decoded by the tokenizer before these checks
//! run, so `jav&#9;ascript:` arrives here as `jav\tascript:`.

/// URL schemes that execute script or embed inline content.
const UNSAFE_SCHEMES: &[&str] = &["javascript:", "data:", "vbscript:"];

/// Substrings rejected anywhere in an attribute value.
const UNSAFE_PATTERNS: &[&str] = &["javascript:", "expression("];

/// Strip Unicode whitespace and ASCII control characters, then lowercase.
pub fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_ascii_control())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Returns true if the value resolves to a script-capable URL scheme.
pub fn is_unsafe_url(value: &str) -> bool {
    let normalized = normalize(value);
    UNSAFE_SCHEMES
        .iter()
        .any(|scheme| normalized.starts_with(scheme))
}

/// Returns true if the value carries a script URL or CSS expression anywhere.
pub fn has_unsafe_value(value: &str) -> bool {
    let normalized = normalize(value);
    UNSAFE_PATTERNS
        .iter()
        .any(|pattern| normalized.contains(pattern))
}

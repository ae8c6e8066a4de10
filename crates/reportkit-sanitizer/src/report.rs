//! Per-call sanitization statistics.

use serde::{Deserialize, Serialize};

/// What a single sanitize call removed or changed.
///
/// Counters are informational; they feed debug logging and let callers
/// notice when a submission was altered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizeReport {
    /// Bytes removed by the prefilter before parsing.
    pub prefiltered_bytes: usize,
    /// Dangerous elements removed together with their subtree.
    pub removed_elements: usize,
    /// Disallowed elements replaced by their children.
    pub unwrapped_elements: usize,
    /// Comment nodes removed.
    pub removed_comments: usize,
    /// Attributes dropped from allowed elements.
    pub stripped_attributes: usize,
    /// `rel="noopener noreferrer"` attributes added to `target="_blank"` links.
    pub injected_rel: usize,
}

impl SanitizeReport {
    /// Returns true if the input passed through without any change.
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

//! # Dangerous Tag Prefilter
//!
//! A string-level pass that removes dangerous tags before the fragment is
//! parsed. It exists so that content of a script-bearing or interactive
//! element never reaches the tree builder, where broken markup could be
//! reinterpreted. The tree sanitizer re-checks every element afterwards, so
//! nothing here is load-bearing on its own.
//!
//! ## Passes
//!
//! 1. **Paired removal** - each opening dangerous tag is removed together with
//!    everything up to the next closing tag of the same name. An opening tag
//!    with no closing tag is removed on its own.
//! 2. **Stray removal** - any remaining opening, closing or self-closing
//!    dangerous tag is removed.
//!
//! Matching is case-insensitive and tolerates whitespace after `<` and `</`,
//! attributes, and `/` separators (`<script/src=x>`).
//!
//! ## Complexity
//!
//! All patterns run on the `regex` crate's automata, which have no
//! backtracking and search in linear time. Closing-tag lookups are memoized
//! per tag, so a long run of unclosed openers does not rescan the tail of the
//! input for each one.
//!
//! ## Known Limitation
//!
//! Pairing is shortest-match. In `<script><script>a</script>b</script>` the
//! outer opener pairs with the first closer, `b` survives as plain text and
//! the trailing closer is stripped as a stray.
//!
//! Each pass runs once, so removing an inner tag can join the text around it
//! into a new dangerous tag: `<scr<scr<script>ipt>ipt>x` leaves this pass as
//! `<script>x`. Such tags are left to the tree sanitizer, which removes the
//! element and its content.

use std::collections::{BTreeMap, HashMap};
use std::ops::Range;

use regex::Regex;

use crate::error::Result;
use crate::policy::Policy;

/// Compiled prefilter for one policy's dangerous tag set.
#[derive(Debug, Clone)]
pub struct Prefilter {
    /// `None` when the policy has no dangerous tags.
    patterns: Option<Patterns>,
}

#[derive(Debug, Clone)]
struct Patterns {
    open: Regex,
    stray: Regex,
    close: BTreeMap<String, Regex>,
}

impl Prefilter {
    /// Compile the prefilter patterns for `policy`.
    ///
    /// A policy without dangerous tags yields a prefilter that never matches.
    pub fn new(policy: &Policy) -> Result<Self> {
        let names: Vec<String> = policy.dangerous_tags().map(regex::escape).collect();
        if names.is_empty() {
            return Ok(Self { patterns: None });
        }
        let alternation = names.join("|");

        let open = Regex::new(&format!(r"(?i)<\s*({})(?:[\s/][^>]*)?>", alternation))?;
        let stray = Regex::new(&format!(r"(?i)<\s*/?\s*(?:{})(?:[\s/][^>]*)?>", alternation))?;

        let mut close = BTreeMap::new();
        for name in policy.dangerous_tags() {
            let pattern = format!(r"(?i)<\s*/\s*{}(?:[\s/][^>]*)?>", regex::escape(name));
            close.insert(name.to_string(), Regex::new(&pattern)?);
        }

        Ok(Self {
            patterns: Some(Patterns { open, stray, close }),
        })
    }

    /// Remove dangerous tags (and paired content) from `input`.
    pub fn strip(&self, input: &str) -> String {
        match &self.patterns {
            Some(patterns) => patterns.strip(input),
            None => input.to_string(),
        }
    }
}

impl Patterns {
    fn strip(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut copied = 0;
        let mut closes = CloseCache::default();

        while let Some(caps) = self.open.captures_at(input, copied) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                break;
            };
            out.push_str(&input[copied..whole.start()]);

            let name = name.as_str().to_lowercase();
            copied = match self.find_close(&name, input, whole.end(), &mut closes) {
                Some(close) => close.end,
                None => whole.end(),
            };
        }
        out.push_str(&input[copied..]);

        self.stray.replace_all(&out, "").into_owned()
    }

    /// First closing tag for `name` at or after `from`.
    fn find_close(
        &self,
        name: &str,
        input: &str,
        from: usize,
        cache: &mut CloseCache,
    ) -> Option<Range<usize>> {
        let regex = self.close.get(name)?;

        match cache.next.get(name) {
            // No closer exists after an earlier position, so none after this one
            Some(None) => return None,
            Some(Some(hit)) if hit.start >= from => return Some(hit.clone()),
            _ => {}
        }

        let hit = regex.find_at(input, from).map(|m| m.range());
        cache.next.insert(name.to_string(), hit.clone());
        hit
    }
}

/// Memoized closing-tag positions, keyed by tag name.
#[derive(Default)]
struct CloseCache {
    next: HashMap<String, Option<Range<usize>>>,
}

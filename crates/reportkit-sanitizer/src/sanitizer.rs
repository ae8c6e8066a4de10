//! Sanitizer facade
//!
//! Chains the prefilter, fragment parser, tree sanitizer and serializer
//! behind one reusable value.

use tracing::{debug, warn};

use crate::config::SanitizerConfig;
use crate::error::{Result, SanitizeError};
use crate::parser::parse_fragment;
use crate::policy::Policy;
use crate::prefilter::Prefilter;
use crate::report::SanitizeReport;
use crate::serializer::serialize_children;
use crate::tree::TreeSanitizer;

/// Allowlist HTML sanitizer.
///
/// Immutable after construction; share it behind an `Arc` to use it from
/// several threads. Each call builds and drops its own tree.
#[derive(Debug, Clone)]
pub struct HtmlSanitizer {
    policy: Policy,
    prefilter: Prefilter,
    config: SanitizerConfig,
}

impl HtmlSanitizer {
    /// Create a sanitizer for `policy`, compiling its prefilter patterns.
    pub fn new(policy: Policy, config: SanitizerConfig) -> Result<Self> {
        let prefilter = Prefilter::new(&policy)?;
        Ok(Self {
            policy,
            prefilter,
            config,
        })
    }

    /// Create a sanitizer with the built-in policy and default limits.
    pub fn with_defaults() -> Self {
        Self::new(Policy::default(), SanitizerConfig::default())
            .expect("built-in policy compiles")
    }

    /// Create a sanitizer with the built-in policy and custom limits.
    pub fn with_config(config: SanitizerConfig) -> Self {
        Self {
            config,
            ..Self::with_defaults()
        }
    }

    /// The allowlist this sanitizer enforces.
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Limits applied to each fragment, e.g. the maximum input size.
    pub fn config(&self) -> &SanitizerConfig {
        &self.config
    }

    /// Sanitize an HTML fragment.
    ///
    /// Never fails: input that cannot be processed yields an empty string,
    /// never the raw input.
    pub fn sanitize(&self, raw_html: &str) -> String {
        match self.try_sanitize(raw_html) {
            Ok(html) => html,
            Err(e) => {
                warn!(error = %e, "HTML fragment rejected");
                String::new()
            }
        }
    }

    /// Sanitize an optional fragment; `None` yields an empty string.
    pub fn sanitize_opt(&self, raw_html: Option<&str>) -> String {
        raw_html.map(|html| self.sanitize(html)).unwrap_or_default()
    }

    /// Sanitize an HTML fragment, reporting oversized input as an error.
    pub fn try_sanitize(&self, raw_html: &str) -> Result<String> {
        self.sanitize_with_report(raw_html).map(|(html, _)| html)
    }

    /// Sanitize an HTML fragment and return what was removed.
    pub fn sanitize_with_report(&self, raw_html: &str) -> Result<(String, SanitizeReport)> {
        let mut report = SanitizeReport::default();
        if raw_html.is_empty() {
            return Ok((String::new(), report));
        }

        let max = self.config.max_input_bytes;
        if raw_html.len() > max {
            return Err(SanitizeError::TooLarge {
                size: raw_html.len(),
                max,
            });
        }

        let filtered = self.prefilter.strip(raw_html);
        report.prefiltered_bytes = raw_html.len().saturating_sub(filtered.len());

        let Some(mut fragment) = parse_fragment(&filtered) else {
            warn!("Sanitizer wrapper missing after parse, discarding fragment");
            return Ok((String::new(), report));
        };

        TreeSanitizer::new(&self.policy).sanitize(&mut fragment.document, fragment.root, &mut report);
        let html = serialize_children(&fragment.document, fragment.root);

        debug!(
            input_bytes = raw_html.len(),
            output_bytes = html.len(),
            prefiltered_bytes = report.prefiltered_bytes,
            removed_elements = report.removed_elements,
            unwrapped_elements = report.unwrapped_elements,
            removed_comments = report.removed_comments,
            stripped_attributes = report.stripped_attributes,
            injected_rel = report.injected_rel,
            "HTML fragment sanitized"
        );

        Ok((html, report))
    }
}

impl Default for HtmlSanitizer {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let sanitizer = HtmlSanitizer::with_defaults();
        assert_eq!(sanitizer.sanitize(""), "");
        assert_eq!(sanitizer.sanitize_opt(None), "");
        assert_eq!(sanitizer.sanitize_opt(Some("")), "");
    }

    #[test]
    fn test_plain_text_passes() {
        let sanitizer = HtmlSanitizer::with_defaults();
        assert_eq!(sanitizer.sanitize("Quarterly update"), "Quarterly update");
        assert_eq!(sanitizer.sanitize("Q&A <3"), "Q&amp;A &lt;3");
    }

    #[test]
    fn test_oversized_input_rejected() {
        let sanitizer = HtmlSanitizer::with_config(SanitizerConfig::new().with_max_input_bytes(8));
        let err = sanitizer.try_sanitize("<p>123456</p>").unwrap_err();
        assert!(matches!(err, SanitizeError::TooLarge { size: 13, max: 8 }));
        assert_eq!(sanitizer.sanitize("<p>123456</p>"), "");
        assert_eq!(sanitizer.sanitize("<p>1</p>"), "<p>1</p>");
    }

    #[test]
    fn test_report_counts_prefilter() {
        let sanitizer = HtmlSanitizer::with_defaults();
        let (html, report) = sanitizer
            .sanitize_with_report("a<script>alert(1)</script>b")
            .unwrap();
        assert_eq!(html, "ab");
        assert_eq!(report.prefiltered_bytes, "<script>alert(1)</script>".len());
        assert_eq!(report.removed_elements, 0);
    }

    #[test]
    fn test_report_clean_for_safe_input() {
        let sanitizer = HtmlSanitizer::with_defaults();
        let (html, report) = sanitizer
            .sanitize_with_report("<ul><li>one</li><li>two</li></ul>")
            .unwrap();
        assert_eq!(html, "<ul><li>one</li><li>two</li></ul>");
        assert!(report.is_clean());
    }

    #[test]
    fn test_custom_policy() {
        let policy = Policy::new(&["p"], &["b"], &[], &["title"]).unwrap();
        let sanitizer = HtmlSanitizer::new(policy, SanitizerConfig::default()).unwrap();
        assert_eq!(
            sanitizer.sanitize("<p title=\"t\" class=\"c\">x<b>gone</b><i>y</i></p>"),
            "<p title=\"t\">xy</p>"
        );
        assert!(sanitizer.policy().is_allowed("p"));
        assert!(sanitizer.policy().is_dangerous("b"));
        assert_eq!(
            sanitizer.config().max_input_bytes,
            SanitizerConfig::default().max_input_bytes
        );
    }

    #[test]
    fn test_sanitizer_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HtmlSanitizer>();
    }
}

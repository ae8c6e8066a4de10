//! # Reportkit Sanitizer - Allowlist HTML Sanitization
//!
//! Report templates are edited as rich text and later re-injected verbatim
//! into generated HTML and PDF reports. This crate turns an untrusted HTML
//! fragment into markup that contains only allowlisted elements and
//! attributes, with no script-capable URLs, event handlers or CSS
//! expressions left.
//!
//! ## Threat Model
//!
//! | Threat | Example | Defense |
//! |--------|---------|---------|
//! | Script injection | `<script>`, `<iframe>`, `<svg onload>` | Prefilter + dangerous-tag removal |
//! | Event handlers | `<p onclick="...">` | `on*` attributes always dropped |
//! | Script URLs | `<a href="jav&#9;ascript:...">` | Decoded, normalized scheme check |
//! | CSS expressions | `class="expression(...)"` | Value pattern check |
//! | Markup smuggling | Unbalanced tags, comments, `</div>` escapes | Fenced parse + canonical serialization |
//! | Tab-nabbing | `target="_blank"` | `rel="noopener noreferrer"` injected |
//! | Resource exhaustion | Deep nesting, huge input | Iterative passes, size limit |
//!
//! ## Pipeline
//!
//! ```text
//! raw html
//!    │
//!    ▼
//! ┌───────────┐   ┌─────────────┐   ┌────────────────┐   ┌────────────┐
//! │ PREFILTER │──▶│  FRAGMENT   │──▶│ TREE SANITIZER │──▶│ SERIALIZER │──▶ safe html
//! │  (regex)  │   │   PARSER    │   │ Policy+Safety  │   │ canonical  │
//! └───────────┘   └─────────────┘   └────────────────┘   └────────────┘
//! ```
//!
//! Output is canonical: sanitizing already-sanitized markup returns it
//! unchanged.
//!
//! ## Usage
//!
//! ```rust
//! use reportkit_sanitizer::HtmlSanitizer;
//!
//! let sanitizer = HtmlSanitizer::with_defaults();
//!
//! let html = sanitizer.sanitize(r#"<p onclick="x" class="y">Hi<script>alert(1)</script></p>"#);
//! assert_eq!(html, r#"<p class="y">Hi</p>"#);
//!
//! let link = sanitizer.sanitize(r#"<a href="https://example.com" target="_blank">go</a>"#);
//! assert_eq!(
//!     link,
//!     r#"<a href="https://example.com" target="_blank" rel="noopener noreferrer">go</a>"#
//! );
//! ```

pub mod config;
pub mod dom;
pub mod entities;
pub mod error;
pub mod parser;
pub mod policy;
pub mod prefilter;
pub mod report;
pub mod safety;
pub mod sanitizer;
pub mod serializer;
pub mod tokenizer;
pub mod tree;

pub use config::SanitizerConfig;
pub use error::{Result, SanitizeError};
pub use policy::Policy;
pub use report::SanitizeReport;
pub use sanitizer::HtmlSanitizer;

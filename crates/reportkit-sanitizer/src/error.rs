//! Error types for the HTML sanitizer.
//!
//! Malformed markup is never an error: the parser recovers from anything.
//! The variants below cover resource limits and policy construction only.

use thiserror::Error;

/// Result type alias for sanitizer operations.
pub type Result<T> = std::result::Result<T, SanitizeError>;

/// Errors that can occur while building or running the sanitizer.
///
/// # Security Note
///
/// Callers that receive an error must not fall back to the raw input.
/// [`HtmlSanitizer::sanitize`](crate::HtmlSanitizer::sanitize) already maps
/// every error to an empty string.
#[derive(Debug, Error)]
pub enum SanitizeError {
    /// Input exceeds the configured maximum size.
    ///
    /// Oversized fragments are rejected before any parsing work is done.
    #[error("Content too large: {size} bytes (max: {max})")]
    TooLarge {
        /// Actual size of the content
        size: usize,
        /// Maximum allowed size
        max: usize,
    },

    /// A policy was built with an unusable tag or attribute name.
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    /// A prefilter pattern failed to compile.
    #[error("Prefilter pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

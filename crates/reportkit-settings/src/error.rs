//! Error types for the settings write path.

use thiserror::Error;

use crate::validate::ValidationIssue;

/// Result type alias for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

/// Settings operation errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The submitted form failed validation.
    #[error("{}", join_issues(.0))]
    Validation(Vec<ValidationIssue>),

    /// A record with this file name already exists.
    #[error("Settings for '{0}' already exist")]
    DuplicateFileName(String),

    /// No record with this file name.
    #[error("Settings for '{0}' not found")]
    NotFound(String),

    /// Delete requested without a file name.
    #[error("File name is required")]
    MissingFileName,

    /// Persistence backend failure.
    #[error("Settings store error: {0}")]
    Store(String),

    /// Sanitizer error passthrough.
    #[error("Sanitizer error: {0}")]
    Sanitizer(#[from] reportkit_sanitizer::SanitizeError),
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Store(e.to_string())
    }
}

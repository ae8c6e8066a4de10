//! # Reportkit Settings - Report Configuration Write Path
//!
//! Admin users save report configurations through a settings form. Three of
//! its fields are rich-text templates (report intro, stock block,
//! disclaimer) that are later injected into generated reports as HTML. This
//! crate owns the path from a raw submission to a stored record and makes
//! sure every template field passes through the
//! [`reportkit_sanitizer::HtmlSanitizer`] exactly once, before storage.
//!
//! ## Flow
//!
//! | Step | Type | Notes |
//! |------|------|-------|
//! | Submission | [`SettingsForm`] | Raw optional strings |
//! | Extraction | [`SettingsForm::extract`] | Trim, sanitize templates, parse states and data source |
//! | Validation | [`validate()`] | Required fields, API endpoint, stock count, custom templates not blank |
//! | Storage | [`SettingsStore`] | Keyed by file name; [`MemoryStore`] in process |
//!
//! Template fields are not sanitized again on read.
//!
//! ## Usage
//!
//! ```rust
//! use reportkit_settings::{Action, MemoryStore, SettingsConfig, SettingsForm, SettingsService};
//!
//! let service = SettingsService::new(MemoryStore::new(), SettingsConfig::default());
//!
//! let form = SettingsForm {
//!     file_name: Some("weekly".into()),
//!     report_title: Some("Weekly Movers".into()),
//!     api_placeholder: Some("stocks.csv".into()),
//!     report_intro_html: Some("<p onclick=\"x\">Hello</p>".into()),
//!     report_intro_html_state: Some("custom".into()),
//!     ..Default::default()
//! };
//!
//! let outcome = service.submit(&form, Action::Add).unwrap();
//! assert_eq!(outcome.message, "Settings added successfully");
//!
//! let stored = service.setting("weekly").unwrap().unwrap();
//! assert_eq!(stored.report_intro_html, "<p>Hello</p>");
//! ```

pub mod config;
pub mod error;
pub mod form;
pub mod model;
pub mod service;
pub mod store;
pub mod validate;

pub use config::SettingsConfig;
pub use error::{Result, SettingsError};
pub use form::SettingsForm;
pub use model::{
    resolve_field_states, ApiConfig, ApiFilters, DataSourceType, FieldState, ReportSetting,
    TemplateField,
};
pub use service::{Action, SettingsService, SubmissionOutcome};
pub use store::{MemoryStore, SettingsStore};
pub use validate::{validate, ValidationIssue};

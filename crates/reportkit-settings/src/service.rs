//! Settings submission service
//!
//! Ties form extraction, validation and the store together:
//!
//! ```text
//! SettingsForm ──extract (sanitize)──▶ ReportSetting ──validate──▶ store.add / store.update
//! ```

use std::fmt;
use std::str::FromStr;

use reportkit_sanitizer::HtmlSanitizer;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::SettingsConfig;
use crate::error::{Result, SettingsError};
use crate::form::SettingsForm;
use crate::model::ReportSetting;
use crate::store::SettingsStore;
use crate::validate::validate;

pub const ADDED_MESSAGE: &str = "Settings added successfully";
pub const UPDATED_MESSAGE: &str = "Settings updated successfully";
pub const DELETED_MESSAGE: &str = "Settings deleted successfully";

/// Requested settings operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    #[default]
    Add,
    Update,
    Delete,
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "add" => Ok(Self::Add),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            other => Err(format!("unknown settings action: {}", other)),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "add",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

/// Successful outcome of a settings request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionOutcome {
    pub message: String,
}

impl SubmissionOutcome {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Write path for report settings.
pub struct SettingsService<S> {
    store: S,
    sanitizer: HtmlSanitizer,
    config: SettingsConfig,
}

impl<S: SettingsStore> SettingsService<S> {
    pub fn new(store: S, config: SettingsConfig) -> Self {
        Self {
            sanitizer: HtmlSanitizer::with_config(config.sanitizer.clone()),
            store,
            config,
        }
    }

    /// Use an existing sanitizer, e.g. one with a custom policy.
    pub fn with_sanitizer(store: S, sanitizer: HtmlSanitizer, config: SettingsConfig) -> Self {
        Self {
            store,
            sanitizer,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn sanitizer(&self) -> &HtmlSanitizer {
        &self.sanitizer
    }

    pub fn settings(&self) -> Result<Vec<ReportSetting>> {
        self.store.all()
    }

    pub fn setting(&self, file_name: &str) -> Result<Option<ReportSetting>> {
        self.store.get(file_name)
    }

    /// Handle one form submission.
    ///
    /// `Add` and `Update` extract and validate the record before storing it.
    /// `Delete` removes the record named by the form's `file_name`.
    pub fn submit(&self, form: &SettingsForm, action: Action) -> Result<SubmissionOutcome> {
        if action == Action::Delete {
            return self.delete(form.file_name.as_deref().unwrap_or_default());
        }

        let setting = form.extract(&self.sanitizer, &self.config).map_err(|e| {
            warn!(error = %e, "Settings submission rejected");
            e
        })?;

        let issues = validate(&setting);
        if !issues.is_empty() {
            warn!(
                file_name = %setting.file_name,
                issues = issues.len(),
                "Settings submission rejected"
            );
            return Err(SettingsError::Validation(issues));
        }

        let file_name = setting.file_name.clone();
        match action {
            Action::Update => {
                let original = form
                    .original_file_name
                    .as_deref()
                    .unwrap_or(&file_name)
                    .to_string();
                self.store.update(&original, setting)?;
                info!(file_name = %file_name, original = %original, "Settings updated");
                Ok(SubmissionOutcome::new(UPDATED_MESSAGE))
            }
            _ => {
                self.store.add(setting)?;
                info!(file_name = %file_name, "Settings added");
                Ok(SubmissionOutcome::new(ADDED_MESSAGE))
            }
        }
    }

    /// Delete the record with this file name.
    pub fn delete(&self, file_name: &str) -> Result<SubmissionOutcome> {
        if file_name.is_empty() {
            return Err(SettingsError::MissingFileName);
        }
        self.store.delete(file_name)?;
        info!(file_name = %file_name, "Settings deleted");
        Ok(SubmissionOutcome::new(DELETED_MESSAGE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_action_parse() {
        assert_eq!("add".parse::<Action>().unwrap(), Action::Add);
        assert_eq!("update".parse::<Action>().unwrap(), Action::Update);
        assert_eq!("delete".parse::<Action>().unwrap(), Action::Delete);
        assert!("generate".parse::<Action>().is_err());
        assert_eq!(Action::default(), Action::Add);
        assert_eq!(Action::Update.to_string(), "update");
    }

    #[test]
    fn test_delete_requires_file_name() {
        let service = SettingsService::new(MemoryStore::new(), SettingsConfig::default());
        assert!(matches!(service.delete(""), Err(SettingsError::MissingFileName)));
        assert!(matches!(
            service.submit(&SettingsForm::default(), Action::Delete),
            Err(SettingsError::MissingFileName)
        ));
    }

    #[test]
    fn test_invalid_submission_not_stored() {
        let service = SettingsService::new(MemoryStore::new(), SettingsConfig::default());
        let err = service.submit(&SettingsForm::default(), Action::Add).unwrap_err();
        assert!(matches!(err, SettingsError::Validation(ref issues) if issues.len() == 3));
        assert_eq!(
            err.to_string(),
            "File name is required, Report title is required, Data source is required"
        );
        assert!(service.store().is_empty().unwrap());
    }
}

//! Settings persistence.
//!
//! [`SettingsStore`] is the seam to whatever backend keeps saved records.
//! Records are keyed by `file_name`. [`MemoryStore`] keeps them in process
//! and can load and dump the JSON settings file format.

use std::sync::RwLock;

use tracing::debug;

use crate::error::{Result, SettingsError};
use crate::model::ReportSetting;

/// Keyed storage for report settings.
pub trait SettingsStore: Send + Sync {
    /// All records in insertion order.
    fn all(&self) -> Result<Vec<ReportSetting>>;

    /// Record with this file name, if any.
    fn get(&self, file_name: &str) -> Result<Option<ReportSetting>>;

    /// Insert a new record. Fails if the file name is taken.
    fn add(&self, setting: ReportSetting) -> Result<()>;

    /// Replace the record named `original_file_name`.
    ///
    /// The replacement may carry a different file name, as long as no other
    /// record already uses it.
    fn update(&self, original_file_name: &str, setting: ReportSetting) -> Result<()>;

    /// Remove the record with this file name.
    fn delete(&self, file_name: &str) -> Result<()>;
}

/// In-process store guarded by a read-write lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    settings: RwLock<Vec<ReportSetting>>,
}

fn poisoned<T>(_: T) -> SettingsError {
    SettingsError::Store("settings lock poisoned".to_string())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load records from a settings file body (a JSON array).
    ///
    /// Records in the pre-`data_source` layout are migrated while loading.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Vec<ReportSetting> = serde_json::from_str(json)?;
        debug!(count = settings.len(), "Loaded settings");
        Ok(Self {
            settings: RwLock::new(settings),
        })
    }

    /// Dump all records as a pretty-printed JSON array.
    pub fn to_json(&self) -> Result<String> {
        let settings = self.settings.read().map_err(poisoned)?;
        Ok(serde_json::to_string_pretty(&*settings)?)
    }

    /// Number of stored records. Fails if the lock is poisoned.
    pub fn len(&self) -> Result<usize> {
        Ok(self.settings.read().map_err(poisoned)?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl SettingsStore for MemoryStore {
    fn all(&self) -> Result<Vec<ReportSetting>> {
        Ok(self.settings.read().map_err(poisoned)?.clone())
    }

    fn get(&self, file_name: &str) -> Result<Option<ReportSetting>> {
        let settings = self.settings.read().map_err(poisoned)?;
        Ok(settings.iter().find(|s| s.file_name == file_name).cloned())
    }

    fn add(&self, setting: ReportSetting) -> Result<()> {
        let mut settings = self.settings.write().map_err(poisoned)?;
        if settings.iter().any(|s| s.file_name == setting.file_name) {
            return Err(SettingsError::DuplicateFileName(setting.file_name));
        }
        settings.push(setting);
        Ok(())
    }

    fn update(&self, original_file_name: &str, setting: ReportSetting) -> Result<()> {
        let mut settings = self.settings.write().map_err(poisoned)?;
        let Some(index) = settings.iter().position(|s| s.file_name == original_file_name) else {
            return Err(SettingsError::NotFound(original_file_name.to_string()));
        };
        let clash = settings
            .iter()
            .enumerate()
            .any(|(i, s)| i != index && s.file_name == setting.file_name);
        if clash {
            return Err(SettingsError::DuplicateFileName(setting.file_name));
        }
        settings[index] = setting;
        Ok(())
    }

    fn delete(&self, file_name: &str) -> Result<()> {
        let mut settings = self.settings.write().map_err(poisoned)?;
        let before = settings.len();
        settings.retain(|s| s.file_name != file_name);
        if settings.len() == before {
            return Err(SettingsError::NotFound(file_name.to_string()));
        }
        Ok(())
    }
}

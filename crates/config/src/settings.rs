// General settings
// Loaded from ~/.config/charsheet/settings.json; fields at their default are
// left out of the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::persistence::{read_json, remove_file, write_json_atomic};
use crate::recent_files::{RecentFiles, DEFAULT_LIMIT};
use crate::window_positions::{DEFAULT_MAX_AGE_DAYS, MAX_AGE_DAYS_LIMIT};

pub const FILE_NAME: &str = "settings.json";

fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

fn default_recent_limit() -> usize {
    DEFAULT_LIMIT
}

fn is_default_recent_limit(limit: &usize) -> bool {
    *limit == DEFAULT_LIMIT
}

fn default_max_age() -> i64 {
    DEFAULT_MAX_AGE_DAYS
}

fn is_default_max_age(days: &i64) -> bool {
    *days == DEFAULT_MAX_AGE_DAYS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    // File
    #[serde(rename = "file.recentFiles", default, skip_serializing_if = "is_default")]
    pub recent_files: RecentFiles,

    #[serde(
        rename = "file.recentFilesLimit",
        default = "default_recent_limit",
        skip_serializing_if = "is_default_recent_limit"
    )]
    pub recent_files_limit: usize,

    #[serde(rename = "file.lastDirectory", default, skip_serializing_if = "Option::is_none")]
    pub last_dir: Option<PathBuf>,

    // Windows
    #[serde(
        rename = "window.positionMaxAgeDays",
        default = "default_max_age",
        skip_serializing_if = "is_default_max_age"
    )]
    pub window_position_max_age_days: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            recent_files: RecentFiles::default(),
            recent_files_limit: DEFAULT_LIMIT,
            last_dir: None,
            window_position_max_age_days: DEFAULT_MAX_AGE_DAYS,
        }
    }
}

impl Settings {
    /// Load from `path`, falling back to defaults. The error, if any, is
    /// returned alongside for reporting.
    pub fn load(path: &Path) -> (Self, Option<ConfigError>) {
        match read_json::<Settings>(path).and_then(|s| s.map(Settings::validated).transpose()) {
            Ok(Some(settings)) => (settings, None),
            Ok(None) => (Self::default(), None),
            Err(e) => {
                log::warn!("using default settings: {e}");
                (Self::default(), Some(e))
            }
        }
    }

    /// Write to `path`; an all-default value removes the file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if self.is_default() {
            return remove_file(path);
        }
        write_json_atomic(path, self)
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Reject values that parse but cannot be used
    fn validated(self) -> Result<Self, ConfigError> {
        let days = self.window_position_max_age_days;
        if !(1..=MAX_AGE_DAYS_LIMIT).contains(&days) {
            return Err(ConfigError::InvalidValue {
                key: "window.positionMaxAgeDays".to_string(),
                message: format!("{days} is outside 1..={MAX_AGE_DAYS_LIMIT}"),
            });
        }
        Ok(self)
    }

    /// Record an opened document and the directory it came from
    pub fn note_opened(&mut self, path: &Path) {
        self.recent_files.add(path, self.recent_files_limit);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                self.last_dir = Some(parent.to_path_buf());
            }
        }
    }

    pub fn set_recent_files_limit(&mut self, limit: usize) {
        self.recent_files_limit = limit;
        self.recent_files.truncate(limit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_serializes_empty() {
        assert_eq!(serde_json::to_string(&Settings::default()).unwrap(), "{}");
    }

    #[test]
    fn test_only_changed_fields_written() {
        let mut settings = Settings::default();
        settings.note_opened(Path::new("/chars/bob.gcs"));
        let json: serde_json::Value = serde_json::to_value(&settings).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(json["file.recentFiles"][0], "/chars/bob.gcs");
        assert_eq!(json["file.lastDirectory"], "/chars");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"file.recentFilesLimit": 5}"#).unwrap();
        assert_eq!(settings.recent_files_limit, 5);
        assert_eq!(settings.window_position_max_age_days, DEFAULT_MAX_AGE_DAYS);
        assert!(settings.recent_files.is_empty());
    }

    #[test]
    fn test_limit_truncates() {
        let mut settings = Settings::default();
        for name in ["a", "b", "c"] {
            settings.note_opened(Path::new(name));
        }
        settings.set_recent_files_limit(2);
        assert_eq!(settings.recent_files.len(), 2);
        // Bare file names have no directory to remember
        assert_eq!(settings.last_dir, None);
    }

    #[test]
    fn test_save_load_and_remove() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(FILE_NAME);

        let mut settings = Settings::default();
        settings.set_recent_files_limit(3);
        settings.save(&path).unwrap();
        let (loaded, err) = Settings::load(&path);
        assert!(err.is_none());
        assert_eq!(loaded, settings);

        Settings::default().save(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_malformed_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(FILE_NAME);
        std::fs::write(&path, "{\"file.recentFilesLimit\": \"many\"}").unwrap();
        let (loaded, err) = Settings::load(&path);
        assert!(err.is_some());
        assert!(loaded.is_default());
    }

    #[test]
    fn test_out_of_range_max_age_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(FILE_NAME);
        for days in ["0", "-5", "10000000000"] {
            std::fs::write(&path, format!("{{\"window.positionMaxAgeDays\": {days}}}")).unwrap();
            let (loaded, err) = Settings::load(&path);
            assert!(matches!(err, Some(ConfigError::InvalidValue { .. })), "{days}");
            assert!(loaded.is_default());
        }

        std::fs::write(&path, format!("{{\"window.positionMaxAgeDays\": {MAX_AGE_DAYS_LIMIT}}}")).unwrap();
        let (loaded, err) = Settings::load(&path);
        assert!(err.is_none());
        assert_eq!(loaded.window_position_max_age_days, MAX_AGE_DAYS_LIMIT);
    }
}

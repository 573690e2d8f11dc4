//! Runtime settings for a case log instance.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::form::DEFAULT_NOTICE_DURATION;
use crate::store::DEFAULT_STORAGE_KEY;

/// Settings for a case log instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseLogConfig {
    /// Storage key the case list is kept under
    pub storage_key: String,
    /// How long the saved notice stays visible
    pub saved_notice_duration: Duration,
    /// Directory CSV exports are written to
    pub export_dir: PathBuf,
}

impl Default for CaseLogConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            saved_notice_duration: DEFAULT_NOTICE_DURATION,
            export_dir: PathBuf::from("."),
        }
    }
}

impl CaseLogConfig {
    /// Defaults, exporting into `export_dir`.
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self::default().with_export_dir(export_dir)
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_saved_notice_duration(mut self, duration: Duration) -> Self {
        self.saved_notice_duration = duration;
        self
    }

    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CaseLogConfig::default();
        assert_eq!(config.storage_key, "anaesthesiaCases");
        assert_eq!(config.saved_notice_duration, Duration::from_secs(3));
        assert_eq!(config.export_dir(), Path::new("."));
    }

    #[test]
    fn test_builders() {
        let config = CaseLogConfig::new("/tmp/exports")
            .with_storage_key("cases-v2")
            .with_saved_notice_duration(Duration::from_millis(500));

        assert_eq!(config.storage_key, "cases-v2");
        assert_eq!(config.saved_notice_duration, Duration::from_millis(500));
        assert_eq!(config.export_dir(), Path::new("/tmp/exports"));
    }
}

//! Delivery of exported documents.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::CsvExport;

/// Notice shown when an export is requested with an empty log.
pub const NO_RECORDS_NOTICE: &str = "No records to export";

/// Export errors.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write export {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create export directory {path}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Result of an export request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Log was empty; nothing was delivered.
    NothingToExport { notice: &'static str },
    /// Document was delivered to the sink.
    Exported(CsvExport),
}

impl ExportOutcome {
    pub fn nothing_to_export() -> Self {
        Self::NothingToExport {
            notice: NO_RECORDS_NOTICE,
        }
    }

    /// User-facing notice, if any.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            Self::NothingToExport { notice } => Some(*notice),
            Self::Exported(_) => None,
        }
    }
}

/// Receives finished exports (the "download").
pub trait ExportSink {
    fn deliver(&mut self, export: &CsvExport) -> ExportResult<()>;
}

/// Writes each export as a file in a directory.
#[derive(Debug, Clone)]
pub struct DirectoryExportSink {
    dir: PathBuf,
    last_written: Option<PathBuf>,
}

impl DirectoryExportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            last_written: None,
        }
    }

    /// Target directory; created on first delivery.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the most recent file written.
    pub fn last_written(&self) -> Option<&Path> {
        self.last_written.as_deref()
    }
}

impl ExportSink for DirectoryExportSink {
    fn deliver(&mut self, export: &CsvExport) -> ExportResult<()> {
        fs::create_dir_all(&self.dir).map_err(|source| ExportError::DirectoryCreate {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.dir.join(&export.file_name);
        fs::write(&path, export.content.as_bytes()).map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?;

        tracing::info!(path = %path.display(), records = export.record_count, "Wrote CSV export");
        self.last_written = Some(path);
        Ok(())
    }
}

/// Collects exports in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryExportSink {
    pub delivered: Vec<CsvExport>,
}

impl ExportSink for MemoryExportSink {
    fn deliver(&mut self, export: &CsvExport) -> ExportResult<()> {
        self.delivered.push(export.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_export() -> CsvExport {
        CsvExport {
            file_name: "anaesthesia_case_log_2024-01-15.csv".to_string(),
            mime_type: crate::export::CSV_MIME_TYPE,
            content: "header\n\"row\"".to_string(),
            record_count: 1,
        }
    }

    #[test]
    fn test_directory_sink_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectoryExportSink::new(dir.path().join("exports"));
        assert_eq!(sink.dir(), dir.path().join("exports"));
        assert!(sink.last_written().is_none());

        sink.deliver(&make_export()).unwrap();

        let path = sink.last_written().unwrap().to_path_buf();
        assert_eq!(path, dir.path().join("exports/anaesthesia_case_log_2024-01-15.csv"));
        assert_eq!(fs::read_to_string(path).unwrap(), "header\n\"row\"");
    }

    #[test]
    fn test_memory_sink_collects() {
        let mut sink = MemoryExportSink::default();
        sink.deliver(&make_export()).unwrap();
        sink.deliver(&make_export()).unwrap();
        assert_eq!(sink.delivered.len(), 2);
    }

    #[test]
    fn test_outcome_notice() {
        assert_eq!(
            ExportOutcome::nothing_to_export().notice(),
            Some("No records to export")
        );
        assert_eq!(ExportOutcome::Exported(make_export()).notice(), None);
    }
}

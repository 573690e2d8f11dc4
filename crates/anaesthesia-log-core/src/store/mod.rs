//! Record store: the authoritative, newest-first case list.
//!
//! The whole list lives under one storage key and is rewritten in full on
//! every save. Data that cannot be decoded at load time is dropped and the
//! store starts empty.

use chrono::{DateTime, Utc};

use crate::export::{CsvExport, ExportOutcome, ExportResult, ExportSink};
use crate::models::CaseRecord;
use crate::storage::{KeyValueStore, StorageResult};

/// Storage key the case list is kept under.
pub const DEFAULT_STORAGE_KEY: &str = "anaesthesiaCases";

/// Owns the case list and its persisted copy.
pub struct RecordStore<S: KeyValueStore> {
    storage: S,
    key: String,
    cases: Vec<CaseRecord>,
}

impl<S: KeyValueStore> RecordStore<S> {
    /// Load the case list from `storage` under the default key.
    pub fn load(storage: S) -> Self {
        Self::load_with_key(storage, DEFAULT_STORAGE_KEY)
    }

    /// Load the case list from `storage` under `key`.
    pub fn load_with_key(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let cases = read_cases(&storage, &key);
        tracing::debug!(key = %key, count = cases.len(), "Loaded case records");
        Self {
            storage,
            key,
            cases,
        }
    }

    /// Prepend `record` and write the full list back.
    ///
    /// On a write failure the in-memory list is left as it was.
    pub fn save(&mut self, record: CaseRecord) -> StorageResult<()> {
        let mut updated = Vec::with_capacity(self.cases.len() + 1);
        updated.push(record);
        updated.extend(self.cases.iter().cloned());

        let payload = serde_json::to_string(&updated)?;
        self.storage.set(&self.key, &payload)?;

        tracing::info!(id = %updated[0].id, count = updated.len(), "Saved case record");
        self.cases = updated;
        Ok(())
    }

    /// Serialize the list to CSV and deliver it to `sink`.
    ///
    /// An empty list yields [`ExportOutcome::NothingToExport`] without touching the sink.
    pub fn export_to_csv<E: ExportSink + ?Sized>(
        &self,
        sink: &mut E,
        exported_at: DateTime<Utc>,
    ) -> ExportResult<ExportOutcome> {
        if self.cases.is_empty() {
            tracing::info!("Export requested with no records");
            return Ok(ExportOutcome::nothing_to_export());
        }

        let export = CsvExport::from_cases(&self.cases, exported_at);
        sink.deliver(&export)?;
        tracing::info!(file = %export.file_name, records = export.record_count, "Exported case log");
        Ok(ExportOutcome::Exported(export))
    }

    /// Current records, newest first.
    pub fn cases(&self) -> &[CaseRecord] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}

fn read_cases<S: KeyValueStore>(storage: &S, key: &str) -> Vec<CaseRecord> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Error reading saved cases, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(cases) => cases,
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Error parsing saved cases, starting empty");
            Vec::new()
        }
    }
}

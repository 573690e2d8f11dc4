//! Case entry form.
//!
//! Holds the in-progress draft, checks the required fields, and turns a valid
//! draft into a [`CaseRecord`] handed to the [`RecordStore`].

mod notice;

pub use notice::*;

use std::fmt;

use chrono::{DateTime, Utc};

use crate::export::{ExportOutcome, ExportResult, ExportSink};
use crate::models::{CaseDraft, CaseField, CaseRecord};
use crate::storage::{KeyValueStore, StorageResult};
use crate::store::RecordStore;

/// Form heading.
pub const FORM_TITLE: &str = "Anaesthesia Case Log";
/// Form sub-heading.
pub const FORM_SUBTITLE: &str = "Record and manage your anaesthetic cases";
/// Label of the submit control.
pub const SAVE_ACTION_LABEL: &str = "Save Case Record";
/// Label of the export control.
pub const EXPORT_ACTION_LABEL: &str = "Export CSV";

/// Required fields left empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFields(pub Vec<CaseField>);

impl fmt::Display for MissingFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<_> = self.0.iter().map(|field| field.label()).collect();
        write!(f, "Required: {}", labels.join(", "))
    }
}

/// Check that every required field has a value.
pub fn validate(draft: &CaseDraft) -> Result<(), MissingFields> {
    let missing: Vec<CaseField> = CaseField::required()
        .filter(|field| draft.get(*field).is_empty())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(MissingFields(missing))
    }
}

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Record minted and stored.
    Saved(CaseRecord),
    /// Required fields were empty; nothing happened.
    Blocked(MissingFields),
}

/// Entry form state.
#[derive(Debug, Clone, Default)]
pub struct CaseForm {
    draft: CaseDraft,
    notice: SaveNotice,
}

impl CaseForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Form whose saved notice lasts `notice_duration`.
    pub fn with_notice_duration(notice_duration: std::time::Duration) -> Self {
        Self {
            draft: CaseDraft::default(),
            notice: SaveNotice::new(notice_duration),
        }
    }

    pub fn draft(&self) -> &CaseDraft {
        &self.draft
    }

    pub fn notice(&self) -> &SaveNotice {
        &self.notice
    }

    pub fn update_field(&mut self, field: CaseField, value: impl Into<String>) {
        self.draft.set(field, value);
    }

    /// Whether the submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        validate(&self.draft).is_ok()
    }

    /// Save the draft as a new record stamped at `now`, then reset.
    ///
    /// A blocked submit leaves the draft and the store untouched. A storage
    /// failure is returned and the draft is kept for another attempt.
    pub fn submit<S: KeyValueStore>(
        &mut self,
        store: &mut RecordStore<S>,
        now: DateTime<Utc>,
    ) -> StorageResult<SubmitOutcome> {
        if let Err(missing) = validate(&self.draft) {
            tracing::debug!(%missing, "Submit blocked");
            return Ok(SubmitOutcome::Blocked(missing));
        }

        let record = CaseRecord::from_draft(self.draft.clone(), now);
        store.save(record.clone())?;

        self.draft = CaseDraft::default();
        self.notice.mark_saved(now);
        Ok(SubmitOutcome::Saved(record))
    }

    /// Advance the saved notice clock.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        self.notice.tick(now)
    }

    /// Export the stored cases. Does not touch the draft.
    pub fn request_export<S: KeyValueStore, E: ExportSink + ?Sized>(
        &self,
        store: &RecordStore<S>,
        sink: &mut E,
        now: DateTime<Utc>,
    ) -> ExportResult<ExportOutcome> {
        store.export_to_csv(sink, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::MemoryExportSink;
    use crate::storage::MemoryStorage;

    fn filled_form() -> CaseForm {
        let mut form = CaseForm::new();
        form.update_field(CaseField::PatientName, "A. Smith");
        form.update_field(CaseField::PatientId, "MRN-1");
        form
    }

    #[test]
    fn test_validate() {
        let mut draft = CaseDraft::default();
        assert_eq!(
            validate(&draft),
            Err(MissingFields(vec![CaseField::PatientName, CaseField::PatientId]))
        );

        draft.set(CaseField::PatientName, "Jane");
        assert_eq!(validate(&draft), Err(MissingFields(vec![CaseField::PatientId])));

        draft.set(CaseField::PatientId, "MRN-7");
        assert_eq!(validate(&draft), Ok(()));
    }

    #[test]
    fn test_missing_fields_display() {
        let missing = MissingFields(vec![CaseField::PatientName, CaseField::PatientId]);
        assert_eq!(missing.to_string(), "Required: Patient Name, Patient ID");
    }

    #[test]
    fn test_blocked_submit_changes_nothing() {
        let mut store = RecordStore::load(MemoryStorage::new());
        let mut form = CaseForm::new();
        form.update_field(CaseField::PatientName, "No ID");

        let outcome = form.submit(&mut store, Utc::now()).unwrap();

        assert!(matches!(outcome, SubmitOutcome::Blocked(_)));
        assert!(store.is_empty());
        assert_eq!(form.draft().patient_name, "No ID");
        assert!(!form.can_submit());
        assert_eq!(form.notice().state(), NoticeState::Idle);
    }

    #[test]
    fn test_submit_saves_and_resets() {
        let mut store = RecordStore::load(MemoryStorage::new());
        let mut form = filled_form();
        form.update_field(CaseField::Incidents, "Hypotension");
        assert!(form.can_submit());

        let now = Utc::now();
        let outcome = form.submit(&mut store, now).unwrap();

        let SubmitOutcome::Saved(record) = outcome else {
            panic!("expected a saved record");
        };
        assert_eq!(record.timestamp, now.timestamp_millis());
        assert_eq!(record.incidents, "Hypotension");
        assert_eq!(store.cases()[0], record);
        assert!(form.draft().is_blank());
        assert!(form.notice().is_visible(now));
    }

    #[test]
    fn test_request_export_keeps_draft() {
        let mut store = RecordStore::load(MemoryStorage::new());
        let mut form = filled_form();
        form.submit(&mut store, Utc::now()).unwrap();
        form.update_field(CaseField::PatientName, "In progress");

        let mut sink = MemoryExportSink::default();
        let outcome = form.request_export(&store, &mut sink, Utc::now()).unwrap();

        assert!(matches!(outcome, ExportOutcome::Exported(_)));
        assert_eq!(sink.delivered.len(), 1);
        assert_eq!(form.draft().patient_name, "In progress");
    }
}

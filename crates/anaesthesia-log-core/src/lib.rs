//! Anaesthesia Case Log Core Library
//!
//! Local-first case logging for anaesthetists: capture a case, keep the log on
//! the device, export it as CSV.
//!
//! # Architecture
//!
//! ```text
//!   Host UI (form inputs, list, buttons)
//!          │                      ▲
//!          ▼                      │
//!     CaseForm ──submit──► RecordStore ──render──► CaseListView
//!          │                 │     │
//!          │                 │     └──► KeyValueStore (SQLite / memory)
//!          │                 │           key "anaesthesiaCases", full JSON snapshot
//!          └──export──►      └──► CSV ──► ExportSink (file download)
//! ```
//!
//! # Modules
//!
//! - [`models`]: `CaseRecord`, `CaseDraft`, field schema
//! - [`storage`]: key-value persistence (SQLite, in-memory)
//! - [`store`]: newest-first record store with load/save/export
//! - [`form`]: draft entry, validation, saved notice
//! - [`view`]: filtered list projection
//! - [`export`]: CSV serialization and export sinks
//! - [`config`], [`logging`]: runtime settings and tracing setup

pub mod config;
pub mod export;
pub mod form;
pub mod logging;
pub mod models;
pub mod storage;
pub mod store;
pub mod view;

// Re-export commonly used types
pub use config::CaseLogConfig;
pub use export::{CsvExport, DirectoryExportSink, ExportOutcome, ExportSink};
pub use form::{validate, CaseForm, MissingFields, SaveNotice, SubmitOutcome};
pub use models::{CaseDraft, CaseField, CaseRecord, FormSection};
pub use storage::{KeyValueStore, MemoryStorage, SqliteStorage};
pub use store::RecordStore;
pub use view::{CaseCard, CaseListRender, CaseListView};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum CaseLogError {
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Export error: {0}")]
    ExportError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<storage::StorageError> for CaseLogError {
    fn from(e: storage::StorageError) -> Self {
        CaseLogError::StorageError(e.to_string())
    }
}

impl From<export::ExportError> for CaseLogError {
    fn from(e: export::ExportError) -> Self {
        CaseLogError::ExportError(e.to_string())
    }
}

impl From<models::UnknownField> for CaseLogError {
    fn from(e: models::UnknownField) -> Self {
        CaseLogError::InvalidInput(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for CaseLogError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        CaseLogError::StorageError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a case log backed by the SQLite file at `db_path`.
#[uniffi::export]
pub fn open_case_log(db_path: String, export_dir: String) -> Result<Arc<CaseLogApp>, CaseLogError> {
    let storage = SqliteStorage::open(&db_path)?;
    Ok(Arc::new(CaseLogApp::with_config(
        storage,
        CaseLogConfig::new(export_dir),
    )))
}

/// Create a case log on an in-memory database (for testing).
#[uniffi::export]
pub fn open_case_log_in_memory(export_dir: String) -> Result<Arc<CaseLogApp>, CaseLogError> {
    let storage = SqliteStorage::open_in_memory()?;
    Ok(Arc::new(CaseLogApp::with_config(
        storage,
        CaseLogConfig::new(export_dir),
    )))
}

/// Print library logs to stderr.
#[uniffi::export]
pub fn enable_logging(verbose: bool) {
    let verbosity = if verbose {
        logging::Verbosity::Verbose
    } else {
        logging::Verbosity::Normal
    };
    logging::init_logging(verbosity);
}

/// Static text of the entry form.
#[uniffi::export]
pub fn form_labels() -> FfiFormLabels {
    FfiFormLabels {
        title: form::FORM_TITLE.to_string(),
        subtitle: form::FORM_SUBTITLE.to_string(),
        save_action: form::SAVE_ACTION_LABEL.to_string(),
        export_action: form::EXPORT_ACTION_LABEL.to_string(),
    }
}

// =========================================================================
// Main API Object
// =========================================================================

struct CaseLogState {
    store: RecordStore<SqliteStorage>,
    form: CaseForm,
    list: CaseListView,
    sink: DirectoryExportSink,
}

/// Thread-safe case log wrapper for FFI.
#[derive(uniffi::Object)]
pub struct CaseLogApp {
    state: Mutex<CaseLogState>,
}

impl CaseLogApp {
    /// Load the case list from `storage` and set up an empty form.
    pub fn with_config(storage: SqliteStorage, config: CaseLogConfig) -> Self {
        let state = CaseLogState {
            store: RecordStore::load_with_key(storage, config.storage_key.clone()),
            form: CaseForm::with_notice_duration(config.saved_notice_duration),
            list: CaseListView::new(),
            sink: DirectoryExportSink::new(config.export_dir),
        };
        Self {
            state: Mutex::new(state),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, CaseLogState>, CaseLogError> {
        Ok(self.state.lock()?)
    }
}

#[uniffi::export]
impl CaseLogApp {
    // =========================================================================
    // Form Operations
    // =========================================================================

    /// Field schema with the current draft values, in display order.
    pub fn form_fields(&self) -> Result<Vec<FfiFormField>, CaseLogError> {
        let state = self.lock()?;
        let draft = state.form.draft();
        Ok(CaseField::ALL
            .into_iter()
            .map(|field| FfiFormField::new(field, draft.get(field)))
            .collect())
    }

    /// Set one draft field by its JSON attribute name.
    pub fn update_field(&self, field: String, value: String) -> Result<(), CaseLogError> {
        let field: CaseField = field.parse()?;
        let mut state = self.lock()?;
        state.form.update_field(field, value);
        Ok(())
    }

    /// Whether both required fields are filled in.
    pub fn can_submit(&self) -> Result<bool, CaseLogError> {
        Ok(self.lock()?.form.can_submit())
    }

    /// Save the draft as a new case.
    pub fn submit(&self) -> Result<FfiSubmitResult, CaseLogError> {
        let mut state = self.lock()?;
        let CaseLogState { store, form, .. } = &mut *state;
        let outcome = form.submit(store, Utc::now())?;
        Ok(outcome.into())
    }

    /// The saved notice text while it is showing.
    pub fn saved_notice(&self) -> Result<Option<String>, CaseLogError> {
        let mut state = self.lock()?;
        let now = Utc::now();
        state.form.tick(now);
        Ok(state.form.notice().message(now).map(str::to_string))
    }

    // =========================================================================
    // Export Operations
    // =========================================================================

    /// Write the case log CSV into the export directory.
    pub fn export_csv(&self) -> Result<FfiExportResult, CaseLogError> {
        let mut state = self.lock()?;
        let CaseLogState {
            store, form, sink, ..
        } = &mut *state;
        let outcome = form.request_export(store, sink, Utc::now())?;

        Ok(match outcome {
            ExportOutcome::NothingToExport { notice } => FfiExportResult {
                exported: false,
                notice: Some(notice.to_string()),
                file_name: None,
                path: None,
                record_count: 0,
            },
            ExportOutcome::Exported(export) => FfiExportResult {
                exported: true,
                notice: None,
                file_name: Some(export.file_name),
                path: sink.last_written().map(|p| p.display().to_string()),
                record_count: saturating_u32(export.record_count),
            },
        })
    }

    // =========================================================================
    // List Operations
    // =========================================================================

    /// Set the search term.
    pub fn set_filter(&self, term: String) -> Result<(), CaseLogError> {
        self.lock()?.list.set_filter(term);
        Ok(())
    }

    /// The current search term.
    pub fn current_filter(&self) -> Result<String, CaseLogError> {
        Ok(self.lock()?.list.filter().to_string())
    }

    /// The list as it should be drawn.
    pub fn case_list(&self) -> Result<FfiCaseList, CaseLogError> {
        let state = self.lock()?;
        Ok(state.list.render(state.store.cases()).into())
    }

    /// All stored cases, newest first.
    pub fn cases(&self) -> Result<Vec<FfiCaseRecord>, CaseLogError> {
        let state = self.lock()?;
        Ok(state.store.cases().iter().cloned().map(Into::into).collect())
    }

    pub fn case_count(&self) -> Result<u32, CaseLogError> {
        Ok(saturating_u32(self.lock()?.store.len()))
    }
}

/// Counts cross the FFI as u32; clamp rather than wrap.
fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe form text.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFormLabels {
    pub title: String,
    pub subtitle: String,
    pub save_action: String,
    pub export_action: String,
}

/// FFI-safe form field with its current value.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFormField {
    pub name: String,
    pub label: String,
    pub placeholder: String,
    pub section: String,
    pub required: bool,
    pub multiline: bool,
    pub value: String,
}

impl FfiFormField {
    fn new(field: CaseField, value: &str) -> Self {
        Self {
            name: field.json_name().to_string(),
            label: field.label().to_string(),
            placeholder: field.placeholder().to_string(),
            section: field.section().title().to_string(),
            required: field.is_required(),
            multiline: field.is_multiline(),
            value: value.to_string(),
        }
    }
}

/// FFI-safe case record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCaseRecord {
    pub id: String,
    pub patient_name: String,
    pub patient_id: String,
    pub surgery_name: String,
    pub anaesthesia_name: String,
    pub drug_doses: String,
    pub incidents: String,
    pub monitoring: String,
    pub blood_loss: String,
    pub fluid_management: String,
    pub regional_anesthesia: String,
    pub extubation: String,
    pub postoperative_recovery: String,
    pub timestamp: i64,
}

impl From<CaseRecord> for FfiCaseRecord {
    fn from(record: CaseRecord) -> Self {
        Self {
            id: record.id,
            patient_name: record.patient_name,
            patient_id: record.patient_id,
            surgery_name: record.surgery_name,
            anaesthesia_name: record.anaesthesia_name,
            drug_doses: record.drug_doses,
            incidents: record.incidents,
            monitoring: record.monitoring,
            blood_loss: record.blood_loss,
            fluid_management: record.fluid_management,
            regional_anesthesia: record.regional_anesthesia,
            extubation: record.extubation,
            postoperative_recovery: record.postoperative_recovery,
            timestamp: record.timestamp,
        }
    }
}

/// FFI-safe submit result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSubmitResult {
    /// The stored record, when the submit went through
    pub saved: Option<FfiCaseRecord>,
    /// Attribute names of empty required fields
    pub missing_fields: Vec<String>,
}

impl From<SubmitOutcome> for FfiSubmitResult {
    fn from(outcome: SubmitOutcome) -> Self {
        match outcome {
            SubmitOutcome::Saved(record) => Self {
                saved: Some(record.into()),
                missing_fields: Vec::new(),
            },
            SubmitOutcome::Blocked(missing) => Self {
                saved: None,
                missing_fields: missing.0.iter().map(|f| f.json_name().to_string()).collect(),
            },
        }
    }
}

/// FFI-safe export result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiExportResult {
    pub exported: bool,
    /// User-facing notice (empty log)
    pub notice: Option<String>,
    pub file_name: Option<String>,
    pub path: Option<String>,
    pub record_count: u32,
}

/// FFI-safe case card.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCaseCard {
    pub id: String,
    pub patient_name: String,
    pub patient_id: String,
    pub date: String,
    pub procedure: String,
    pub anaesthesia: String,
    pub incidents: Option<String>,
}

impl From<CaseCard> for FfiCaseCard {
    fn from(card: CaseCard) -> Self {
        Self {
            id: card.id,
            patient_name: card.patient_name,
            patient_id: card.patient_id,
            date: card.date,
            procedure: card.procedure,
            anaesthesia: card.anaesthesia,
            incidents: card.incidents,
        }
    }
}

/// FFI-safe list render.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCaseList {
    /// No records stored at all; show the placeholder instead of search
    pub is_empty: bool,
    /// "Recent Cases (n)" or the empty-state title
    pub heading: String,
    /// Search placeholder or the empty-state message
    pub subtext: String,
    pub total: u32,
    pub cards: Vec<FfiCaseCard>,
}

impl From<CaseListRender> for FfiCaseList {
    fn from(render: CaseListRender) -> Self {
        match render {
            CaseListRender::Empty { title, message } => Self {
                is_empty: true,
                heading: title.to_string(),
                subtext: message.to_string(),
                total: 0,
                cards: Vec::new(),
            },
            CaseListRender::Populated {
                heading,
                total,
                search_placeholder,
                cards,
            } => Self {
                is_empty: false,
                heading,
                subtext: search_placeholder.to_string(),
                total: saturating_u32(total),
                cards: cards.into_iter().map(Into::into).collect(),
            },
        }
    }
}

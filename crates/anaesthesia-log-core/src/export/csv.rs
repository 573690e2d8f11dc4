//! Case log CSV serialization.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::models::{CaseField, CaseRecord};

/// MIME type of the exported document.
pub const CSV_MIME_TYPE: &str = "text/csv;charset=utf-8;";

/// Column headings, in export order.
pub const CSV_HEADERS: [&str; 13] = [
    "Patient Name",
    "Patient ID",
    "Surgery/Procedure",
    "Anaesthesia Technique",
    "Drug Doses",
    "Monitoring",
    "Blood Loss",
    "Fluid Management",
    "Regional Anaesthesia",
    "Incidents",
    "Extubation",
    "Postoperative Recovery",
    "Date & Time",
];

/// Text columns, in export order. The trailing "Date & Time" column comes from the timestamp.
pub const CSV_FIELDS: [CaseField; 12] = [
    CaseField::PatientName,
    CaseField::PatientId,
    CaseField::SurgeryName,
    CaseField::AnaesthesiaName,
    CaseField::DrugDoses,
    CaseField::Monitoring,
    CaseField::BloodLoss,
    CaseField::FluidManagement,
    CaseField::RegionalAnesthesia,
    CaseField::Incidents,
    CaseField::Extubation,
    CaseField::PostoperativeRecovery,
];

/// A serialized export, ready to hand to a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    /// Download file name
    pub file_name: String,
    /// MIME type
    pub mime_type: &'static str,
    /// Document text
    pub content: String,
    /// Number of data rows
    pub record_count: usize,
}

impl CsvExport {
    /// Serialize `cases` in the given order, named for the `exported_at` date.
    pub fn from_cases(cases: &[CaseRecord], exported_at: DateTime<Utc>) -> Self {
        Self {
            file_name: export_file_name(exported_at),
            mime_type: CSV_MIME_TYPE,
            content: cases_to_csv(cases),
            record_count: cases.len(),
        }
    }
}

/// `anaesthesia_case_log_YYYY-MM-DD.csv`
pub fn export_file_name(exported_at: DateTime<Utc>) -> String {
    format!("anaesthesia_case_log_{}.csv", exported_at.format("%Y-%m-%d"))
}

/// Render the whole document: header line, then one line per record, no trailing newline.
pub fn cases_to_csv(cases: &[CaseRecord]) -> String {
    let mut lines = Vec::with_capacity(cases.len() + 1);
    lines.push(CSV_HEADERS.join(","));
    lines.extend(cases.iter().map(record_row));
    lines.join("\n")
}

/// One quoted data row.
pub fn record_row(record: &CaseRecord) -> String {
    let timestamp = format_timestamp(record);
    CSV_FIELDS
        .iter()
        .map(|field| record.field(*field))
        .chain(std::iter::once(timestamp.as_str()))
        .map(quote_field)
        .collect::<Vec<_>>()
        .join(",")
}

/// Wrap in double quotes, doubling embedded quotes.
pub fn quote_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// RFC 3339 in UTC with milliseconds, e.g. `2024-01-15T10:00:00.000Z`.
fn format_timestamp(record: &CaseRecord) -> String {
    match record.created_at() {
        Some(at) => at.to_rfc3339_opts(SecondsFormat::Millis, true),
        None => record.timestamp.to_string(),
    }
}

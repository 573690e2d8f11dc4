//! Case list view: filtered, read-only projection of the store.

use chrono::{Local, TimeZone};

use crate::models::CaseRecord;

/// Shown in place of an empty surgery or anaesthesia value.
pub const NOT_SPECIFIED: &str = "Not specified";
/// Placeholder of the search box.
pub const SEARCH_PLACEHOLDER: &str = "Search cases...";
/// Empty-state heading.
pub const EMPTY_TITLE: &str = "No cases recorded yet";
/// Empty-state body.
pub const EMPTY_MESSAGE: &str = "Start by adding your first anaesthesia case above.";

/// Case-insensitive substring match on patient, surgery and anaesthesia names.
pub fn matches_filter(record: &CaseRecord, term: &str) -> bool {
    let term = term.to_lowercase();
    [
        &record.patient_name,
        &record.surgery_name,
        &record.anaesthesia_name,
    ]
    .iter()
    .any(|value| value.to_lowercase().contains(&term))
}

/// One rendered record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseCard {
    /// List key
    pub id: String,
    pub patient_name: String,
    pub patient_id: String,
    /// Local calendar date of the record (`YYYY-MM-DD`)
    pub date: String,
    /// Surgery, or "Not specified"
    pub procedure: String,
    /// Anaesthesia technique, or "Not specified"
    pub anaesthesia: String,
    /// Highlighted incidents note, only when recorded
    pub incidents: Option<String>,
}

impl CaseCard {
    pub fn from_record(record: &CaseRecord) -> Self {
        Self {
            id: record.id.clone(),
            patient_name: record.patient_name.clone(),
            patient_id: record.patient_id.clone(),
            date: display_date(record.timestamp),
            procedure: or_not_specified(&record.surgery_name),
            anaesthesia: or_not_specified(&record.anaesthesia_name),
            incidents: (!record.incidents.is_empty()).then(|| record.incidents.clone()),
        }
    }
}

/// What the list shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseListRender {
    /// The store has no records at all.
    Empty {
        title: &'static str,
        message: &'static str,
    },
    /// Search UI plus the visible cards.
    Populated {
        heading: String,
        total: usize,
        search_placeholder: &'static str,
        cards: Vec<CaseCard>,
    },
}

/// Search state of the list.
#[derive(Debug, Clone, Default)]
pub struct CaseListView {
    filter: String,
}

impl CaseListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_filter(&mut self, term: impl Into<String>) {
        self.filter = term.into();
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Records matching the current filter, in store order.
    pub fn visible<'a>(&self, cases: &'a [CaseRecord]) -> Vec<&'a CaseRecord> {
        cases
            .iter()
            .filter(|record| matches_filter(record, &self.filter))
            .collect()
    }

    pub fn render(&self, cases: &[CaseRecord]) -> CaseListRender {
        if cases.is_empty() {
            return CaseListRender::Empty {
                title: EMPTY_TITLE,
                message: EMPTY_MESSAGE,
            };
        }

        CaseListRender::Populated {
            heading: format!("Recent Cases ({})", cases.len()),
            total: cases.len(),
            search_placeholder: SEARCH_PLACEHOLDER,
            cards: self
                .visible(cases)
                .into_iter()
                .map(CaseCard::from_record)
                .collect(),
        }
    }
}

fn or_not_specified(value: &str) -> String {
    if value.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        value.to_string()
    }
}

fn display_date(timestamp: i64) -> String {
    match Local.timestamp_millis_opt(timestamp).single() {
        Some(at) => at.format("%Y-%m-%d").to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CaseDraft, CaseField};

    fn make_record(name: &str, surgery: &str, anaesthesia: &str) -> CaseRecord {
        let mut draft = CaseDraft::default();
        draft.set(CaseField::PatientName, name);
        draft.set(CaseField::PatientId, "MRN-1");
        draft.set(CaseField::SurgeryName, surgery);
        draft.set(CaseField::AnaesthesiaName, anaesthesia);
        CaseRecord::with_identity(draft, format!("id-{}", name), 1_705_312_800_000)
    }

    #[test]
    fn test_filter_matches_three_fields() {
        let record = make_record("Jane Doe", "Appendectomy", "General");

        for term in ["jane", "JANE", "append", "APPENDECTOMY", "general", "GeNeRaL", ""] {
            assert!(matches_filter(&record, term), "term {:?} should match", term);
        }
        assert!(!matches_filter(&record, "xyz"));
    }

    #[test]
    fn test_filter_ignores_other_fields() {
        let mut record = make_record("Jane Doe", "", "");
        record.incidents = "bronchospasm".into();
        record.patient_id = "MRN-99".into();

        assert!(!matches_filter(&record, "bronchospasm"));
        assert!(!matches_filter(&record, "mrn-99"));
    }

    #[test]
    fn test_visible_keeps_order_and_store() {
        let cases = vec![
            make_record("Jane Doe", "Appendectomy", "General"),
            make_record("John Roe", "Hip replacement", "Spinal"),
            make_record("Janet Poe", "Cataract", "Topical"),
        ];
        let mut view = CaseListView::new();
        view.set_filter("jan");

        let visible: Vec<_> = view
            .visible(&cases)
            .into_iter()
            .map(|c| c.patient_name.as_str())
            .collect();
        assert_eq!(visible, vec!["Jane Doe", "Janet Poe"]);
        assert_eq!(cases.len(), 3);
    }

    #[test]
    fn test_render_empty_state() {
        let mut view = CaseListView::new();
        view.set_filter("anything");
        assert_eq!(
            view.render(&[]),
            CaseListRender::Empty {
                title: "No cases recorded yet",
                message: "Start by adding your first anaesthesia case above.",
            }
        );
    }

    #[test]
    fn test_render_filtered_to_zero_is_not_empty_state() {
        let cases = vec![make_record("Jane Doe", "Appendectomy", "General")];
        let mut view = CaseListView::new();
        view.set_filter("xyz");

        match view.render(&cases) {
            CaseListRender::Populated {
                heading,
                total,
                cards,
                ..
            } => {
                assert_eq!(heading, "Recent Cases (1)");
                assert_eq!(total, 1);
                assert!(cards.is_empty());
            }
            other => panic!("unexpected render: {:?}", other),
        }
    }

    #[test]
    fn test_card_substitutions() {
        let mut record = make_record("A. Smith", "", "");
        let card = CaseCard::from_record(&record);
        assert_eq!(card.procedure, "Not specified");
        assert_eq!(card.anaesthesia, "Not specified");
        assert_eq!(card.incidents, None);
        assert_eq!(card.date.len(), 10);

        record.incidents = "Difficult airway".into();
        let card = CaseCard::from_record(&record);
        assert_eq!(card.incidents.as_deref(), Some("Difficult airway"));
        assert_eq!(record.surgery_name, "");
    }
}

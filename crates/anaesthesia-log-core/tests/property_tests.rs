//! Property tests for CSV quoting and list filtering.

use anaesthesia_log_core::export::{quote_field, record_row, CSV_FIELDS};
use anaesthesia_log_core::{CaseDraft, CaseListView, CaseRecord};
use proptest::prelude::*;

/// Split one CSV line on commas outside quotes, unescaping `""`.
fn split_quoted_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            ('"', _) => in_quotes = !in_quotes,
            (',', false) => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

fn record_from(values: &[String], timestamp: i64) -> CaseRecord {
    let mut draft = CaseDraft::default();
    for (field, value) in CSV_FIELDS.iter().zip(values) {
        draft.set(*field, value.clone());
    }
    CaseRecord::with_identity(draft, "id".into(), timestamp)
}

#[test]
fn test_quote_doubling() {
    assert_eq!(quote_field("5\" cannula"), "\"5\"\" cannula\"");
    assert_eq!(split_quoted_row(&quote_field("5\" cannula")), vec!["5\" cannula"]);
}

proptest! {
    #[test]
    fn prop_quoted_field_recovers_value(value in ".*") {
        let quoted = quote_field(&value);
        prop_assert!(quoted.starts_with('"') && quoted.ends_with('"'));
        prop_assert_eq!(quoted.matches('"').count(), value.matches('"').count() * 2 + 2);
        prop_assert_eq!(split_quoted_row(&quoted), vec![value]);
    }

    #[test]
    fn prop_row_splits_back_into_fields(
        values in proptest::collection::vec("[^\n]*", 12),
        timestamp in 0i64..4_102_444_800_000,
    ) {
        let record = record_from(&values, timestamp);
        let fields = split_quoted_row(&record_row(&record));

        prop_assert_eq!(fields.len(), 13);
        prop_assert_eq!(&fields[..12], values.as_slice());
    }

    #[test]
    fn prop_filter_idempotent(
        names in proptest::collection::vec("[a-zA-Z ]{0,12}", 0..8),
        term in "[a-zA-Z]{0,4}",
    ) {
        let cases: Vec<CaseRecord> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let mut values = vec![String::new(); 12];
                values[0] = name.clone();
                record_from(&values, i as i64)
            })
            .collect();

        let mut view = CaseListView::new();
        view.set_filter(term.clone());
        let once: Vec<String> = view.visible(&cases).into_iter().map(|c| c.patient_name.clone()).collect();
        view.set_filter(term.clone());
        let twice: Vec<String> = view.visible(&cases).into_iter().map(|c| c.patient_name.clone()).collect();

        prop_assert_eq!(&once, &twice);
        prop_assert!(once.len() <= cases.len());

        view.set_filter(term.to_uppercase());
        let upper: Vec<String> = view.visible(&cases).into_iter().map(|c| c.patient_name.clone()).collect();
        prop_assert_eq!(once, upper);
    }
}

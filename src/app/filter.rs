//! Row filtering
//!
//! Filtering is a pure function of the row sequence and the filter state. The
//! four criteria are AND-combined, the input order is preserved, and applying
//! the same state twice is a no-op.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::app::models::{ConfidenceFilter, FilterState, Row};

/// Return the rows matching every active criterion, in input order
///
/// # Example
///
/// ```rust
/// use casedoc_dashboard::app::filter::filter;
/// use casedoc_dashboard::app::models::{FilterState, Row};
///
/// let rows = vec![Row { case_number: "A".into(), ..Default::default() }];
/// assert_eq!(filter(&rows, &FilterState::new()), rows);
/// ```
pub fn filter(rows: &[Row], state: &FilterState) -> Vec<Row> {
    let matcher = RowMatcher::new(state);
    rows.iter().filter(|row| matcher.matches(row)).cloned().collect()
}

/// Precomputed criteria for one filter pass
struct RowMatcher<'a> {
    case: Option<&'a str>,
    doc_type: Option<&'a str>,
    confidence: ConfidenceFilter,
    needle: Option<String>,
}

impl<'a> RowMatcher<'a> {
    fn new(state: &'a FilterState) -> Self {
        Self {
            case: state.case_criterion(),
            doc_type: state.doc_type_criterion(),
            confidence: state.confidence,
            needle: state.search_needle(),
        }
    }

    fn matches(&self, row: &Row) -> bool {
        self.case.map_or(true, |case| row.case_number == case)
            && self.doc_type.map_or(true, |t| row.document_type == t)
            && match self.confidence {
                ConfidenceFilter::Any => true,
                ConfidenceFilter::Low => row.is_low_confidence(),
                ConfidenceFilter::High => !row.is_low_confidence(),
            }
            && self
                .needle
                .as_deref()
                .map_or(true, |needle| searchable_text(row).contains(needle))
    }
}

/// Lower-cased text the free-text search runs against
fn searchable_text(row: &Row) -> String {
    format!(
        "{} {} {}",
        row.case_number, row.document_type, row.notes
    )
    .to_lowercase()
}

/// Selectable values for the case and document type criteria
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Distinct non-empty case numbers, sorted
    pub cases: Vec<String>,
    /// Distinct non-empty document types, sorted
    pub document_types: Vec<String>,
}

impl FilterOptions {
    /// Collect the selector values present in a row sequence
    pub fn from_rows(rows: &[Row]) -> Self {
        let cases: BTreeSet<&str> = rows
            .iter()
            .map(|r| r.case_number.as_str())
            .filter(|c| !c.is_empty())
            .collect();
        let types: BTreeSet<&str> = rows
            .iter()
            .map(|r| r.document_type.as_str())
            .filter(|t| !t.is_empty())
            .collect();

        Self {
            cases: cases.into_iter().map(String::from).collect(),
            document_types: types.into_iter().map(String::from).collect(),
        }
    }
}

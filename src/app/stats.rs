//! Dataset, audit and parser-health statistics
//!
//! Each reduction reads its inputs without modifying them and accepts empty
//! input, producing zero counts.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::app::models::{AuditEntry, ParserReportEntry, Row};
use crate::constants::{messages, values};

/// Counts over the primary dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetStats {
    /// Total rows
    pub total_rows: usize,
    /// Distinct non-empty case numbers
    pub distinct_cases: usize,
    /// Distinct non-empty document types
    pub distinct_document_types: usize,
    /// Distinct non-empty source views
    pub distinct_source_views: usize,
    /// Rows flagged low confidence
    pub low_confidence_rows: usize,
}

impl DatasetStats {
    /// Share of rows flagged low confidence, as a percentage
    pub fn low_confidence_rate(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            (self.low_confidence_rows as f64 / self.total_rows as f64) * 100.0
        }
    }
}

/// Counts over the audit issues
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStats {
    /// Total audit entries
    pub total_issues: usize,
    /// Entries whose issue type is `orphan_document`
    pub orphan_documents: usize,
    /// Dataset cases with no audit entry
    pub clean_cases: usize,
    /// Entry count per lower-cased issue type
    pub issues_by_type: BTreeMap<String, usize>,
}

/// Parser strategy health
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserHealthStats {
    /// Report entries
    pub total_files: usize,
    /// Files parsed with a table strategy
    pub table_mode: usize,
    /// Files parsed with any other strategy
    pub fallback_mode: usize,
    /// `[filename] warning` lines, or the healthy sentinel
    pub warnings: Vec<String>,
}

impl ParserHealthStats {
    /// True when no file reported a warning
    pub fn is_healthy(&self) -> bool {
        self.warnings.len() == 1 && self.warnings[0] == messages::NO_WARNINGS
    }
}

fn distinct_non_empty<'a>(values: impl Iterator<Item = &'a str>) -> HashSet<&'a str> {
    values.filter(|v| !v.is_empty()).collect()
}

/// Compute dataset statistics
pub fn dataset_stats(rows: &[Row]) -> DatasetStats {
    DatasetStats {
        total_rows: rows.len(),
        distinct_cases: distinct_non_empty(rows.iter().map(|r| r.case_number.as_str())).len(),
        distinct_document_types: distinct_non_empty(rows.iter().map(|r| r.document_type.as_str()))
            .len(),
        distinct_source_views: distinct_non_empty(rows.iter().map(|r| r.source_view.as_str()))
            .len(),
        low_confidence_rows: rows.iter().filter(|r| r.is_low_confidence()).count(),
    }
}

/// Compute audit statistics
///
/// `rows` is the current dataset snapshot; pass an empty slice when the
/// primary dataset failed to load, which yields zero clean cases.
pub fn audit_stats(entries: &[AuditEntry], rows: &[Row]) -> AuditStats {
    let mut issues_by_type = BTreeMap::new();
    for entry in entries {
        *issues_by_type
            .entry(entry.issue_type.to_lowercase())
            .or_insert(0) += 1;
    }

    let orphan_documents = entries
        .iter()
        .filter(|e| e.issue_type.eq_ignore_ascii_case(values::ORPHAN_DOCUMENT))
        .count();

    let audited: HashSet<&str> = entries.iter().map(|e| e.case_id.as_str()).collect();
    let clean_cases = distinct_non_empty(rows.iter().map(|r| r.case_number.as_str()))
        .into_iter()
        .filter(|case| !audited.contains(case))
        .count();

    AuditStats {
        total_issues: entries.len(),
        orphan_documents,
        clean_cases,
        issues_by_type,
    }
}

/// Compute parser-health statistics
pub fn parser_health(entries: &[ParserReportEntry]) -> ParserHealthStats {
    let table_mode = entries
        .iter()
        .filter(|e| {
            e.strategy_used
                .to_lowercase()
                .starts_with(values::TABLE_STRATEGY_PREFIX)
        })
        .count();

    let mut warnings: Vec<String> = entries
        .iter()
        .flat_map(|e| {
            e.warnings
                .iter()
                .map(move |w| format!("[{}] {}", e.filename, w))
        })
        .collect();
    if warnings.is_empty() {
        warnings.push(messages::NO_WARNINGS.to_string());
    }

    ParserHealthStats {
        total_files: entries.len(),
        table_mode,
        fallback_mode: entries.len() - table_mode,
        warnings,
    }
}

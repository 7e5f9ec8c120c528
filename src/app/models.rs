//! Data models for the case-document dashboard
//!
//! This module defines the records decoded from pipeline artifacts, the filter
//! state selected by the user, and the immutable snapshots captured per load.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{artifacts, values};

/// The three artifacts consumed by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactKind {
    /// Primary dataset of parsed court documents
    Rows,
    /// Audit issues
    Audit,
    /// Parser strategy report
    ParserReport,
}

impl ArtifactKind {
    /// All artifact kinds in load order
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::Rows,
        ArtifactKind::Audit,
        ArtifactKind::ParserReport,
    ];

    /// Whether the dashboard cannot function without this artifact
    pub fn is_critical(&self) -> bool {
        matches!(self, ArtifactKind::Rows)
    }

    /// Default published file name
    pub fn default_file_name(&self) -> &'static str {
        match self {
            ArtifactKind::Rows => artifacts::ROWS_FILE,
            ArtifactKind::Audit => artifacts::AUDIT_FILE,
            ArtifactKind::ParserReport => artifacts::PARSER_REPORT_FILE,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Rows => "rows",
            ArtifactKind::Audit => "audit",
            ArtifactKind::ParserReport => "parser-report",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One decoded CSV line, keyed by the header it was decoded against
///
/// All records produced from one input share the same header and hold exactly
/// one value per header column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    header: Arc<[String]>,
    values: Vec<String>,
}

impl Record {
    /// Zip `values` against `header`, padding short lines with empty strings and
    /// dropping values beyond the header's column count
    pub fn new(header: Arc<[String]>, mut values: Vec<String>) -> Self {
        values.resize(header.len(), String::new());
        Self { header, values }
    }

    /// Value for a column, `None` if the header has no such column
    pub fn get(&self, column: &str) -> Option<&str> {
        self.header
            .iter()
            .position(|h| h == column)
            .map(|i| self.values[i].as_str())
    }

    /// Value for a column, empty string when the column is absent
    pub fn get_or_empty(&self, column: &str) -> String {
        self.get(column).unwrap_or_default().to_string()
    }

    /// Column names in header order
    pub fn columns(&self) -> &[String] {
        &self.header
    }

    /// `(column, value)` pairs in header order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.header
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the header has no columns
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One case-document record from the primary dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub file_name: String,
    pub case_number: String,
    pub filed_date: String,
    pub document_type: String,
    pub party_petitioner: String,
    pub party_respondent: String,
    pub party_guardian: String,
    pub event_type_code: String,
    pub event_type_label: String,
    pub judge: String,
    pub low_confidence: String,
    pub notes: String,
    pub source_view: String,
    pub document_id: String,
}

impl Row {
    /// Whether the upstream extraction flagged this document as uncertain
    pub fn is_low_confidence(&self) -> bool {
        self.low_confidence == values::LOW_CONFIDENCE_YES
    }

    /// Field value by column name
    pub fn field(&self, column: &str) -> Option<&str> {
        let value = match column {
            "file_name" => &self.file_name,
            "case_number" => &self.case_number,
            "filed_date" => &self.filed_date,
            "document_type" => &self.document_type,
            "party_petitioner" => &self.party_petitioner,
            "party_respondent" => &self.party_respondent,
            "party_guardian" => &self.party_guardian,
            "event_type_code" => &self.event_type_code,
            "event_type_label" => &self.event_type_label,
            "judge" => &self.judge,
            "low_confidence" => &self.low_confidence,
            "notes" => &self.notes,
            "source_view" => &self.source_view,
            "document_id" => &self.document_id,
            _ => return None,
        };
        Some(value.as_str())
    }
}

impl From<&Record> for Row {
    fn from(record: &Record) -> Self {
        Self {
            file_name: record.get_or_empty("file_name"),
            case_number: record.get_or_empty("case_number"),
            filed_date: record.get_or_empty("filed_date"),
            document_type: record.get_or_empty("document_type"),
            party_petitioner: record.get_or_empty("party_petitioner"),
            party_respondent: record.get_or_empty("party_respondent"),
            party_guardian: record.get_or_empty("party_guardian"),
            event_type_code: record.get_or_empty("event_type_code"),
            event_type_label: record.get_or_empty("event_type_label"),
            judge: record.get_or_empty("judge"),
            low_confidence: record.get_or_empty("low_confidence"),
            notes: record.get_or_empty("notes"),
            source_view: record.get_or_empty("source_view"),
            document_id: record.get_or_empty("document_id"),
        }
    }
}

/// One issue reported by the audit step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub issue_type: String,
    pub case_id: String,
    pub detail: String,
    pub file_name: String,
    pub filed_date: String,
}

impl AuditEntry {
    /// Field value by column name
    pub fn field(&self, column: &str) -> Option<&str> {
        let value = match column {
            "issue_type" => &self.issue_type,
            "case_id" => &self.case_id,
            "detail" => &self.detail,
            "file_name" => &self.file_name,
            "filed_date" => &self.filed_date,
            _ => return None,
        };
        Some(value.as_str())
    }
}

impl From<&Record> for AuditEntry {
    fn from(record: &Record) -> Self {
        Self {
            issue_type: record.get_or_empty("issue_type"),
            case_id: record.get_or_empty("case_id"),
            detail: record.get_or_empty("detail"),
            file_name: record.get_or_empty("file_name"),
            filed_date: record.get_or_empty("filed_date"),
        }
    }
}

/// Parser strategy report for one source file
///
/// Missing or null fields decode to their defaults, so one incomplete entry
/// does not reject the whole report. An entry without a strategy counts as
/// fallback mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserReportEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub filename: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub strategy_used: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub warnings: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Confidence criterion of the filter state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceFilter {
    /// No constraint
    #[default]
    Any,
    /// Only rows flagged low confidence
    Low,
    /// Only rows not flagged low confidence
    High,
}

impl ConfidenceFilter {
    /// Parse the selector value used by the presentation layer
    ///
    /// Anything other than `"low"` or `"high"` leaves the criterion unset.
    pub fn from_selector(value: &str) -> Self {
        match value {
            "low" => Self::Low,
            "high" => Self::High,
            _ => Self::Any,
        }
    }
}

/// User-selected filter criteria
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Exact case number
    pub case: Option<String>,
    /// Exact document type
    pub doc_type: Option<String>,
    /// Confidence tri-state
    pub confidence: ConfidenceFilter,
    /// Free text, matched case-insensitively
    pub search: String,
}

impl FilterState {
    /// Create an empty filter state
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: exact case number
    pub fn with_case(mut self, case: impl Into<String>) -> Self {
        self.case = Some(case.into());
        self
    }

    /// Builder: exact document type
    pub fn with_doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    /// Builder: confidence criterion
    pub fn with_confidence(mut self, confidence: ConfidenceFilter) -> Self {
        self.confidence = confidence;
        self
    }

    /// Builder: free-text search
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Active case criterion (empty counts as unset)
    pub fn case_criterion(&self) -> Option<&str> {
        self.case.as_deref().filter(|c| !c.is_empty())
    }

    /// Active document type criterion (empty counts as unset)
    pub fn doc_type_criterion(&self) -> Option<&str> {
        self.doc_type.as_deref().filter(|t| !t.is_empty())
    }

    /// Active search needle, trimmed and lower-cased
    pub fn search_needle(&self) -> Option<String> {
        let trimmed = self.search.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
    }

    /// True when no criterion is active
    pub fn is_empty(&self) -> bool {
        self.case_criterion().is_none()
            && self.doc_type_criterion().is_none()
            && self.confidence == ConfidenceFilter::Any
            && self.search_needle().is_none()
    }
}

/// Immutable records captured at one successful load
///
/// A snapshot is never edited; the next successful load replaces it wholesale.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    items: Arc<[T]>,
    loaded_at: DateTime<Utc>,
}

impl<T> Snapshot<T> {
    /// Capture a snapshot now
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: items.into(),
            loaded_at: Utc::now(),
        }
    }

    /// Captured records
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// When the snapshot was captured
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the snapshot holds no records
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Snapshot of the primary dataset
pub type DatasetSnapshot = Snapshot<Row>;

/// Snapshot of the audit issues
pub type AuditSnapshot = Snapshot<AuditEntry>;

/// Snapshot of the parser report
pub type ReportSnapshot = Snapshot<ParserReportEntry>;

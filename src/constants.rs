//! Application constants for the case-document dashboard
//!
//! This module centralizes the constants used throughout the crate,
//! organized by functional domain.

use std::time::Duration;

/// Artifact file names as published by the processing pipeline
pub mod artifacts {
    /// Primary dataset of parsed court documents
    pub const ROWS_FILE: &str = "court_docs_parsed.csv";

    /// Audit issues produced by the validation step
    pub const AUDIT_FILE: &str = "court_docs_audit.csv";

    /// Per-file parser strategy report
    pub const PARSER_REPORT_FILE: &str = "parse_report.json";
}

/// CSV decoding constants
pub mod csv {
    /// Field delimiter
    pub const DELIMITER: char = ',';

    /// Quote character
    pub const QUOTE: char = '"';
}

/// Row field values with special meaning
pub mod values {
    /// Value of `low_confidence` marking an uncertain extraction
    pub const LOW_CONFIDENCE_YES: &str = "yes";

    /// Audit issue type for documents without a case record
    pub const ORPHAN_DOCUMENT: &str = "orphan_document";

    /// Strategy prefix counted as table mode
    pub const TABLE_STRATEGY_PREFIX: &str = "table";
}

/// User-facing messages rendered in degraded states
pub mod messages {
    /// Fallback row text when the primary dataset cannot be loaded
    pub const ROWS_UNAVAILABLE: &str =
        "Data unavailable. The processing pipeline must be rerun to regenerate court_docs_parsed.csv.";

    /// Advisory shown when no audit issues are available
    pub const NO_AUDIT_ISSUES: &str = "No audit issues reported.";

    /// Message shown when the parser report cannot be loaded
    pub const REPORT_UNAVAILABLE: &str =
        "Parser report unavailable. Rerun the report generation step to produce parse_report.json.";

    /// Headline of the summary panel
    pub const SUMMARY_TITLE: &str = "Case documents";

    /// Sentinel warning entry for a healthy parser report
    pub const NO_WARNINGS: &str = "no warnings, system healthy";
}

/// Render surface target names
pub mod targets {
    /// Primary document table
    pub const DOCUMENTS_TABLE: &str = "documents";

    /// Audit issues table
    pub const AUDIT_TABLE: &str = "audit";

    /// Advisory list under the audit table
    pub const AUDIT_NOTES: &str = "audit-notes";

    /// Parser warnings list
    pub const PARSER_WARNINGS: &str = "parser-warnings";

    /// Region the summary panel is inserted before
    pub const FILTERS_REGION: &str = "filters";
}

/// Named stat slots
pub mod slots {
    pub const TOTAL_DOCS: &str = "stat-total-docs";
    pub const CASES: &str = "stat-cases";
    pub const DOC_TYPES: &str = "stat-doc-types";
    pub const SOURCE_VIEWS: &str = "stat-source-views";
    pub const LOW_CONFIDENCE: &str = "stat-low-confidence";
    pub const FILTERED_DOCS: &str = "stat-filtered-docs";

    pub const AUDIT_ISSUES: &str = "stat-audit-issues";
    pub const ORPHANS: &str = "stat-orphans";
    pub const CLEAN_CASES: &str = "stat-clean-cases";

    pub const PARSED_FILES: &str = "stat-parsed-files";
    pub const TABLE_MODE: &str = "stat-table-mode";
    pub const FALLBACK_MODE: &str = "stat-fallback-mode";

    /// Every slot the controller writes to
    pub const ALL: &[&str] = &[
        TOTAL_DOCS,
        CASES,
        DOC_TYPES,
        SOURCE_VIEWS,
        LOW_CONFIDENCE,
        FILTERED_DOCS,
        AUDIT_ISSUES,
        ORPHANS,
        CLEAN_CASES,
        PARSED_FILES,
        TABLE_MODE,
        FALLBACK_MODE,
    ];
}

/// Columns of the rendered document table, in display order
pub const DOCUMENT_COLUMNS: &[&str] = &[
    "case_number",
    "document_type",
    "filed_date",
    "party_petitioner",
    "party_respondent",
    "party_guardian",
    "event_type_code",
    "event_type_label",
    "judge",
    "low_confidence",
    "notes",
    "file_name",
    "source_view",
    "document_id",
];

/// Columns of the rendered audit table, in display order
pub const AUDIT_COLUMNS: &[&str] = &["issue_type", "case_id", "detail", "file_name"];

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for artifact requests
    pub const USER_AGENT: &str = "casedoc-dashboard/0.1.0";

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
}

/// Retry configuration
pub mod limits {
    /// Maximum retry attempts for transient failures
    pub const MAX_RETRIES: u32 = 2;

    /// Base delay for exponential backoff (milliseconds)
    pub const RETRY_BASE_DELAY_MS: u64 = 250;

    /// Upper bound accepted for configured retries
    pub const MAX_CONFIGURABLE_RETRIES: u32 = 10;
}

/// UI timing constants
pub mod ui {
    use super::Duration;

    /// Debounce quantum for viewport-style recompute triggers
    pub const DEBOUNCE_QUANTUM: Duration = Duration::from_millis(120);

    /// Intent channel capacity
    pub const INTENT_CHANNEL_CAPACITY: usize = 64;
}

/// Configuration file locations
pub mod config_files {
    /// Project-local config file, checked first
    pub const LOCAL_FILE: &str = "./casedoc-dashboard.toml";

    /// Directory under the user config dir
    pub const DIR_NAME: &str = "casedoc-dashboard";

    /// File name inside that directory
    pub const FILE_NAME: &str = "config.toml";
}

/// Logging defaults
pub mod logging {
    /// Target prefix of this crate's events
    pub const CRATE_TARGET: &str = "casedoc_dashboard";

    /// Level used when none is configured
    pub const DEFAULT_LEVEL: &str = "info";

    /// Accepted level names
    pub const LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];
}

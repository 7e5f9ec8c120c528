//! Case Document Dashboard Library
//!
//! The client-side data layer of a case-document dashboard. It loads the
//! parsed-documents table, the audit table and the parser report produced by
//! a document processing pipeline, filters and aggregates them, and renders
//! the results through a pluggable render surface. Each artifact loads
//! independently, so a missing or broken one degrades only its own section.

pub mod app;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};

#[cfg(test)]
mod tests {
    use super::*;
    use constants::*;

    #[test]
    fn test_constants_accessible() {
        assert_eq!(artifacts::ROWS_FILE, "court_docs_parsed.csv");
        assert_eq!(DOCUMENT_COLUMNS.len(), 14);
        assert!(http::USER_AGENT.starts_with("casedoc-dashboard"));
    }

    #[test]
    fn test_error_types() {
        let render_error = errors::RenderError::TargetMissing {
            target: targets::DOCUMENTS_TABLE.to_string(),
        };
        let app_error = AppError::Render(render_error);

        assert_eq!(app_error.category(), "render");
        assert!(!app_error.is_recoverable());
    }
}

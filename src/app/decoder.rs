//! Artifact decoding
//!
//! Delimited text is decoded line by line: the input is split on line breaks
//! first and each data line is then scanned with a quoted-field state machine.
//! Consequently a quoted field cannot contain a line break; the producing
//! pipeline never writes one, and changing this requires changing that contract.
//!
//! Header tokens are split on the delimiter without quote handling.
//!
//! Decoding delimited text never fails. Malformed quoting is tolerated: an
//! unterminated quote simply runs to the end of its line.

use std::sync::Arc;

use tracing::debug;

use crate::app::models::{AuditEntry, ParserReportEntry, Record, Row};
use crate::constants::csv::{DELIMITER, QUOTE};
use crate::errors::DecodeResult;

/// Decode delimited text into header-keyed records
///
/// Blank lines are skipped, so `n` non-empty lines yield `n - 1` records.
///
/// # Example
///
/// ```rust
/// use casedoc_dashboard::app::decoder::decode;
///
/// let records = decode("x,y,z\n\"a\",\"b,c\",\"d\"\"e\"");
/// assert_eq!(records[0].get("y"), Some("b,c"));
/// assert_eq!(records[0].get("z"), Some("d\"e"));
/// ```
pub fn decode(raw: &str) -> Vec<Record> {
    let mut lines = raw
        .trim()
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty());

    let Some(header_line) = lines.next() else {
        return Vec::new();
    };

    let header: Arc<[String]> = header_line
        .split(DELIMITER)
        .map(|token| token.trim().to_string())
        .collect();

    let records: Vec<Record> = lines
        .map(|line| Record::new(header.clone(), split_line(line)))
        .collect();

    debug!(
        "Decoded {} records against {} columns",
        records.len(),
        header.len()
    );
    records
}

/// Split one data line into field values
///
/// A quote toggles quoted mode unless it is immediately followed by another
/// quote, which yields a literal quote. The delimiter only ends a field
/// outside quoted mode. The end of the line always ends the last field.
pub fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            QUOTE if chars.peek() == Some(&QUOTE) => {
                current.push(QUOTE);
                chars.next();
            }
            QUOTE => in_quotes = !in_quotes,
            DELIMITER if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);

    fields
}

/// Decode the primary dataset into typed rows
pub fn decode_rows(raw: &str) -> Vec<Row> {
    decode(raw).iter().map(Row::from).collect()
}

/// Decode the audit artifact into typed entries
pub fn decode_audit(raw: &str) -> Vec<AuditEntry> {
    decode(raw).iter().map(AuditEntry::from).collect()
}

/// Decode the JSON parser report
///
/// # Errors
///
/// Returns `DecodeError::Json` if the content is not a JSON array of report
/// entries.
pub fn decode_parser_report(raw: &str) -> DecodeResult<Vec<ParserReportEntry>> {
    let entries: Vec<ParserReportEntry> = serde_json::from_str(raw)?;
    debug!("Decoded {} parser report entries", entries.len());
    Ok(entries)
}

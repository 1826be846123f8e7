//! Locate rows and columns inside a table snapshot.
//!
//! Everything here is pure. Callers fetch the header row and key column from
//! the backend right before resolving since the table may change between
//! requests.
//!
//! Lookups are linear scans where the first match wins. Tables served through
//! this are at most a few thousand rows and the backend returns the full
//! column on every read anyway.
use tracing::trace;

use crate::errors::{Result, SheetError};
use crate::normalize::normalize;

/// 1-based column index, matching the remote addressing.
pub type ColumnIndex = usize;

/// 1-based row index within the slice that was searched.
pub type RowIndex = usize;

/// Find a column by exact header name.
pub fn resolve_column(headers: &[String], name: &str) -> Result<ColumnIndex> {
    headers
        .iter()
        .position(|header| header == name)
        .map(|idx| idx + 1)
        .ok_or_else(|| SheetError::ColumnNotFound(name.to_string()))
}

/// Find the first value whose normalized form equals the normalized key.
pub fn resolve_row(key_column_values: &[String], key: &str) -> Result<RowIndex> {
    let needle = normalize(key);
    let found = key_column_values
        .iter()
        .position(|value| normalize(value) == needle)
        .map(|idx| idx + 1);

    trace!(%needle, ?found, "resolved row");

    found.ok_or_else(|| SheetError::RowNotFound(key.to_string()))
}

/// Check if any value normalizes to the same key.
pub fn entry_exists(key_column_values: &[String], key: &str) -> bool {
    let needle = normalize(key);
    key_column_values
        .iter()
        .any(|value| normalize(value) == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(vals: &[&str]) -> Vec<String> {
        vals.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn column_found() {
        let headers = strings(&["Nom", "Statut", "Email"]);
        assert_eq!(1, resolve_column(&headers, "Nom").unwrap());
        assert_eq!(3, resolve_column(&headers, "Email").unwrap());
    }

    #[test]
    fn column_match_is_exact() {
        let headers = strings(&["Nom", "Statut"]);
        let err = resolve_column(&headers, "statut").unwrap_err();
        assert!(matches!(err, SheetError::ColumnNotFound(name) if name == "statut"));
        assert!(resolve_column(&headers, " Statut").is_err());
    }

    #[test]
    fn column_empty_header() {
        let err = resolve_column(&[], "Nom").unwrap_err();
        assert!(matches!(err, SheetError::ColumnNotFound(_)));
    }

    #[test]
    fn row_found() {
        let values = strings(&["Nom", "Alice", "Bob"]);
        assert_eq!(2, resolve_row(&values, "alice").unwrap());
        assert_eq!(3, resolve_row(&values, "  BOB ").unwrap());
    }

    #[test]
    fn row_accent_insensitive() {
        let values = strings(&["Élodie", "Zoé"]);
        assert_eq!(2, resolve_row(&values, "zoe").unwrap());
    }

    #[test]
    fn row_transliterated() {
        let values = strings(&["Nom", "Søren", "Łukasz"]);
        assert_eq!(2, resolve_row(&values, "soren").unwrap());
        assert_eq!(3, resolve_row(&values, "LUKASZ").unwrap());
        assert!(entry_exists(&values, " søren "));
    }

    #[test]
    fn row_not_found() {
        let values = strings(&["Alice"]);
        let err = resolve_row(&values, "Bob").unwrap_err();
        assert!(matches!(err, SheetError::RowNotFound(key) if key == "Bob"));
    }

    #[test]
    fn row_first_match_wins() {
        let values = strings(&["x", "Dup", "dup ", "DUP"]);
        assert_eq!(2, resolve_row(&values, "dup").unwrap());
    }

    #[test]
    fn exists() {
        let values = strings(&["test@example.com", "other"]);
        assert!(entry_exists(&values, "  Test@Example.com "));
        assert!(!entry_exists(&values, "missing"));
        assert!(!entry_exists(&[], "anything"));
    }
}

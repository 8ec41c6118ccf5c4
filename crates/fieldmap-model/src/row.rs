//! Raw and cleaned row representations.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A typed, coerced cell value.
///
/// `Missing` serializes as `null`; it is what lenient coercion produces for
/// unparsable input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
    Missing,
}

impl CellValue {
    /// Canonical string for primary-key comparison and deduplication.
    ///
    /// Returns `None` when the value cannot serve as a key (missing, empty
    /// or whitespace-only text, timestamps).
    pub fn as_key(&self) -> Option<String> {
        match self {
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            CellValue::Integer(n) => Some(n.to_string()),
            CellValue::Float(x) => Some(x.to_string()),
            CellValue::Timestamp(_) | CellValue::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }
}

/// One uploaded record before mapping, keyed by the raw column name exactly
/// as it appeared in the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub cells: BTreeMap<String, String>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a cell. A later value for the same raw column overwrites the
    /// earlier one (last-write-wins within row assembly).
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.cells.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RawRow::new();
        for (k, v) in iter {
            row.set(k, v);
        }
        row
    }
}

/// A validated record ready for persistence: coerced values keyed by target
/// field name, plus the extracted primary-key string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanedRow {
    /// Canonical primary-key value, non-empty by construction.
    pub key: String,
    /// Coerced values per target field, `Missing` included.
    pub values: BTreeMap<String, CellValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_extraction() {
        assert_eq!(
            CellValue::Text(" 1001 ".to_string()).as_key().as_deref(),
            Some("1001")
        );
        assert_eq!(CellValue::Integer(42).as_key().as_deref(), Some("42"));
        assert_eq!(CellValue::Text("   ".to_string()).as_key(), None);
        assert_eq!(CellValue::Missing.as_key(), None);
    }

    #[test]
    fn raw_row_last_write_wins() {
        let mut row = RawRow::new();
        row.set("loaner_id", "1");
        row.set("loaner_id", "2");
        assert_eq!(row.get("loaner_id"), Some("2"));
    }

    #[test]
    fn missing_serializes_as_null() {
        let json = serde_json::to_string(&CellValue::Missing).unwrap();
        assert_eq!(json, "null");
        let json = serde_json::to_string(&CellValue::Integer(7)).unwrap();
        assert_eq!(json, "7");
    }
}

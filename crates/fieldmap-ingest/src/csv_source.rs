//! CSV decoding into the pipeline's raw shapes.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use fieldmap_model::RawRow;

use crate::{IngestError, Result};

/// A decoded upload: raw column names in file order plus the raw rows.
#[derive(Debug, Clone, Default)]
pub struct CsvSource {
    /// Column surface forms, first occurrence order, exact duplicates
    /// removed (a repeated header contributes one mapping candidate; its
    /// cells still overwrite earlier ones during row assembly).
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

fn clean_header(raw: &str) -> String {
    raw.trim_matches('\u{feff}').trim().to_string()
}

/// Decodes CSV from any reader.
pub fn read_csv<R: Read>(reader: R) -> Result<CsvSource> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(clean_header)
        .collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(IngestError::NoHeaders);
    }

    let mut columns = Vec::new();
    for header in &headers {
        if !header.is_empty() && !columns.contains(header) {
            columns.push(header.clone());
        }
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = RawRow::new();
        for (index, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            if let Some(cell) = record.get(index) {
                // Repeated headers: the later occurrence wins.
                row.set(header.clone(), cell.trim_matches('\u{feff}'));
            }
        }
        rows.push(row);
    }

    debug!(columns = columns.len(), rows = rows.len(), "decoded csv upload");
    Ok(CsvSource { columns, rows })
}

/// Decodes a CSV file from disk.
pub fn read_csv_path(path: impl AsRef<Path>) -> Result<CsvSource> {
    let file = File::open(path)?;
    read_csv(file)
}

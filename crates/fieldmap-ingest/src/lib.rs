#![deny(unsafe_code)]

//! Upload decoding.
//!
//! Turns a CSV upload into the ordered raw column list and the raw rows the
//! pipeline consumes. Only decoding happens here; no normalization beyond
//! BOM/whitespace trims that keep header surface forms intact.

mod csv_source;

pub use csv_source::{CsvSource, read_csv, read_csv_path};

use thiserror::Error;

/// Failures decoding an upload.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IngestError {
    /// I/O failure reading the upload.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV content.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The upload has no header row.
    #[error("input has no header row")]
    NoHeaders,
}

/// Result type alias for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;

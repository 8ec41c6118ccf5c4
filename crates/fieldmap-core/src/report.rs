//! Upload report assembled by the pipeline.

use std::collections::BTreeMap;

use serde::Serialize;

use fieldmap_model::{CellValue, CleanedRow, FinalMapping, IntakeCounts};

/// Rows included in the report preview.
pub const PREVIEW_ROWS: usize = 5;

/// Everything the caller learns about one processed upload.
#[derive(Debug, Clone, Serialize)]
pub struct IntakeReport {
    /// Destination table name.
    pub table: String,
    /// Raw column names exactly as uploaded.
    pub original_columns: Vec<String>,
    /// Resolved column-to-field assignment.
    pub mapping: BTreeMap<String, String>,
    /// Raw columns left unmapped (no source, dangling target, or lost
    /// conflict).
    pub unmapped_columns: Vec<String>,
    /// Row accounting; always balanced.
    pub counts: IntakeCounts,
    /// Bounded preview of the cleaned rows.
    pub preview: Vec<BTreeMap<String, CellValue>>,
    /// True when the partition was computed but nothing was written.
    pub dry_run: bool,
}

impl IntakeReport {
    pub(crate) fn new(
        table: &str,
        original_columns: &[String],
        mapping: &FinalMapping,
        unmapped_columns: Vec<String>,
        counts: IntakeCounts,
        cleaned: &[CleanedRow],
        dry_run: bool,
    ) -> Self {
        let preview = cleaned
            .iter()
            .take(PREVIEW_ROWS)
            .map(|row| row.values.clone())
            .collect();
        Self {
            table: table.to_string(),
            original_columns: original_columns.to_vec(),
            mapping: mapping.to_map(),
            unmapped_columns,
            counts,
            preview,
            dry_run,
        }
    }
}

//! Batch outcome counters and the conservation law they satisfy.

use serde::{Deserialize, Serialize};

/// Row accounting for one processed upload.
///
/// Every raw row lands in exactly one bucket, so
/// `total_rows == inserted + skipped_existing + dropped_invalid + dropped_duplicate`
/// holds for every report the pipeline produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeCounts {
    /// Raw rows received in the upload.
    pub total_rows: usize,
    /// Rows inserted into the destination (or planned, in a dry run).
    pub inserted: usize,
    /// Rows whose primary key already existed in the destination.
    pub skipped_existing: usize,
    /// Rows dropped for a missing/empty primary key after coercion.
    pub dropped_invalid: usize,
    /// Rows dropped as in-batch duplicates of an earlier primary key.
    pub dropped_duplicate: usize,
}

impl IntakeCounts {
    /// Checks the conservation law.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.total_rows
            == self.inserted + self.skipped_existing + self.dropped_invalid + self.dropped_duplicate
    }
}

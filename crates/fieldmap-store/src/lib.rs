#![deny(unsafe_code)]

//! Destination store abstraction.
//!
//! The pipeline needs two capabilities from a destination: the set of
//! primary-key values already present, and idempotent batch insertion.
//! [`MemoryStore`] backs tests; [`SqliteStore`] is the real destination.

pub mod error;
pub mod memory;
pub mod sqlite;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::collections::BTreeSet;

use fieldmap_model::CleanedRow;

/// Per-batch insertion outcome.
///
/// `collided` counts rows whose primary key turned out to exist despite the
/// pre-check, typically because of a concurrent upload. The destination's
/// uniqueness constraint is the safety mechanism; the pre-check is only a
/// report optimization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertOutcome {
    /// Rows actually written.
    pub inserted: usize,
    /// Rows dropped by the destination's primary-key constraint.
    pub collided: usize,
}

/// Destination store capability.
pub trait KeyStore {
    /// Primary-key values already present in the destination table.
    fn existing_keys(&mut self) -> Result<BTreeSet<String>>;

    /// Inserts a batch of cleaned rows. Re-running with the same batch must
    /// not duplicate rows: keys already present are counted as collided.
    fn insert_rows(&mut self, rows: &[CleanedRow]) -> Result<InsertOutcome>;
}

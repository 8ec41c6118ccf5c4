//! In-memory destination store for tests and dry construction.

use std::collections::BTreeSet;

use fieldmap_model::CleanedRow;

use crate::error::Result;
use crate::{InsertOutcome, KeyStore};

/// Key-set-backed store with the same idempotence contract as the SQLite
/// destination.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    keys: BTreeSet<String>,
    rows: Vec<CleanedRow>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates the destination with existing primary keys.
    pub fn with_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Rows written so far, in insertion order.
    pub fn rows(&self) -> &[CleanedRow] {
        &self.rows
    }
}

impl KeyStore for MemoryStore {
    fn existing_keys(&mut self) -> Result<BTreeSet<String>> {
        Ok(self.keys.clone())
    }

    fn insert_rows(&mut self, rows: &[CleanedRow]) -> Result<InsertOutcome> {
        let mut outcome = InsertOutcome::default();
        for row in rows {
            if self.keys.insert(row.key.clone()) {
                self.rows.push(row.clone());
                outcome.inserted += 1;
            } else {
                outcome.collided += 1;
            }
        }
        Ok(outcome)
    }
}

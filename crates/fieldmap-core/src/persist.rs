//! Idempotent persistence decision layer.
//!
//! Pure partition of cleaned rows against the destination's existing key
//! set. Actual writes, and the collision safety under concurrent uploads,
//! belong to the store.

use std::collections::BTreeSet;

use fieldmap_model::CleanedRow;

/// Insert/skip partition for one batch.
#[derive(Debug, Clone, Default)]
pub struct PersistPlan {
    /// Rows whose primary key is not yet present.
    pub to_insert: Vec<CleanedRow>,
    /// Rows whose primary key already exists in the destination.
    pub skipped_existing: usize,
}

/// Partitions cleaned rows by membership of their primary key in the
/// destination's existing key set.
///
/// Rows already present are never re-inserted and never error. Running the
/// partition again after its inserts have landed yields skip-all.
pub fn partition_rows(rows: Vec<CleanedRow>, existing: &BTreeSet<String>) -> PersistPlan {
    let mut plan = PersistPlan::default();
    for row in rows {
        if existing.contains(&row.key) {
            plan.skipped_existing += 1;
        } else {
            plan.to_insert.push(row);
        }
    }
    plan
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn row(key: &str) -> CleanedRow {
        CleanedRow {
            key: key.to_string(),
            values: BTreeMap::new(),
        }
    }

    #[test]
    fn partitions_against_existing_keys() {
        let existing: BTreeSet<String> = ["1001".to_string()].into_iter().collect();
        let plan = partition_rows(vec![row("1001"), row("1002")], &existing);
        assert_eq!(plan.skipped_existing, 1);
        assert_eq!(plan.to_insert.len(), 1);
        assert_eq!(plan.to_insert[0].key, "1002");
    }

    #[test]
    fn second_run_skips_everything() {
        let rows = vec![row("1001"), row("1002")];
        let mut existing = BTreeSet::new();

        let first = partition_rows(rows.clone(), &existing);
        assert_eq!(first.to_insert.len(), 2);

        for inserted in &first.to_insert {
            existing.insert(inserted.key.clone());
        }

        let second = partition_rows(rows, &existing);
        assert!(second.to_insert.is_empty());
        assert_eq!(second.skipped_existing, 2);
    }
}

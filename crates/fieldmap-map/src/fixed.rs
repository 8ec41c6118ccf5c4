//! Fixed-table resolution pass.

use std::collections::{BTreeMap, BTreeSet};

use fieldmap_model::FixedMappings;

use crate::normalize::normalize_column;

/// Outcome of the fixed-table pass over an upload's columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedResolution {
    /// Normalized column → target field, for columns found in the table.
    pub resolved: BTreeMap<String, String>,
    /// Normalized columns not found, input order, deduplicated. This is
    /// the set forwarded to the oracle.
    pub unresolved: Vec<String>,
}

/// Resolves raw columns against the fixed mapping table.
///
/// Exact-match lookup on the normalized form only. Empty normalized names
/// (blank headers) are neither resolved nor forwarded.
pub fn resolve_fixed(raw_columns: &[String], fixed: &FixedMappings) -> FixedResolution {
    let mut resolution = FixedResolution::default();
    let mut seen = BTreeSet::new();
    for raw in raw_columns {
        let normalized = normalize_column(raw);
        if normalized.is_empty() || !seen.insert(normalized.clone()) {
            continue;
        }
        match fixed.lookup(&normalized) {
            Some(target) => {
                resolution
                    .resolved
                    .insert(normalized, target.to_string());
            }
            None => resolution.unresolved.push(normalized),
        }
    }
    resolution
}

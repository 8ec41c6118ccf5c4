//! Merge of fixed and oracle mappings into the final assignment.

use fieldmap_model::{CandidateMapping, FinalMapping, FixedMappings, TableSchema};
use tracing::{debug, warn};

use crate::normalize::normalize_column;

/// Result of merging the mapping sources over an upload's columns.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    /// Raw column → target field, injective, first-writer-wins.
    pub mapping: FinalMapping,
    /// Raw columns left unmapped: no source resolved them, their target
    /// was absent from the schema, or an earlier column claimed it.
    pub unmapped: Vec<String>,
}

/// Produces the final column-to-field assignment for one upload.
///
/// For each raw column in input order: normalize, consult the fixed table
/// first and the oracle candidate second. The fixed table wins outright
/// when both have an opinion. A column whose resolved target is already
/// claimed by an earlier column is demoted to unmapped rather than failing
/// the request. Targets not present in the schema are discarded before
/// assignment, so every value in the result names a real field.
pub fn merge_mappings(
    raw_columns: &[String],
    fixed: &FixedMappings,
    candidate: &CandidateMapping,
    schema: &TableSchema,
) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();

    for raw in raw_columns {
        let normalized = normalize_column(raw);
        let target = fixed
            .lookup(&normalized)
            .or_else(|| candidate.get(&normalized));

        let Some(target) = target else {
            debug!(column = %raw, "no mapping source resolved column");
            outcome.unmapped.push(raw.clone());
            continue;
        };

        if !schema.contains(target) {
            debug!(column = %raw, target, "discarding mapping to field absent from schema");
            outcome.unmapped.push(raw.clone());
            continue;
        }

        if !outcome.mapping.insert(raw.clone(), target) {
            warn!(
                column = %raw,
                target,
                "target field already claimed by an earlier column, leaving unmapped"
            );
            outcome.unmapped.push(raw.clone());
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use fieldmap_model::{FieldType, TargetField};

    use super::*;

    fn schema() -> TableSchema {
        TableSchema::builtin("llm_mapping")
    }

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn fixed_table_alone_resolves_known_columns() {
        let cols = columns(&["loaner_id", "name", "loan_amount", "total_land", "year"]);
        let outcome = merge_mappings(
            &cols,
            &FixedMappings::builtin(),
            &CandidateMapping::empty(),
            &schema(),
        );
        let map = outcome.mapping.to_map();
        assert_eq!(map.get("loaner_id").map(String::as_str), Some("client_id"));
        assert_eq!(map.get("name").map(String::as_str), Some("full_name"));
        assert_eq!(
            map.get("loan_amount").map(String::as_str),
            Some("client_amount")
        );
        assert_eq!(map.get("total_land").map(String::as_str), Some("total_land"));
        assert_eq!(map.get("year").map(String::as_str), Some("year"));
        assert_eq!(map.len(), 5);
        assert!(outcome.unmapped.is_empty());
    }

    #[test]
    fn fixed_table_beats_oracle_suggestion() {
        let cols = columns(&["loaner_id"]);
        let candidate = CandidateMapping::from_entries([("loaner_id", "full_name")]);
        let outcome = merge_mappings(&cols, &FixedMappings::builtin(), &candidate, &schema());
        assert_eq!(outcome.mapping.get("loaner_id"), Some("client_id"));
    }

    #[test]
    fn oracle_fills_residual_columns() {
        let cols = columns(&["loaner_id", "mobile"]);
        let candidate = CandidateMapping::from_entries([("mobile", "phone_no")]);
        let outcome = merge_mappings(&cols, &FixedMappings::builtin(), &candidate, &schema());
        assert_eq!(outcome.mapping.get("mobile"), Some("phone_no"));
        assert_eq!(outcome.mapping.len(), 2);
    }

    #[test]
    fn first_writer_wins_on_target_conflict() {
        // Both surface forms normalize to the fixed-table key "loaner_id".
        let cols = columns(&["Loaner ID", "loaner_id"]);
        let outcome = merge_mappings(
            &cols,
            &FixedMappings::builtin(),
            &CandidateMapping::empty(),
            &schema(),
        );
        assert_eq!(outcome.mapping.get("Loaner ID"), Some("client_id"));
        assert_eq!(outcome.mapping.get("loaner_id"), None);
        assert_eq!(outcome.unmapped, vec!["loaner_id".to_string()]);
    }

    #[test]
    fn dangling_target_is_discarded_silently() {
        let cols = columns(&["mystery"]);
        let candidate = CandidateMapping::from_entries([("mystery", "no_such_field")]);
        let outcome = merge_mappings(&cols, &FixedMappings::builtin(), &candidate, &schema());
        assert!(outcome.mapping.is_empty());
        assert_eq!(outcome.unmapped, vec!["mystery".to_string()]);
    }

    #[test]
    fn fixed_entry_pointing_outside_schema_is_discarded() {
        let narrow = TableSchema::new(
            "t",
            vec![TargetField::new("client_id", FieldType::Text).primary_key()],
        )
        .unwrap();
        let cols = columns(&["loaner_id", "year"]);
        let outcome = merge_mappings(
            &cols,
            &FixedMappings::builtin(),
            &CandidateMapping::empty(),
            &narrow,
        );
        assert_eq!(outcome.mapping.get("loaner_id"), Some("client_id"));
        assert_eq!(outcome.unmapped, vec!["year".to_string()]);
    }
}

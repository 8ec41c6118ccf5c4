use std::collections::BTreeSet;

use fieldmap_map::{merge_mappings, normalize_column, resolve_fixed};
use fieldmap_model::{CandidateMapping, FixedMappings, TableSchema};
use proptest::prelude::*;

fn schema() -> TableSchema {
    TableSchema::builtin("llm_mapping")
}

#[test]
fn known_upload_maps_exactly_with_empty_oracle() {
    let columns: Vec<String> = ["loaner_id", "name", "loan_amount", "total_land", "year"]
        .iter()
        .map(|s| (*s).to_string())
        .collect();
    let outcome = merge_mappings(
        &columns,
        &FixedMappings::builtin(),
        &CandidateMapping::empty(),
        &schema(),
    );
    let map = outcome.mapping.to_map();
    let expected: Vec<(&str, &str)> = vec![
        ("loaner_id", "client_id"),
        ("name", "full_name"),
        ("loan_amount", "client_amount"),
        ("total_land", "total_land"),
        ("year", "year"),
    ];
    assert_eq!(map.len(), expected.len());
    for (raw, target) in expected {
        assert_eq!(map.get(raw).map(String::as_str), Some(target));
    }
}

#[test]
fn oracle_outage_leaves_fixed_results_intact() {
    // An unavailable oracle degrades to an empty candidate mapping; the
    // fixed table's resolution is unaffected.
    let columns: Vec<String> = vec!["loaner_id".to_string(), "customer_age".to_string()];
    let outcome = merge_mappings(
        &columns,
        &FixedMappings::builtin(),
        &CandidateMapping::empty(),
        &schema(),
    );
    assert_eq!(outcome.mapping.get("loaner_id"), Some("client_id"));
    assert_eq!(outcome.unmapped, vec!["customer_age".to_string()]);
}

#[test]
fn residual_columns_are_the_fixed_table_misses() {
    let columns: Vec<String> = vec![
        "loaner_id".to_string(),
        "mobile".to_string(),
        "region".to_string(),
    ];
    let resolution = resolve_fixed(&columns, &FixedMappings::builtin());
    assert_eq!(
        resolution.unresolved,
        vec!["mobile".to_string(), "region".to_string()]
    );
}

fn arb_column() -> impl Strategy<Value = String> {
    // Mix of headers the fixed table knows, near-misses, and noise.
    prop_oneof![
        Just("loaner_id".to_string()),
        Just("Loaner ID".to_string()),
        Just("name".to_string()),
        Just("loan_amount".to_string()),
        Just("LOAN-AMOUNT".to_string()),
        Just("total_land".to_string()),
        Just("year".to_string()),
        Just("phone_no".to_string()),
        "[ -~]{0,16}",
    ]
}

fn arb_candidate() -> impl Strategy<Value = CandidateMapping> {
    proptest::collection::btree_map("[a-z_ ]{0,12}", "[a-z_]{0,16}", 0..8)
        .prop_map(CandidateMapping::from_entries)
}

proptest! {
    // Every value in the final mapping names a field of the schema.
    #[test]
    fn mapping_values_stay_inside_schema(
        columns in proptest::collection::vec(arb_column(), 0..12),
        candidate in arb_candidate(),
    ) {
        let outcome = merge_mappings(&columns, &FixedMappings::builtin(), &candidate, &schema());
        for (_, target) in outcome.mapping.iter() {
            prop_assert!(schema().contains(target));
        }
    }

    // No two kept columns share a target, and no target appears twice.
    #[test]
    fn mapping_is_injective(
        columns in proptest::collection::vec(arb_column(), 0..12),
        candidate in arb_candidate(),
    ) {
        let outcome = merge_mappings(&columns, &FixedMappings::builtin(), &candidate, &schema());
        let mut raws = BTreeSet::new();
        let mut targets = BTreeSet::new();
        for (raw, target) in outcome.mapping.iter() {
            prop_assert!(raws.insert(raw.to_string()));
            prop_assert!(targets.insert(target.to_string()));
        }
        prop_assert!(outcome.mapping.len() <= schema().fields().len());
    }

    // Every mapped key is one of the original raw columns.
    #[test]
    fn mapping_keys_come_from_input(
        columns in proptest::collection::vec(arb_column(), 0..12),
        candidate in arb_candidate(),
    ) {
        let outcome = merge_mappings(&columns, &FixedMappings::builtin(), &candidate, &schema());
        for (raw, _) in outcome.mapping.iter() {
            prop_assert!(columns.iter().any(|c| c == raw));
        }
    }

    // A fixed-table hit ignores whatever the oracle proposes for that column.
    #[test]
    fn fixed_precedence_over_oracle(candidate in arb_candidate()) {
        let columns = vec!["loaner_id".to_string()];
        let outcome = merge_mappings(&columns, &FixedMappings::builtin(), &candidate, &schema());
        prop_assert_eq!(outcome.mapping.get("loaner_id"), Some("client_id"));
    }

    // Normalization is total and idempotent.
    #[test]
    fn normalization_is_idempotent(raw in "\\PC{0,24}") {
        let once = normalize_column(&raw);
        prop_assert_eq!(normalize_column(&once), once.clone());
    }
}

//! Row sanitation: mapping application, type coercion, validity checks,
//! and in-batch deduplication.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use tracing::debug;

use fieldmap_model::{CellValue, CleanedRow, FieldType, FinalMapping, RawRow, TableSchema};

/// Result of sanitizing one batch of raw rows.
#[derive(Debug, Clone, Default)]
pub struct SanitizeOutcome {
    /// Valid, deduplicated rows in input order.
    pub rows: Vec<CleanedRow>,
    /// Rows dropped for a missing/empty primary key after coercion.
    pub dropped_invalid: usize,
    /// Rows dropped as later duplicates of an in-batch primary key.
    pub dropped_duplicate: usize,
}

/// Coercion rule table: one declared type, one lenient parse.
///
/// Parse failures land on [`CellValue::Missing`], never an error; timestamp
/// fields are server-set and ignore input entirely.
pub fn coerce(field_type: FieldType, raw: &str) -> CellValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CellValue::Missing;
    }
    match field_type {
        FieldType::Text => CellValue::Text(trimmed.to_string()),
        FieldType::Float => trimmed
            .parse::<f64>()
            .map_or(CellValue::Missing, CellValue::Float),
        FieldType::Integer => coerce_integer(trimmed),
        FieldType::Timestamp => CellValue::Missing,
    }
}

/// Integers tolerate the `"2021.0"` surface form spreadsheet exports
/// produce for whole numbers.
fn coerce_integer(trimmed: &str) -> CellValue {
    if let Ok(n) = trimmed.parse::<i64>() {
        return CellValue::Integer(n);
    }
    match trimmed.parse::<f64>() {
        Ok(x) if x.fract() == 0.0 && x >= i64::MIN as f64 && x <= i64::MAX as f64 => {
            CellValue::Integer(x as i64)
        }
        _ => CellValue::Missing,
    }
}

/// Applies the final mapping to every raw row, coerces values per the
/// schema's declared types, drops rows without a usable primary key, and
/// deduplicates by primary-key value (first occurrence kept).
///
/// Timestamp fields are set to `now` on every kept row.
pub fn sanitize_rows(
    raw_rows: &[RawRow],
    mapping: &FinalMapping,
    schema: &TableSchema,
    now: DateTime<Utc>,
) -> SanitizeOutcome {
    let pk_field = &schema.primary_key().name;
    let mut outcome = SanitizeOutcome::default();
    let mut seen_keys = BTreeSet::new();

    for (index, raw_row) in raw_rows.iter().enumerate() {
        let mut values: BTreeMap<String, CellValue> = BTreeMap::new();

        for (raw_column, target) in mapping.iter() {
            let field = schema
                .field(target)
                .expect("final mapping targets exist in schema");
            let value = raw_row
                .get(raw_column)
                .map_or(CellValue::Missing, |cell| coerce(field.field_type, cell));
            values.insert(target.to_string(), value);
        }

        for field in schema.fields() {
            if field.field_type == FieldType::Timestamp {
                values.insert(field.name.clone(), CellValue::Timestamp(now));
            }
        }

        let key = values.get(pk_field).and_then(CellValue::as_key);
        let Some(key) = key else {
            debug!(row = index, "dropping row with missing or empty primary key");
            outcome.dropped_invalid += 1;
            continue;
        };

        if !seen_keys.insert(key.clone()) {
            debug!(row = index, key = %key, "dropping in-batch duplicate primary key");
            outcome.dropped_duplicate += 1;
            continue;
        }

        outcome.rows.push(CleanedRow { key, values });
    }

    outcome
}

#[cfg(test)]
mod tests {
    use fieldmap_model::FixedMappings;

    use super::*;

    fn mapping() -> FinalMapping {
        let mut mapping = FinalMapping::new();
        for (raw, target) in FixedMappings::builtin().iter() {
            mapping.insert(raw, target);
        }
        mapping
    }

    fn schema() -> TableSchema {
        TableSchema::builtin("llm_mapping")
    }

    fn row(entries: &[(&str, &str)]) -> RawRow {
        entries.iter().copied().collect()
    }

    #[test]
    fn coercion_rule_table() {
        assert_eq!(
            coerce(FieldType::Text, "  Asha  "),
            CellValue::Text("Asha".to_string())
        );
        assert_eq!(coerce(FieldType::Float, "12.5"), CellValue::Float(12.5));
        assert_eq!(coerce(FieldType::Float, "abc"), CellValue::Missing);
        assert_eq!(coerce(FieldType::Integer, "2021"), CellValue::Integer(2021));
        assert_eq!(
            coerce(FieldType::Integer, "2021.0"),
            CellValue::Integer(2021)
        );
        assert_eq!(coerce(FieldType::Integer, "20.5"), CellValue::Missing);
        assert_eq!(coerce(FieldType::Timestamp, "2021-01-01"), CellValue::Missing);
        assert_eq!(coerce(FieldType::Text, "   "), CellValue::Missing);
    }

    #[test]
    fn maps_and_coerces_a_valid_row() {
        let rows = vec![row(&[
            ("loaner_id", "1001"),
            ("name", " Asha Rao "),
            ("loan_amount", "2500.50"),
            ("total_land", "3.2"),
            ("year", "2021"),
        ])];
        let outcome = sanitize_rows(&rows, &mapping(), &schema(), Utc::now());
        assert_eq!(outcome.rows.len(), 1);
        let cleaned = &outcome.rows[0];
        assert_eq!(cleaned.key, "1001");
        assert_eq!(
            cleaned.values.get("full_name"),
            Some(&CellValue::Text("Asha Rao".to_string()))
        );
        assert_eq!(
            cleaned.values.get("client_amount"),
            Some(&CellValue::Float(2500.50))
        );
        assert_eq!(cleaned.values.get("year"), Some(&CellValue::Integer(2021)));
        assert!(matches!(
            cleaned.values.get("created_at"),
            Some(CellValue::Timestamp(_))
        ));
    }

    #[test]
    fn empty_primary_key_drops_row() {
        let rows = vec![
            row(&[("loaner_id", ""), ("name", "Valid Otherwise")]),
            row(&[("loaner_id", "   "), ("name", "Whitespace Key")]),
            row(&[("name", "No Key Cell")]),
        ];
        let outcome = sanitize_rows(&rows, &mapping(), &schema(), Utc::now());
        assert!(outcome.rows.is_empty());
        assert_eq!(outcome.dropped_invalid, 3);
        assert_eq!(outcome.dropped_duplicate, 0);
    }

    #[test]
    fn in_batch_duplicates_keep_first() {
        let rows = vec![
            row(&[("loaner_id", "1001"), ("name", "First")]),
            row(&[("loaner_id", "1001"), ("name", "Second")]),
            row(&[("loaner_id", "1002"), ("name", "Other")]),
        ];
        let outcome = sanitize_rows(&rows, &mapping(), &schema(), Utc::now());
        assert_eq!(outcome.rows.len(), 2);
        assert_eq!(outcome.dropped_duplicate, 1);
        assert_eq!(
            outcome.rows[0].values.get("full_name"),
            Some(&CellValue::Text("First".to_string()))
        );
    }

    #[test]
    fn bad_numerics_null_out_without_dropping_the_row() {
        let rows = vec![row(&[
            ("loaner_id", "1001"),
            ("loan_amount", "not-a-number"),
            ("year", "twenty21"),
        ])];
        let outcome = sanitize_rows(&rows, &mapping(), &schema(), Utc::now());
        assert_eq!(outcome.rows.len(), 1);
        assert_eq!(
            outcome.rows[0].values.get("client_amount"),
            Some(&CellValue::Missing)
        );
        assert_eq!(outcome.rows[0].values.get("year"), Some(&CellValue::Missing));
    }
}

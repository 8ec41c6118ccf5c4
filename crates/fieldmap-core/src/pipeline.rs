//! End-to-end intake pipeline.
//!
//! Orchestrates mapping resolution, sanitation, and the idempotent
//! persistence decision for one upload. Holds only borrowed, read-only
//! configuration, so concurrent uploads share nothing mutable.

use chrono::Utc;
use tracing::{info, warn};

use fieldmap_map::{MergeOutcome, merge_mappings, resolve_fixed};
use fieldmap_model::{
    CandidateMapping, FixedMappings, IntakeCounts, IntakeError, RawRow, Result, TableSchema,
};
use fieldmap_oracle::{MappingOracle, OracleError};
use fieldmap_store::KeyStore;

use crate::persist::partition_rows;
use crate::report::{IntakeReport, PREVIEW_ROWS};
use crate::sanitize::sanitize_rows;

/// Per-upload knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntakeOptions {
    /// Compute the insert/skip partition without writing. `inserted` in
    /// the report then means "would insert".
    pub dry_run: bool,
}

/// One upload's processing unit. Construct once per request from the
/// injected read-only schema and fixed table.
pub struct IntakePipeline<'a> {
    schema: &'a TableSchema,
    fixed: &'a FixedMappings,
}

impl<'a> IntakePipeline<'a> {
    pub fn new(schema: &'a TableSchema, fixed: &'a FixedMappings) -> Self {
        Self { schema, fixed }
    }

    /// Resolves the final column-to-field mapping for an upload's columns.
    ///
    /// The fixed table is consulted first; only the residual columns go to
    /// the oracle, in a single request. An unavailable oracle degrades to
    /// zero additional mappings; a rejected credential aborts with the
    /// access-denied classification.
    pub fn resolve_mapping(
        &self,
        columns: &[String],
        oracle: &dyn MappingOracle,
    ) -> Result<MergeOutcome> {
        let resolution = resolve_fixed(columns, self.fixed);
        info!(
            fixed = resolution.resolved.len(),
            residual = resolution.unresolved.len(),
            "fixed-table pass complete"
        );

        let candidate = if resolution.unresolved.is_empty() {
            CandidateMapping::empty()
        } else {
            match oracle.resolve(&resolution.unresolved, &self.schema.mappable_field_names()) {
                Ok(candidate) => {
                    info!(proposals = candidate.len(), "oracle responded");
                    candidate
                }
                Err(OracleError::Auth { status }) => {
                    return Err(IntakeError::OracleAuth(format!("status {status}")));
                }
                Err(err @ OracleError::Unavailable(_)) => {
                    warn!(error = %err, "oracle unavailable, proceeding with fixed mappings only");
                    CandidateMapping::empty()
                }
            }
        };

        Ok(merge_mappings(columns, self.fixed, &candidate, self.schema))
    }

    /// Runs the full pipeline over one upload.
    ///
    /// Fails fast when no column resolves the primary-key field; per-row
    /// problems are absorbed into the report's counts.
    pub fn run(
        &self,
        columns: &[String],
        rows: &[RawRow],
        oracle: &dyn MappingOracle,
        store: &mut dyn KeyStore,
        options: IntakeOptions,
    ) -> Result<IntakeReport> {
        let outcome = self.resolve_mapping(columns, oracle)?;

        let pk_field = &self.schema.primary_key().name;
        if !outcome.mapping.contains_target(pk_field) {
            return Err(IntakeError::NoPrimaryKeyMapped(pk_field.clone()));
        }

        let sanitized = sanitize_rows(rows, &outcome.mapping, self.schema, Utc::now());
        info!(
            cleaned = sanitized.rows.len(),
            dropped_invalid = sanitized.dropped_invalid,
            dropped_duplicate = sanitized.dropped_duplicate,
            "sanitation complete"
        );

        let existing = store
            .existing_keys()
            .map_err(|err| IntakeError::Store(err.to_string()))?;
        // Preview shows cleaned rows regardless of the insert/skip split.
        let preview: Vec<_> = sanitized.rows.iter().take(PREVIEW_ROWS).cloned().collect();
        let plan = partition_rows(sanitized.rows, &existing);

        let mut skipped_existing = plan.skipped_existing;
        let inserted = if options.dry_run {
            plan.to_insert.len()
        } else {
            let inserted = store
                .insert_rows(&plan.to_insert)
                .map_err(|err| IntakeError::Store(err.to_string()))?;
            // A key that appeared between the pre-check and the insert is a
            // lost race, reclassified as skipped.
            skipped_existing += inserted.collided;
            inserted.inserted
        };

        let counts = IntakeCounts {
            total_rows: rows.len(),
            inserted,
            skipped_existing,
            dropped_invalid: sanitized.dropped_invalid,
            dropped_duplicate: sanitized.dropped_duplicate,
        };
        debug_assert!(counts.is_balanced(), "row accounting must balance");

        Ok(IntakeReport::new(
            self.schema.table(),
            columns,
            &outcome.mapping,
            outcome.unmapped,
            counts,
            &preview,
            options.dry_run,
        ))
    }
}

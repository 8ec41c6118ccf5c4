//! Command implementations.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use fieldmap_core::{IntakeOptions, IntakePipeline, IntakeReport};
use fieldmap_ingest::read_csv_path;
use fieldmap_map::MergeOutcome;
use fieldmap_model::{FixedMappings, TableSchema};
use fieldmap_store::SqliteStore;

use crate::cli::{IntakeArgs, MappingArgs, SchemaArgs};
use crate::config::build_oracle;

/// Resolved mapping plus the upload's columns, for `mapping` output.
pub struct MappingRun {
    pub columns: Vec<String>,
    pub outcome: MergeOutcome,
}

fn load_fixed(path: Option<&Path>) -> Result<FixedMappings> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read fixed map {}", path.display()))?;
            let fixed: FixedMappings = serde_json::from_str(&text)
                .with_context(|| format!("invalid fixed map {}", path.display()))?;
            info!(entries = fixed.len(), "loaded fixed mapping override");
            Ok(fixed)
        }
        None => Ok(FixedMappings::builtin()),
    }
}

pub fn run_intake(args: &IntakeArgs) -> Result<IntakeReport> {
    let schema = TableSchema::builtin(&args.table);
    let fixed = load_fixed(args.fixed_map.as_deref())?;
    let oracle = build_oracle(&args.oracle)?;

    let source = read_csv_path(&args.file)
        .with_context(|| format!("failed to decode {}", args.file.display()))?;
    info!(
        file = %args.file.display(),
        columns = source.columns.len(),
        rows = source.rows.len(),
        "upload decoded"
    );

    let mut store = SqliteStore::open(&args.db, schema.clone())
        .with_context(|| format!("failed to open database {}", args.db.display()))?;

    let pipeline = IntakePipeline::new(&schema, &fixed);
    let report = pipeline.run(
        &source.columns,
        &source.rows,
        oracle.as_ref(),
        &mut store,
        IntakeOptions {
            dry_run: args.dry_run,
        },
    )?;
    Ok(report)
}

pub fn run_mapping(args: &MappingArgs) -> Result<MappingRun> {
    let schema = TableSchema::builtin(&args.table);
    let fixed = load_fixed(args.fixed_map.as_deref())?;
    let oracle = build_oracle(&args.oracle)?;

    let source = read_csv_path(&args.file)
        .with_context(|| format!("failed to decode {}", args.file.display()))?;

    let pipeline = IntakePipeline::new(&schema, &fixed);
    let outcome = pipeline.resolve_mapping(&source.columns, oracle.as_ref())?;
    Ok(MappingRun {
        columns: source.columns,
        outcome,
    })
}

pub fn run_schema(args: &SchemaArgs) -> TableSchema {
    TableSchema::builtin(&args.table)
}

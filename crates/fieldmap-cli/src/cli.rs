//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "fieldmap",
    version,
    about = "Map spreadsheet columns onto a destination schema and load the rows",
    long_about = "Resolve an upload's columns against a fixed destination schema using a \n\
                  hand-curated synonym table with a semantic-mapping oracle as fallback, \n\
                  then sanitize, deduplicate, and idempotently insert the rows."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,
}

#[derive(Subcommand)]
pub enum Command {
    /// Process an upload end to end: map, clean, deduplicate, insert.
    Intake(IntakeArgs),

    /// Resolve and print the column-to-field mapping without touching rows.
    Mapping(MappingArgs),

    /// Print the destination schema.
    Schema(SchemaArgs),
}

#[derive(Parser)]
pub struct IntakeArgs {
    /// CSV file to ingest.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Destination table name.
    #[arg(long = "table", default_value = "llm_mapping")]
    pub table: String,

    /// SQLite database file.
    #[arg(long = "db", value_name = "PATH", default_value = "fieldmap.db")]
    pub db: PathBuf,

    /// Compute the insert/skip partition without writing rows.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Report output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: ReportFormatArg,

    /// JSON file overriding the built-in fixed mapping table.
    #[arg(long = "fixed-map", value_name = "PATH")]
    pub fixed_map: Option<PathBuf>,

    #[command(flatten)]
    pub oracle: OracleArgs,
}

#[derive(Parser)]
pub struct MappingArgs {
    /// CSV file whose header row is resolved.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Destination table name.
    #[arg(long = "table", default_value = "llm_mapping")]
    pub table: String,

    /// JSON file overriding the built-in fixed mapping table.
    #[arg(long = "fixed-map", value_name = "PATH")]
    pub fixed_map: Option<PathBuf>,

    #[command(flatten)]
    pub oracle: OracleArgs,
}

#[derive(Parser)]
pub struct SchemaArgs {
    /// Destination table name.
    #[arg(long = "table", default_value = "llm_mapping")]
    pub table: String,
}

/// Oracle connection flags. Both fall back to environment variables so
/// credentials stay out of shell history.
#[derive(Parser)]
pub struct OracleArgs {
    /// Semantic mapping oracle endpoint (env: FIELDMAP_ORACLE_URL).
    #[arg(long = "oracle-url", value_name = "URL")]
    pub oracle_url: Option<String>,

    /// Bearer token for the oracle (env: FIELDMAP_ORACLE_TOKEN).
    #[arg(long = "oracle-token", value_name = "TOKEN")]
    pub oracle_token: Option<String>,

    /// Skip the oracle even when configured; fixed mappings only.
    #[arg(long = "no-oracle")]
    pub no_oracle: bool,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

/// Report format choices.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormatArg {
    Table,
    Json,
}

#![deny(unsafe_code)]

//! Data model for the fieldmap intake pipeline.
//!
//! This crate defines the target schema types, cell values, raw and cleaned
//! rows, the mapping tables exchanged between pipeline stages, and the
//! shared error taxonomy. It carries no I/O.

pub mod counts;
pub mod error;
pub mod mapping;
pub mod row;
pub mod schema;

pub use counts::IntakeCounts;
pub use error::{IntakeError, Result};
pub use mapping::{CandidateMapping, FinalMapping, FixedMappings};
pub use row::{CellValue, CleanedRow, RawRow};
pub use schema::{FieldType, TableSchema, TargetField};

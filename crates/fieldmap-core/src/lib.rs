#![deny(unsafe_code)]

//! Row sanitation, idempotent persistence decisions, and the end-to-end
//! intake pipeline.

pub mod persist;
pub mod pipeline;
pub mod report;
pub mod sanitize;

pub use persist::{PersistPlan, partition_rows};
pub use pipeline::{IntakeOptions, IntakePipeline};
pub use report::{IntakeReport, PREVIEW_ROWS};
pub use sanitize::{SanitizeOutcome, coerce, sanitize_rows};

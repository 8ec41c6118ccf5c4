#![deny(unsafe_code)]

//! Mapping resolution: column normalization, fixed-table lookup, and the
//! conflict-free merge that produces the final column-to-field assignment.

pub mod fixed;
pub mod merge;
pub mod normalize;

pub use fixed::{FixedResolution, resolve_fixed};
pub use merge::{MergeOutcome, merge_mappings};
pub use normalize::normalize_column;

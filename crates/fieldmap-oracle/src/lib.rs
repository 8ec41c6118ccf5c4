#![deny(unsafe_code)]

//! Semantic mapping oracle client.
//!
//! The oracle is any external service that proposes column-to-field
//! correspondences. It is modeled as the [`MappingOracle`] capability so a
//! deterministic stub can substitute the live HTTP service in tests.

pub mod client;
pub mod error;
pub mod stub;

pub use client::HttpOracle;
pub use error::{OracleError, Result};
pub use stub::{FailingOracle, StaticOracle};

use fieldmap_model::CandidateMapping;

/// Capability to resolve unmapped columns against a target field list.
pub trait MappingOracle {
    /// Proposes a mapping for the unresolved columns.
    ///
    /// Implementations must filter their answer to keys from `unmapped` and
    /// values from `targets`; callers merge the result without re-checking
    /// key provenance (target membership is still re-validated downstream).
    fn resolve(&self, unmapped: &[String], targets: &[String]) -> Result<CandidateMapping>;
}

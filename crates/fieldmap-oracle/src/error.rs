//! Error types for the oracle client.

use thiserror::Error;

/// Failures signaled by the semantic mapping oracle.
///
/// Only two classifications exist on purpose: a rejected credential must be
/// surfaced as access-denied, while everything else (transport failure,
/// timeout, unparsable payload) collapses into [`OracleError::Unavailable`],
/// which callers treat as "zero additional mappings obtained". The enum is
/// deliberately closed so callers must decide both cases.
#[derive(Debug, Error)]
pub enum OracleError {
    /// Credential rejected (HTTP 401/403).
    #[error("oracle rejected credentials (status {status})")]
    Auth {
        /// HTTP status returned by the oracle.
        status: u16,
    },

    /// Transport failure, timeout, non-success status, or a response that
    /// does not parse as a column mapping.
    #[error("oracle unavailable: {0}")]
    Unavailable(String),
}

impl OracleError {
    /// True when the pipeline should degrade to fixed mappings only rather
    /// than abort the request.
    #[must_use]
    pub fn is_degradable(&self) -> bool {
        matches!(self, OracleError::Unavailable(_))
    }
}

impl From<reqwest::Error> for OracleError {
    fn from(err: reqwest::Error) -> Self {
        OracleError::Unavailable(err.to_string())
    }
}

impl From<serde_json::Error> for OracleError {
    fn from(err: serde_json::Error) -> Self {
        OracleError::Unavailable(format!("invalid JSON response: {err}"))
    }
}

/// Result type alias for oracle operations.
pub type Result<T> = std::result::Result<T, OracleError>;

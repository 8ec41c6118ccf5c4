//! Request-level error taxonomy.
//!
//! Per-row and per-column problems never become error values: invalid rows,
//! in-batch duplicates, and dangling mapping targets are absorbed locally
//! and reflected only in counts. The variants here are the conditions that
//! abort a whole upload and need a stable classification upstream.

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IntakeError {
    /// No source column resolves to the schema's primary-key field; no row
    /// could ever be validly inserted. Client-input error.
    #[error("no source column maps to primary key field '{0}'")]
    NoPrimaryKeyMapped(String),

    /// The semantic oracle rejected the credential. Access-denied, never
    /// silently treated as "no mapping".
    #[error("oracle rejected credentials: {0}")]
    OracleAuth(String),

    /// Destination store unreachable or rejecting the batch for reasons
    /// other than a primary-key collision. Server-side error.
    #[error("store error: {0}")]
    Store(String),

    /// Malformed target schema (duplicate fields, missing primary key).
    #[error("invalid schema: {0}")]
    Schema(String),
}

impl IntakeError {
    /// True when the condition is the uploader's fault rather than an
    /// infrastructure failure.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            IntakeError::NoPrimaryKeyMapped(_) | IntakeError::Schema(_)
        )
    }

    /// True for the access-denied classification.
    #[must_use]
    pub fn is_access_denied(&self) -> bool {
        matches!(self, IntakeError::OracleAuth(_))
    }
}

pub type Result<T> = std::result::Result<T, IntakeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(IntakeError::NoPrimaryKeyMapped("client_id".into()).is_client_error());
        assert!(IntakeError::OracleAuth("403".into()).is_access_denied());
        assert!(!IntakeError::Store("down".into()).is_client_error());
        assert!(!IntakeError::Store("down".into()).is_access_denied());
    }
}

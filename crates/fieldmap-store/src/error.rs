//! Error types for destination store operations.

use thiserror::Error;

/// Failures from the destination store.
///
/// Primary-key collisions are not errors: implementations absorb them into
/// [`InsertOutcome::collided`](crate::InsertOutcome) so a racing duplicate
/// upload is reported as skipped, never as a failed request.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// Underlying SQLite failure.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Table name is not a plain identifier and cannot be interpolated
    /// into DDL safely.
    #[error("invalid table name '{0}'")]
    InvalidTableName(String),

    /// A destination column uses a type the schema model cannot express.
    #[error("unsupported column type '{column_type}' on column '{column}'")]
    UnsupportedType {
        /// Column name in the destination table.
        column: String,
        /// Declared SQL type.
        column_type: String,
    },

    /// An existing destination table does not form a usable schema
    /// (missing table, no primary key, duplicate columns).
    #[error("invalid destination schema: {0}")]
    InvalidSchema(String),
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

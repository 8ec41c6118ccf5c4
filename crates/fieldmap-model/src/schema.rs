//! Target schema definitions.
//!
//! A [`TableSchema`] is the ordered set of destination fields an upload is
//! mapped onto. It is queried once per request and treated as read-only for
//! the request's duration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{IntakeError, Result};

/// Declared type of a destination field, driving value coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Free text. Values are trimmed.
    Text,
    /// Floating-point numeric.
    Float,
    /// Integral numeric.
    Integer,
    /// Server-set creation timestamp. Never read from input.
    Timestamp,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Float => "float",
            FieldType::Integer => "integer",
            FieldType::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "string" | "varchar" | "char" => Ok(FieldType::Text),
            "float" | "real" | "double" | "numeric" => Ok(FieldType::Float),
            "integer" | "int" | "bigint" => Ok(FieldType::Integer),
            "timestamp" | "datetime" => Ok(FieldType::Timestamp),
            other => Err(format!("unknown field type: {other}")),
        }
    }
}

/// One column of the destination schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetField {
    /// Destination column name.
    pub name: String,
    /// Declared type, used by the row sanitizer's coercion table.
    pub field_type: FieldType,
    /// True for the single primary-key field.
    pub is_primary_key: bool,
}

impl TargetField {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            is_primary_key: false,
        }
    }

    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }
}

/// Ordered destination schema for one table.
///
/// Invariants enforced at construction: field names are unique and exactly
/// one field is the primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    table: String,
    fields: Vec<TargetField>,
}

impl TableSchema {
    /// Builds a schema, validating uniqueness and the primary-key count.
    pub fn new(table: impl Into<String>, fields: Vec<TargetField>) -> Result<Self> {
        let table = table.into();
        let mut seen = std::collections::BTreeSet::new();
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(IntakeError::Schema(format!(
                    "duplicate field '{}' in schema for table '{table}'",
                    field.name
                )));
            }
        }
        let pk_count = fields.iter().filter(|f| f.is_primary_key).count();
        if pk_count != 1 {
            return Err(IntakeError::Schema(format!(
                "schema for table '{table}' declares {pk_count} primary keys, expected 1"
            )));
        }
        Ok(Self { table, fields })
    }

    /// The destination table mirrored from the original intake service:
    /// client records keyed by `client_id`, with a server-set `created_at`.
    pub fn builtin(table: impl Into<String>) -> Self {
        Self::new(
            table,
            vec![
                TargetField::new("client_id", FieldType::Text).primary_key(),
                TargetField::new("full_name", FieldType::Text),
                TargetField::new("phone_no", FieldType::Text),
                TargetField::new("client_amount", FieldType::Float),
                TargetField::new("total_land", FieldType::Float),
                TargetField::new("year", FieldType::Integer),
                TargetField::new("created_at", FieldType::Timestamp),
            ],
        )
        .expect("builtin schema is valid")
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn fields(&self) -> &[TargetField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&TargetField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// The single primary-key field.
    pub fn primary_key(&self) -> &TargetField {
        self.fields
            .iter()
            .find(|f| f.is_primary_key)
            .expect("schema always holds one primary key")
    }

    /// Field names an input column may legitimately map onto.
    ///
    /// Timestamp fields are excluded: they are set server-side, never read
    /// from the upload, so neither the fixed table nor the oracle may claim
    /// them.
    pub fn mappable_field_names(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| f.field_type != FieldType::Timestamp)
            .map(|f| f.name.clone())
            .collect()
    }
}

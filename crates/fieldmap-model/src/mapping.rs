//! Mapping tables exchanged between pipeline stages.
//!
//! Three shapes flow through mapping resolution: the hand-curated
//! [`FixedMappings`] table, the oracle's filtered [`CandidateMapping`], and
//! the conflict-free [`FinalMapping`] the merger produces.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Hand-authored synonym table: normalized source column → target field.
///
/// Process-wide constant, injected at startup and read-only afterwards. It
/// always takes precedence over oracle suggestions for the same column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixedMappings {
    entries: BTreeMap<String, String>,
}

impl FixedMappings {
    /// The curated table shipped with the intake service.
    pub fn builtin() -> Self {
        Self::from_entries([
            ("loaner_id", "client_id"),
            ("name", "full_name"),
            ("phone_no", "phone_no"),
            ("loan_amount", "client_amount"),
            ("total_land", "total_land"),
            ("year", "year"),
        ])
    }

    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Exact-match lookup by normalized column name. No fuzzy matching.
    pub fn lookup(&self, normalized: &str) -> Option<&str> {
        self.entries.get(normalized).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// The oracle's proposed mapping, already filtered by the client to columns
/// that were actually unresolved and fields that exist in the schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateMapping {
    entries: BTreeMap<String, String>,
}

impl CandidateMapping {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, normalized: &str) -> Option<&str> {
        self.entries.get(normalized).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The resolved column-to-field assignment for one upload.
///
/// Injective by construction: inserting a raw column that is already present,
/// or a target field that is already claimed, is refused. Input order is
/// preserved so first-writer-wins conflict resolution is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinalMapping {
    entries: Vec<(String, String)>,
}

impl FinalMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts to assign `raw` → `target`. Returns false when the raw
    /// column was already assigned or the target field is already claimed
    /// by an earlier column.
    pub fn insert(&mut self, raw: impl Into<String>, target: impl Into<String>) -> bool {
        let raw = raw.into();
        let target = target.into();
        if self.get(&raw).is_some() || self.contains_target(&target) {
            return false;
        }
        self.entries.push((raw, target));
        true
    }

    pub fn get(&self, raw: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(r, _)| r == raw)
            .map(|(_, t)| t.as_str())
    }

    pub fn contains_target(&self, target: &str) -> bool {
        self.entries.iter().any(|(_, t)| t == target)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pairs in input order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(r, t)| (r.as_str(), t.as_str()))
    }

    /// Owned map view for report serialization.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.entries.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_fixed_table() {
        let fixed = FixedMappings::builtin();
        assert_eq!(fixed.lookup("loaner_id"), Some("client_id"));
        assert_eq!(fixed.lookup("loan_amount"), Some("client_amount"));
        assert_eq!(fixed.lookup("unknown"), None);
        assert_eq!(fixed.len(), 6);
    }

    #[test]
    fn fixed_table_round_trips_as_flat_json() {
        let fixed = FixedMappings::from_entries([("a", "x")]);
        let json = serde_json::to_string(&fixed).unwrap();
        assert_eq!(json, r#"{"a":"x"}"#);
        let back: FixedMappings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fixed);
    }

    #[test]
    fn final_mapping_refuses_duplicate_target() {
        let mut mapping = FinalMapping::new();
        assert!(mapping.insert("loaner_id", "client_id"));
        assert!(!mapping.insert("client id", "client_id"));
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("loaner_id"), Some("client_id"));
        assert_eq!(mapping.get("client id"), None);
    }

    #[test]
    fn final_mapping_refuses_duplicate_raw_column() {
        let mut mapping = FinalMapping::new();
        assert!(mapping.insert("name", "full_name"));
        assert!(!mapping.insert("name", "phone_no"));
        assert_eq!(mapping.get("name"), Some("full_name"));
    }

    #[test]
    fn final_mapping_preserves_input_order() {
        let mut mapping = FinalMapping::new();
        mapping.insert("b", "beta");
        mapping.insert("a", "alpha");
        let order: Vec<&str> = mapping.iter().map(|(r, _)| r).collect();
        assert_eq!(order, vec!["b", "a"]);
    }
}

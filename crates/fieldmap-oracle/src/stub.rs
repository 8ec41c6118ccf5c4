//! Deterministic oracle stands-ins for tests and offline operation.

use std::collections::BTreeMap;

use fieldmap_model::CandidateMapping;

use crate::MappingOracle;
use crate::error::{OracleError, Result};

/// Oracle backed by a fixed answer table. Substitutes the network service
/// in tests and answers with whatever subset of its table was asked about.
#[derive(Debug, Clone, Default)]
pub struct StaticOracle {
    answers: BTreeMap<String, String>,
}

impl StaticOracle {
    /// An oracle that never proposes anything.
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
            answers: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl MappingOracle for StaticOracle {
    fn resolve(&self, unmapped: &[String], targets: &[String]) -> Result<CandidateMapping> {
        let entries = unmapped.iter().filter_map(|column| {
            let target = self.answers.get(column)?;
            if targets.iter().any(|t| t == target) {
                Some((column.clone(), target.clone()))
            } else {
                None
            }
        });
        Ok(CandidateMapping::from_entries(entries))
    }
}

/// Oracle that always fails with a fixed classification. For exercising
/// the degradation and access-denied paths.
#[derive(Debug, Clone, Copy)]
pub enum FailingOracle {
    /// Always reports a rejected credential.
    Auth,
    /// Always reports the service as unavailable.
    Unavailable,
}

impl MappingOracle for FailingOracle {
    fn resolve(&self, _unmapped: &[String], _targets: &[String]) -> Result<CandidateMapping> {
        match self {
            FailingOracle::Auth => Err(OracleError::Auth { status: 403 }),
            FailingOracle::Unavailable => {
                Err(OracleError::Unavailable("stubbed outage".to_string()))
            }
        }
    }
}

//! HTTP client for the semantic mapping oracle.
//!
//! One outbound request per upload carries the unresolved columns and the
//! target field list; the response is defensively parsed and filtered into
//! a [`CandidateMapping`].

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use fieldmap_model::CandidateMapping;

use crate::MappingOracle;
use crate::error::{OracleError, Result};

/// HTTP request timeout. A stalled oracle must never stall the upload
/// beyond this bound; a timeout is reported as unavailable.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Request body sent to the oracle.
#[derive(Debug, Serialize)]
struct MappingRequest<'a> {
    unmapped_columns: &'a [String],
    target_fields: &'a [String],
}

/// Blocking HTTP client for the mapping oracle, bearer-token authorized.
pub struct HttpOracle {
    client: Client,
    endpoint: String,
    token: String,
}

impl HttpOracle {
    /// Creates a client with the bounded request timeout.
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(OracleError::from)?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            token: token.into(),
        })
    }
}

impl MappingOracle for HttpOracle {
    fn resolve(&self, unmapped: &[String], targets: &[String]) -> Result<CandidateMapping> {
        debug!(
            columns = unmapped.len(),
            fields = targets.len(),
            "requesting mapping from oracle"
        );

        let body = MappingRequest {
            unmapped_columns: unmapped,
            target_fields: targets,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .map_err(OracleError::from)?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(OracleError::Auth {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            let message = response
                .text()
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(OracleError::Unavailable(format!(
                "status {status}: {message}"
            )));
        }

        let payload: Value = response.json().map_err(OracleError::from)?;
        let raw = extract_mapping(&payload)?;
        Ok(filter_candidate(raw, unmapped, targets))
    }
}

/// Pulls the column→field object out of the oracle payload.
///
/// Two shapes are accepted: a flat `{source: target}` object, or the
/// workflow envelope `{"status": "completed", "result": {"result": {...}}}`.
/// Anything else is unavailable, never a crash.
pub(crate) fn extract_mapping(payload: &Value) -> Result<BTreeMap<String, String>> {
    let Some(object) = payload.as_object() else {
        return Err(OracleError::Unavailable(
            "response is not a JSON object".to_string(),
        ));
    };

    let mapping = if object.contains_key("status") {
        if object.get("status").and_then(Value::as_str) != Some("completed") {
            return Err(OracleError::Unavailable(
                "oracle workflow did not complete".to_string(),
            ));
        }
        if let Some(error) = object.get("error")
            && !error.is_null()
        {
            return Err(OracleError::Unavailable(format!(
                "oracle workflow returned an error: {error}"
            )));
        }
        object
            .get("result")
            .and_then(|v| v.get("result"))
            .and_then(Value::as_object)
            .ok_or_else(|| {
                OracleError::Unavailable("workflow envelope without a result".to_string())
            })?
    } else {
        object
    };

    let mut entries = BTreeMap::new();
    for (key, value) in mapping {
        // The workflow sometimes echoes a validity flag alongside the mapping.
        if key == "is_valid" {
            continue;
        }
        let Some(target) = value.as_str() else {
            return Err(OracleError::Unavailable(format!(
                "non-string value for key '{key}'"
            )));
        };
        entries.insert(key.clone(), target.to_string());
    }
    Ok(entries)
}

/// Filters the raw oracle mapping down to entries the pipeline may use:
/// keys that were actually in the unresolved set, values that name fields
/// of the current schema. Everything else is discarded with a warning.
pub(crate) fn filter_candidate(
    raw: BTreeMap<String, String>,
    unmapped: &[String],
    targets: &[String],
) -> CandidateMapping {
    let mut kept = Vec::new();
    for (column, target) in raw {
        if !unmapped.iter().any(|c| c == &column) {
            warn!(column = %column, "oracle proposed a column that was not requested, discarding");
            continue;
        }
        if !targets.iter().any(|t| t == &target) {
            warn!(column = %column, target = %target, "oracle proposed an unknown target field, discarding");
            continue;
        }
        kept.push((column, target));
    }
    CandidateMapping::from_entries(kept)
}

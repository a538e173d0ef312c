//! Per-request response selection.
//!
//! Mirrors what the generated `runtime.ts` does in the browser, so the CLI can
//! answer "which response would this request get" without running MSW.

use super::types::ScenarioConfig;
use http::HeaderMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Request header naming the active scenario
pub const SCENARIO_HEADER: &str = "x-scenario";
/// Scenario assumed when the header is missing or empty
pub const DEFAULT_SCENARIO: &str = "default";

/// One possible response of an operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseCandidate {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl ResponseCandidate {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            response_type: None,
            body: None,
        }
    }

    /// Error response built for an undocumented status
    pub fn synthesized(status: u16) -> Self {
        let label = if status >= 500 {
            "Internal Server Error"
        } else {
            "Client Error"
        };
        let body = json!({ "error": label, "status": status });
        Self {
            status,
            response_type: Some("application/json".to_string()),
            body: Some(Value::String(body.to_string())),
        }
    }
}

/// Outcome of [`select_response`]
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// Index into the candidate list
    Index(usize),
    /// A response that is not among the candidates
    Custom(ResponseCandidate),
}

impl Selection {
    /// The chosen response; `None` only when an index falls outside `candidates`
    pub fn resolve<'a>(&'a self, candidates: &'a [ResponseCandidate]) -> Option<&'a ResponseCandidate> {
        match self {
            Selection::Index(i) => candidates.get(*i),
            Selection::Custom(candidate) => Some(candidate),
        }
    }
}

/// Active scenario id taken from the request headers
pub fn scenario_from_headers(headers: &HeaderMap) -> &str {
    headers
        .get(SCENARIO_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_SCENARIO)
}

/// Index of the first 2xx candidate, or 0 when there is none
pub fn default_index(candidates: &[ResponseCandidate]) -> usize {
    candidates
        .iter()
        .position(|c| (200..300).contains(&c.status))
        .unwrap_or(0)
}

/// Choose the response for one request.
///
/// # Arguments
///
/// * `verb` - Request method, any case
/// * `path` - Route in colon form, as used for the scenario `api` keys
/// * `candidates` - Responses documented for the operation, in document order
/// * `headers` - Request headers; [`SCENARIO_HEADER`] picks the scenario
/// * `scenarios` - Loaded scenario file, if any
///
/// # Returns
///
/// The candidate whose status the active scenario asks for. Without a matching
/// override the first 2xx candidate is used (or the first candidate). When the
/// requested status is undocumented and the override allows custom statuses,
/// an error response is synthesized.
pub fn select_response(
    verb: &str,
    path: &str,
    candidates: &[ResponseCandidate],
    headers: &HeaderMap,
    scenarios: Option<&ScenarioConfig>,
) -> Selection {
    let fallback = Selection::Index(default_index(candidates));
    let Some(scenarios) = scenarios else {
        return fallback;
    };

    let scenario_id = scenario_from_headers(headers);
    if scenario_id == DEFAULT_SCENARIO {
        return fallback;
    }
    let Some(wanted) = scenarios
        .get(scenario_id)
        .and_then(|scenario| scenario.override_for(verb, path))
    else {
        return fallback;
    };

    if let Some(index) = candidates.iter().position(|c| c.status == wanted.status) {
        return Selection::Index(index);
    }
    if wanted.allow_custom_status {
        return Selection::Custom(ResponseCandidate::synthesized(wanted.status));
    }
    fallback
}

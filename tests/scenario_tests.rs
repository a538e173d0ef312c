#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::temp_files::{cleanup, temp_dir};
use http::{HeaderMap, HeaderValue};
use oas_mockgen::scenario::{
    load_scenarios, select_response, ResponseCandidate, ScenarioConfig, ScenarioKind, Selection,
    SCENARIO_HEADER,
};
use serde_json::Value;

const SCENARIOS_YAML: &str = r#"
TC-1.1:
  description: happy path
  type: custom-status
  api: {}
TC-1.2:
  description: errors
  type: custom-status
  api:
    /users/:userId:
      GET:
        status: 404
      DELETE:
        status: 503
        allowCustomStatus: true
    /users:
      POST:
        status: 418
replay:
  type: api-recorder
  demoData: []
"#;

fn scenarios() -> ScenarioConfig {
    let dir = temp_dir("scenarios");
    let path = dir.join("scenarios.yaml");
    std::fs::write(&path, SCENARIOS_YAML).unwrap();
    let config = load_scenarios(&path).unwrap();
    cleanup(&dir);
    config
}

fn headers(scenario: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(SCENARIO_HEADER, HeaderValue::from_str(scenario).unwrap());
    headers
}

fn candidates(statuses: &[u16]) -> Vec<ResponseCandidate> {
    statuses.iter().copied().map(ResponseCandidate::new).collect()
}

#[test]
fn test_loaded_scenario_kinds() {
    let config = scenarios();
    let ids: Vec<&str> = config.keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["TC-1.1", "TC-1.2", "replay"]);
    assert_eq!(config["TC-1.1"].kind, ScenarioKind::CustomStatus);
    assert_eq!(config["replay"].kind, ScenarioKind::ApiRecorder);
}

#[test]
fn test_no_header_picks_first_success() {
    let config = scenarios();
    let options = candidates(&[404, 200, 201]);
    let selection = select_response("GET", "/users/:userId", &options, &HeaderMap::new(), Some(&config));
    assert_eq!(selection, Selection::Index(1));
}

#[test]
fn test_verb_case_is_normalized() {
    let config = scenarios();
    let options = candidates(&[200, 404]);
    let selection = select_response("get", "/users/:userId", &options, &headers("TC-1.2"), Some(&config));
    assert_eq!(selection, Selection::Index(1));
}

#[test]
fn test_allow_custom_status_synthesizes_error() {
    let config = scenarios();
    let options = candidates(&[204]);
    let selection = select_response("delete", "/users/:userId", &options, &headers("TC-1.2"), Some(&config));
    let Selection::Custom(custom) = selection else {
        panic!("expected a synthesized response");
    };
    assert_eq!(custom.status, 503);
    assert_eq!(custom.response_type.as_deref(), Some("application/json"));
    let body: Value = serde_json::from_str(custom.body.unwrap().as_str().unwrap()).unwrap();
    assert_eq!(body["error"], "Internal Server Error");
    assert_eq!(body["status"], 503);
}

#[test]
fn test_undocumented_status_without_permission_uses_default() {
    let config = scenarios();
    let options = candidates(&[400, 201]);
    let selection = select_response("POST", "/users", &options, &headers("TC-1.2"), Some(&config));
    assert_eq!(selection, Selection::Index(1));
}

#[test]
fn test_unknown_scenario_and_missing_file() {
    let config = scenarios();
    let options = candidates(&[500, 200]);
    assert_eq!(
        select_response("GET", "/users", &options, &headers("nope"), Some(&config)),
        Selection::Index(1)
    );
    assert_eq!(
        select_response("GET", "/users", &options, &headers("TC-1.2"), None),
        Selection::Index(1)
    );
}

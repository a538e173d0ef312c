use crate::recorder::CapturedEvent;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// How a scenario produces its responses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioKind {
    /// Pick one of the documented status codes per endpoint
    #[default]
    CustomStatus,
    /// Replay captured traffic from `demoData`
    ApiRecorder,
}

/// Status forced for one endpoint while a scenario is active
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusOverride {
    pub status: u16,
    /// Synthesize an error response when `status` is not documented
    #[serde(default)]
    pub allow_custom_status: bool,
}

/// `verb → override` for one path; verbs are stored uppercase
pub type EndpointOverrides = IndexMap<String, StatusOverride>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: ScenarioKind,
    /// `path → verb → override`, paths in colon form
    #[serde(default)]
    pub api: IndexMap<String, EndpointOverrides>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub demo_data: Vec<CapturedEvent>,
}

impl ScenarioDefinition {
    pub fn override_for(&self, verb: &str, path: &str) -> Option<&StatusOverride> {
        self.api.get(path)?.get(&verb.to_ascii_uppercase())
    }
}

/// Scenario id → definition, in file order
pub type ScenarioConfig = IndexMap<String, ScenarioDefinition>;

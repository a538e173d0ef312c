//! Scenario files and the response selection they drive.
//!
//! A scenario file maps scenario ids to either forced status codes per
//! endpoint (`custom-status`) or captured traffic to replay (`api-recorder`).
//! The same file is imported by the generated handlers at runtime.

mod selector;
mod types;

pub use selector::*;
pub use types::*;

use anyhow::Context;
use std::path::Path;

/// Load a scenario file. `.yaml`/`.yml` is parsed as YAML, anything else as JSON.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not match the
/// scenario file shape.
pub fn load_scenarios(path: &Path) -> anyhow::Result<ScenarioConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario file {}", path.display()))?;
    let config = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
            .with_context(|| format!("invalid scenario file {}", path.display()))?,
        _ => serde_json::from_str(&content)
            .with_context(|| format!("invalid scenario file {}", path.display()))?,
    };
    Ok(config)
}

/// Like [`load_scenarios`], but a missing file is `Ok(None)`
///
/// # Errors
///
/// Same as [`load_scenarios`] for files that exist.
pub fn load_scenarios_if_present(path: &Path) -> anyhow::Result<Option<ScenarioConfig>> {
    if !path.exists() {
        return Ok(None);
    }
    load_scenarios(path).map(Some)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_json_scenarios() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{
                "TC-1": {{
                    "description": "user lookup fails",
                    "api": {{ "/users/:id": {{ "GET": {{ "status": 500, "allowCustomStatus": true }} }} }}
                }},
                "login": {{ "type": "api-recorder", "demoData": [] }}
            }}"#
        )
        .unwrap();

        let config = load_scenarios(file.path()).unwrap();
        let keys: Vec<_> = config.keys().cloned().collect();
        assert_eq!(keys, vec!["TC-1", "login"]);
        let wanted = config["TC-1"].override_for("get", "/users/:id").unwrap();
        assert_eq!(wanted.status, 500);
        assert!(wanted.allow_custom_status);
        assert_eq!(config["TC-1"].kind, ScenarioKind::CustomStatus);
        assert_eq!(config["login"].kind, ScenarioKind::ApiRecorder);
    }

    #[test]
    fn test_load_yaml_scenarios() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "slow:\n  api:\n    /pets:\n      POST:\n        status: 201").unwrap();
        let config = load_scenarios(file.path()).unwrap();
        assert_eq!(config["slow"].override_for("POST", "/pets").unwrap().status, 201);
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_scenarios_if_present(&dir.path().join("nope.json"))
            .unwrap()
            .is_none());
    }
}

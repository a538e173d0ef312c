use super::build::build_operations;
use super::types::{FilterOptions, OperationRecord};
use crate::error::MockGenError;
use anyhow::Context;
use serde_json::Value;
use std::path::Path;

/// Parse an OpenAPI document from text with the YAML parser when `yaml` is
/// set and the JSON parser otherwise. There is no fallback between the two.
///
/// # Errors
///
/// Returns an error when the text does not parse with the chosen parser, or
/// when it is not an OpenAPI 3 document with a `paths` object.
pub fn parse_document(content: &str, yaml: bool) -> anyhow::Result<Value> {
    let value: Value = if yaml {
        serde_yaml::from_str(content).context("failed to parse YAML document")?
    } else {
        serde_json::from_str(content).context("failed to parse JSON document")?
    };
    validate_document(&value)?;
    Ok(value)
}

/// Read an OpenAPI document from disk; `.yaml`/`.yml` files are parsed as YAML.
///
/// # Errors
///
/// I/O, parse and validation failures.
pub fn load_document(path: &Path) -> anyhow::Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read OpenAPI document {}", path.display()))?;
    let yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    parse_document(&content, yaml).with_context(|| format!("in {}", path.display()))
}

/// Load a document and extract its operations in one go.
///
/// # Errors
///
/// Any failure from [`load_document`] or [`build_operations`].
pub fn load_operations(
    path: &Path,
    filters: &FilterOptions,
) -> anyhow::Result<(Value, Vec<OperationRecord>)> {
    let document = load_document(path)?;
    let operations = build_operations(&document, filters)?;
    Ok((document, operations))
}

fn validate_document(document: &Value) -> Result<(), MockGenError> {
    let version = document
        .get("openapi")
        .and_then(Value::as_str)
        .ok_or_else(|| MockGenError::invalid_document("missing 'openapi' version field"))?;
    if !version.starts_with('3') {
        return Err(MockGenError::invalid_document(format!(
            "unsupported OpenAPI version '{version}', expected 3.x"
        )));
    }
    if !document.get("paths").is_some_and(Value::is_object) {
        return Err(MockGenError::invalid_document("missing 'paths' object"));
    }
    Ok(())
}

/// URL of the first declared server with `{variable}` placeholders replaced by
/// their defaults.
///
/// Absolute URLs are normalized and lose their trailing slash so that
/// `${baseURL}/users` concatenation stays clean; relative ones (`/api`) are
/// returned as written.
pub fn server_url(document: &Value) -> Option<String> {
    let server = document.get("servers")?.as_array()?.first()?;
    let mut raw = server.get("url")?.as_str()?.to_string();

    if let Some(variables) = server.get("variables").and_then(Value::as_object) {
        for (name, variable) in variables {
            if let Some(default) = variable.get("default").and_then(Value::as_str) {
                raw = raw.replace(&format!("{{{name}}}"), default);
            }
        }
    }

    match url::Url::parse(&raw) {
        Ok(parsed) => Some(parsed.as_str().trim_end_matches('/').to_string()),
        Err(_) => Some(raw.trim_end_matches('/').to_string()),
    }
}

/// `info.title` of the document, if any
pub fn document_title(document: &Value) -> Option<&str> {
    document.get("info")?.get("title")?.as_str()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejects_swagger_two() {
        let err = parse_document(r#"{"swagger": "2.0", "paths": {}}"#, false).unwrap_err();
        assert!(err.to_string().contains("openapi"));
        let err = parse_document(r#"{"openapi": "2.0", "paths": {}}"#, false).unwrap_err();
        assert!(err.to_string().contains("2.0"));
    }

    #[test]
    fn test_yaml_document() {
        let yaml = "openapi: 3.0.3\ninfo:\n  title: Pets\npaths: {}\n";
        let doc = parse_document(yaml, true).unwrap();
        assert_eq!(document_title(&doc), Some("Pets"));
    }

    #[test]
    fn test_server_url_variables() {
        let doc = json!({
            "servers": [{
                "url": "https://{env}.example.com/{version}/",
                "variables": {
                    "env": { "default": "api" },
                    "version": { "default": "v2" }
                }
            }]
        });
        assert_eq!(server_url(&doc).as_deref(), Some("https://api.example.com/v2"));
    }

    #[test]
    fn test_relative_server_url() {
        let doc = json!({ "servers": [{ "url": "/api/" }] });
        assert_eq!(server_url(&doc).as_deref(), Some("/api"));
        assert_eq!(server_url(&json!({})), None);
    }
}

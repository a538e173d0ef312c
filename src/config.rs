//! Generator options and the optional `oas-mockgen.toml` file that holds them.
//!
//! Keys are camelCase so an existing JavaScript-side config can be pasted in:
//!
//! ```toml
//! input = "openapi.yaml"
//! outputDir = "src/app/mocks"
//! baseUrl = true
//! includes = "/users,/pets"
//! environment = "next"
//! controllers = ["getUser"]
//! ```

use crate::spec::FilterOptions;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up next to the OpenAPI document
pub const CONFIG_FILE_NAME: &str = "oas-mockgen.toml";
pub const DEFAULT_OUTPUT_DIR: &str = "src/app/mocks";
pub const DEFAULT_CONTROLLER_PATH: &str = "@/app/mocks/controllers";
pub const DEFAULT_MAX_ARRAY_LENGTH: usize = 20;
pub const DEFAULT_ENTITY_PATH_INDEX: usize = 1;
pub const DEFAULT_DTO_IMPORT_PATH: &str = "@/shared/api/dto";
pub const SCENARIO_FILE_NAME: &str = "scenarios.json";

/// `baseUrl`: a literal prefix, or `true` to take the document's first server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BaseUrl {
    UseServer(bool),
    Literal(String),
}

/// Runtime the generated server bootstrap targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Environment {
    Next,
    React,
    ReactNative,
}

/// One MSW entry point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerTarget {
    Node,
    Browser,
    Native,
}

impl ServerTarget {
    pub const ALL: [ServerTarget; 3] = [ServerTarget::Node, ServerTarget::Browser, ServerTarget::Native];

    /// Output file stem (`node.ts`, ...)
    pub fn file_stem(&self) -> &'static str {
        match self {
            ServerTarget::Node => "node",
            ServerTarget::Browser => "browser",
            ServerTarget::Native => "native",
        }
    }
}

/// Entry points to generate for an environment; all of them when unset
pub fn server_targets(environment: Option<Environment>) -> Vec<ServerTarget> {
    match environment {
        Some(Environment::Next) => vec![ServerTarget::Node, ServerTarget::Browser],
        Some(Environment::React) => vec![ServerTarget::Browser],
        Some(Environment::ReactNative) => vec![ServerTarget::Native],
        None => ServerTarget::ALL.to_vec(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorOptions {
    /// OpenAPI document path
    #[serde(default)]
    pub input: Option<PathBuf>,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_max_array_length")]
    pub max_array_length: usize,
    #[serde(default)]
    pub includes: Option<String>,
    #[serde(default)]
    pub excludes: Option<String>,
    #[serde(default)]
    pub codes: Option<String>,
    #[serde(default)]
    pub base_url: Option<BaseUrl>,
    /// Emit literal JSON bodies instead of faker calls
    #[serde(default, rename = "static")]
    pub static_data: bool,
    #[serde(default = "default_entity_path_index")]
    pub entity_path_index: usize,
    #[serde(default)]
    pub environment: Option<Environment>,
    #[serde(default = "default_controller_path")]
    pub controller_path: String,
    /// Response identifiers or operation ids whose bodies come from
    /// user-written controllers
    #[serde(default)]
    pub controllers: Vec<String>,
    /// Module the controller types import DTOs from
    #[serde(default = "default_dto_import_path")]
    pub dto_import_path: String,
    /// Leave already generated files untouched. The scenario file is never
    /// overwritten either way.
    #[serde(default)]
    pub skip_existing: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_max_array_length() -> usize {
    DEFAULT_MAX_ARRAY_LENGTH
}

fn default_entity_path_index() -> usize {
    DEFAULT_ENTITY_PATH_INDEX
}

fn default_controller_path() -> String {
    DEFAULT_CONTROLLER_PATH.to_string()
}

fn default_dto_import_path() -> String {
    DEFAULT_DTO_IMPORT_PATH.to_string()
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            input: None,
            output_dir: default_output_dir(),
            max_array_length: DEFAULT_MAX_ARRAY_LENGTH,
            includes: None,
            excludes: None,
            codes: None,
            base_url: None,
            static_data: false,
            entity_path_index: DEFAULT_ENTITY_PATH_INDEX,
            environment: None,
            controller_path: default_controller_path(),
            controllers: Vec::new(),
            dto_import_path: default_dto_import_path(),
            skip_existing: false,
        }
    }
}

impl GeneratorOptions {
    pub fn filters(&self) -> FilterOptions {
        FilterOptions {
            includes: self.includes.clone(),
            excludes: self.excludes.clone(),
            codes: self.codes.clone(),
        }
    }

    /// Scenario file imported by the generated handlers
    pub fn scenario_path(&self) -> PathBuf {
        self.output_dir.join(SCENARIO_FILE_NAME)
    }

    /// Base URL prefix for handler routes, given the document's server URL
    pub fn resolve_base_url(&self, server_url: Option<&str>) -> String {
        match &self.base_url {
            Some(BaseUrl::Literal(url)) => url.trim_end_matches('/').to_string(),
            Some(BaseUrl::UseServer(true)) => server_url.unwrap_or_default().to_string(),
            Some(BaseUrl::UseServer(false)) | None => String::new(),
        }
    }
}

/// Load generator options from a TOML file.
///
/// # Arguments
///
/// * `config_path` - Path to the `oas-mockgen.toml` file
///
/// # Returns
///
/// Returns `Ok(Some(options))` if the file exists and parses successfully,
/// `Ok(None)` if the file doesn't exist,
/// `Err` if the file exists but fails to parse.
pub fn load_options_file(config_path: &Path) -> anyhow::Result<Option<GeneratorOptions>> {
    if !config_path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

    let options: GeneratorOptions = toml::from_str(&contents).with_context(|| {
        format!("Failed to parse config file: {}", config_path.display())
    })?;

    Ok(Some(options))
}

/// Explicit path if it exists, else `oas-mockgen.toml` beside the document,
/// else `oas-mockgen.toml` in the working directory.
pub fn resolve_config_path(explicit_path: Option<&Path>, spec_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }
    let beside_spec = spec_path
        .and_then(Path::parent)
        .map(|dir| dir.join(CONFIG_FILE_NAME));
    if let Some(path) = beside_spec {
        if path.exists() {
            return Some(path);
        }
    }
    let cwd = PathBuf::from(CONFIG_FILE_NAME);
    cwd.exists().then_some(cwd)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_from_empty_file() {
        let options: GeneratorOptions = toml::from_str("").unwrap();
        assert_eq!(options.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(options.max_array_length, 20);
        assert_eq!(options.entity_path_index, 1);
        assert_eq!(options.controller_path, DEFAULT_CONTROLLER_PATH);
        assert_eq!(options.dto_import_path, DEFAULT_DTO_IMPORT_PATH);
        assert_eq!(options.scenario_path(), PathBuf::from(DEFAULT_OUTPUT_DIR).join("scenarios.json"));
        assert!(!options.static_data);
    }

    #[test]
    fn test_camel_case_keys() {
        let options: GeneratorOptions = toml::from_str(
            r#"
            outputDir = "mocks"
            baseUrl = true
            static = true
            entityPathIndex = 3
            environment = "react-native"
            controllers = ["getUser"]
            "#,
        )
        .unwrap();
        assert_eq!(options.output_dir, PathBuf::from("mocks"));
        assert_eq!(options.base_url, Some(BaseUrl::UseServer(true)));
        assert!(options.static_data);
        assert_eq!(options.entity_path_index, 3);
        assert_eq!(options.environment, Some(Environment::ReactNative));
        assert_eq!(options.controllers, vec!["getUser"]);
    }

    #[test]
    fn test_base_url_resolution() {
        let mut options = GeneratorOptions::default();
        assert_eq!(options.resolve_base_url(Some("https://api.test")), "");
        options.base_url = Some(BaseUrl::UseServer(true));
        assert_eq!(options.resolve_base_url(Some("https://api.test")), "https://api.test");
        options.base_url = Some(BaseUrl::Literal("http://localhost:3000/".into()));
        assert_eq!(options.resolve_base_url(None), "http://localhost:3000");
    }

    #[test]
    fn test_server_targets() {
        assert_eq!(
            server_targets(Some(Environment::Next)),
            vec![ServerTarget::Node, ServerTarget::Browser]
        );
        assert_eq!(server_targets(Some(Environment::React)), vec![ServerTarget::Browser]);
        assert_eq!(server_targets(None).len(), 3);
    }

    #[test]
    fn test_load_options_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        assert!(load_options_file(&path).unwrap().is_none());

        fs::write(&path, "codes = \"200\"\n").unwrap();
        let options = load_options_file(&path).unwrap().unwrap();
        assert_eq!(options.codes.as_deref(), Some("200"));

        fs::write(&path, "maxArrayLength = \"many\"\n").unwrap();
        assert!(load_options_file(&path).is_err());
    }

    #[test]
    fn test_resolve_config_beside_spec() {
        let dir = TempDir::new().unwrap();
        let spec = dir.path().join("openapi.yaml");
        let config = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config, "").unwrap();
        assert_eq!(resolve_config_path(None, Some(&spec)), Some(config));
    }
}

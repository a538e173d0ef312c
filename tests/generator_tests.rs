#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::fixtures::{rest_capture, USERS_YAML};
use common::temp_files::{cleanup, create_temp_yaml};
use oas_mockgen::cli::GenerateArgs;
use oas_mockgen::config::{Environment, GeneratorOptions, CONFIG_FILE_NAME};
use oas_mockgen::generator::generate_mocks;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

fn options(spec: &Path) -> GeneratorOptions {
    GeneratorOptions {
        input: Some(spec.to_path_buf()),
        output_dir: spec.parent().unwrap().join("mocks"),
        ..GeneratorOptions::default()
    }
}

fn read(options: &GeneratorOptions, rel: &str) -> String {
    fs::read_to_string(options.output_dir.join(rel)).unwrap_or_else(|e| panic!("{rel}: {e}"))
}

#[test]
fn test_generate_from_yaml_file() {
    let spec = create_temp_yaml(USERS_YAML);
    let options = options(&spec);
    let report = generate_mocks(&options).unwrap();

    assert_eq!(report.operations, 6);
    assert_eq!(report.entities, vec!["users", "posts", "internal", "chat"]);

    let index = read(&options, "__handlers__/index.ts");
    let users_at = index.find("...usersHandlers").unwrap();
    let chat_at = index.find("...chatHandlers").unwrap();
    assert!(users_at < chat_at);

    let users = read(&options, "__handlers__/users.handlers.ts");
    assert!(users.contains("http.get(`${baseURL}/users/:userId`"));
    assert!(users.contains("export function getGetUser404Response()"));
    // the cycle-broken manager schema has no type, so no value is faked
    assert!(users.contains("\"manager\": null"));

    let chat = read(&options, "__handlers__/chat.handlers.ts");
    assert!(chat.contains("responseType: \"text/event-stream\","));
    assert!(chat.contains("message_start"));

    cleanup(&spec);
}

#[test]
fn test_scenario_skeleton_written_once() {
    let spec = create_temp_yaml(USERS_YAML);
    let options = options(&spec);
    let scenario_path = options.scenario_path();

    assert!(generate_mocks(&options).unwrap().scenario_skeleton_written);
    let skeleton: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&scenario_path).unwrap()).unwrap();
    assert_eq!(skeleton["TC-1.1"]["type"], "custom-status");
    assert_eq!(skeleton["login-success"]["type"], "api-recorder");

    fs::write(&scenario_path, "{}").unwrap();
    assert!(!generate_mocks(&options).unwrap().scenario_skeleton_written);
    assert_eq!(fs::read_to_string(&scenario_path).unwrap(), "{}");

    cleanup(&spec);
}

#[test]
fn test_recorded_scenario_regenerates_overrides() {
    let spec = create_temp_yaml(USERS_YAML);
    let options = options(&spec);
    generate_mocks(&options).unwrap();

    let scenarios = json!({
        "checkout": {
            "type": "api-recorder",
            "demoData": [
                rest_capture("GET", "https://eu.example.com/api/users", 200),
                rest_capture("GET", "https://eu.example.com/api/users", 500)
            ]
        }
    });
    fs::write(options.scenario_path(), scenarios.to_string()).unwrap();
    let report = generate_mocks(&options).unwrap();
    assert_eq!(report.override_scenarios, vec!["checkout"]);

    let overrides = read(&options, "__handlers__/override/checkout.handlers.ts");
    assert!(overrides.contains("export const checkoutHandlers = ["));
    assert_eq!(overrides.matches("http.get(").count(), 1);
    assert!(overrides.contains("\"kind\": \"rest\""));

    let index = read(&options, "__handlers__/override/index.ts");
    assert!(index.contains("import { checkoutHandlers } from './checkout.handlers';"));

    cleanup(&spec);
}

#[test]
fn test_environment_server_files() {
    let cases: [(Option<Environment>, &[&str]); 4] = [
        (Some(Environment::Next), &["node.ts", "browser.ts"]),
        (Some(Environment::React), &["browser.ts"]),
        (Some(Environment::ReactNative), &["native.ts"]),
        (None, &["node.ts", "browser.ts", "native.ts"]),
    ];
    for (environment, expected) in cases {
        let spec = create_temp_yaml(USERS_YAML);
        let options = GeneratorOptions {
            environment,
            ..options(&spec)
        };
        generate_mocks(&options).unwrap();
        for file in ["node.ts", "browser.ts", "native.ts"] {
            assert_eq!(
                options.output_dir.join(file).exists(),
                expected.contains(&file),
                "{file} for {environment:?}"
            );
        }
        cleanup(&spec);
    }
    // native uses the React Native entry point of msw
    let spec = create_temp_yaml(USERS_YAML);
    let options = GeneratorOptions {
        environment: Some(Environment::ReactNative),
        ..options(&spec)
    };
    generate_mocks(&options).unwrap();
    assert!(read(&options, "native.ts").contains("from 'msw/native'"));
    cleanup(&spec);
}

#[test]
fn test_config_file_beside_spec_with_flag_override() {
    let spec = create_temp_yaml(USERS_YAML);
    let dir = spec.parent().unwrap();
    fs::write(
        dir.join(CONFIG_FILE_NAME),
        "outputDir = \"from-config\"\nentityPathIndex = 2\nstatic = true\n",
    )
    .unwrap();

    let args = GenerateArgs {
        input: Some(spec.clone()),
        output: Some(dir.join("from-flag")),
        ..GenerateArgs::default()
    };
    let options = args.resolve_options().unwrap();
    assert_eq!(options.output_dir, dir.join("from-flag"));
    assert_eq!(options.entity_path_index, 2);
    assert!(options.static_data);

    let report = generate_mocks(&options).unwrap();
    assert!(report.entities.contains(&"root".to_string()));
    assert!(!PathBuf::from("from-config").exists());

    cleanup(&spec);
}

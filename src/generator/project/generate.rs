use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use indexmap::IndexMap;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::config::{server_targets, GeneratorOptions, ServerTarget};
use crate::generator::classify::{
    dto_names, path_params_type, request_dto, ResponseShape, JSON_MEDIA_TYPE, STREAM_MEDIA_TYPE,
};
use crate::generator::faker::{faker_expression, static_value, MAX_STRING_LENGTH};
use crate::generator::templates::{
    CandidateView, ControllerSignatureView, ControllerTypeTemplate, ControllersIndexTemplate,
    EndpointView, EntityHandlersTemplate, EntityImportView, EntityTypeImportView, HandlerView,
    HandlersIndexTemplate, MethodStatusesView, OutputLog, OverrideHandlersTemplate,
    OverrideImportView, OverrideIndexTemplate, RecordedGroupView, ResultFunctionView,
    RuntimeTemplate, ScenarioTypesTemplate, ServerTemplate,
};
use crate::naming::{camel_case, pascal_case, response_identifier, scenario_identifier};
use crate::recorder::{request_groups, RecordedRequestGroup, RecordedResponse};
use crate::scenario::{
    load_scenarios_if_present, ScenarioConfig, ScenarioKind, DEFAULT_SCENARIO, SCENARIO_HEADER,
};
use crate::spec::{
    build_operations, group_by, group_by_entity, load_document, server_url, OperationRecord,
    ResponseEntry,
};

pub const HANDLERS_DIR: &str = "__handlers__";
pub const OVERRIDE_DIR: &str = "__handlers__/override";
pub const CONTROLLER_TYPES_DIR: &str = "__types__/controllers";
pub const SCENARIO_TYPES_DIR: &str = "__types__/scenarios";

/// Summary of one generation run
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    pub operations: usize,
    /// Entity buckets, in first-seen order
    pub entities: Vec<String>,
    /// `api-recorder` scenarios that got override handlers
    pub override_scenarios: Vec<String>,
    /// Whether a fresh `scenarios.json` skeleton was written
    pub scenario_skeleton_written: bool,
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Load `options.input` and generate the full mock tree into `options.output_dir`.
///
/// # Errors
///
/// Fails when no input is configured, the document cannot be loaded, a
/// reference does not resolve, the scenario file is invalid, or a write fails.
pub fn generate_mocks(options: &GeneratorOptions) -> anyhow::Result<GenerationReport> {
    let input = options
        .input
        .as_deref()
        .ok_or_else(|| anyhow!("no OpenAPI document given (set `input` or pass --input)"))?;
    let document = load_document(input)?;
    generate_from_document(&document, options)
}

/// Generate the mock tree for an already loaded document.
///
/// # Errors
///
/// Same as [`generate_mocks`], minus loading.
pub fn generate_from_document(
    document: &Value,
    options: &GeneratorOptions,
) -> anyhow::Result<GenerationReport> {
    let operations = build_operations(document, &options.filters())?;
    let base_url = options.resolve_base_url(server_url(document).as_deref());
    let out = options.output_dir.as_path();
    let skip = options.skip_existing;
    let mut log = OutputLog::default();

    log.template(
        out.join("runtime.ts"),
        &RuntimeTemplate {
            scenario_header: SCENARIO_HEADER.to_string(),
            default_scenario: DEFAULT_SCENARIO.to_string(),
            stream_media_type: STREAM_MEDIA_TYPE.to_string(),
        },
        skip,
    )?;

    let buckets = group_by_entity(&operations, options.entity_path_index);
    let mut handler_imports = Vec::with_capacity(buckets.len());
    let mut type_imports = Vec::with_capacity(buckets.len());

    for (entity, entity_operations) in &buckets {
        let file_stem = file_stem(entity);
        let identifier = entity_identifier(entity);
        let type_name = pascal_case(&format!("T_{entity}_Controllers"));

        log.template(
            out.join(HANDLERS_DIR).join(format!("{file_stem}.handlers.ts")),
            &entity_handlers(&identifier, entity_operations, &base_url, options),
            skip,
        )?;
        log.template(
            out.join(CONTROLLER_TYPES_DIR).join(format!("{file_stem}.type.ts")),
            &controller_types(&type_name, entity_operations, options),
            skip,
        )?;

        handler_imports.push(EntityImportView {
            identifier,
            file_stem: file_stem.clone(),
        });
        type_imports.push(EntityTypeImportView {
            type_name,
            file_stem,
        });
    }

    let intersection = if type_imports.is_empty() {
        "Record<string, never>".to_string()
    } else {
        type_imports
            .iter()
            .map(|t| t.type_name.as_str())
            .collect::<Vec<_>>()
            .join(" & ")
    };
    log.template(
        out.join(HANDLERS_DIR).join("index.ts"),
        &HandlersIndexTemplate {
            entities: handler_imports,
        },
        skip,
    )?;
    log.template(
        out.join(CONTROLLER_TYPES_DIR).join("index.ts"),
        &ControllersIndexTemplate {
            entities: type_imports,
            intersection,
        },
        skip,
    )?;
    log.template(
        out.join(SCENARIO_TYPES_DIR).join("scenarios.type.ts"),
        &scenario_types(&operations),
        skip,
    )?;

    let scenario_path = options.scenario_path();
    let scenario_skeleton_written = write_scenario_skeleton(&scenario_path)?;
    if scenario_skeleton_written {
        log.written.push(scenario_path.clone());
    }

    let scenarios = load_scenarios_if_present(&scenario_path)?.unwrap_or_default();
    let override_scenarios = write_override_handlers(out, &scenarios, skip, &mut log)?;

    for target in server_targets(options.environment) {
        log.template(
            out.join(format!("{}.ts", target.file_stem())),
            &server_template(target),
            skip,
        )?;
    }

    info!(
        operations = operations.len(),
        entities = buckets.len(),
        written = log.written.len(),
        "mock generation finished"
    );

    Ok(GenerationReport {
        operations: operations.len(),
        entities: buckets.keys().cloned().collect(),
        override_scenarios,
        scenario_skeleton_written,
        written: log.written,
        skipped: log.skipped,
    })
}

/// File-system safe version of an entity or scenario id
pub fn file_stem(raw: &str) -> String {
    let stem: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "root".to_string()
    } else {
        stem
    }
}

/// camelCase identifier for an entity, never starting with a digit
pub fn entity_identifier(entity: &str) -> String {
    let ident = camel_case(entity);
    match ident.chars().next() {
        None => "root".to_string(),
        Some(c) if c.is_ascii_digit() => format!("_{ident}"),
        Some(_) => ident,
    }
}

/// MSW has no `http.trace`; anything outside its verb set goes through `http.all`
fn msw_verb(method: &str) -> String {
    let lower = method.to_ascii_lowercase();
    match lower.as_str() {
        "get" | "post" | "put" | "patch" | "delete" | "head" | "options" => lower,
        _ => "all".to_string(),
    }
}

fn quoted(raw: &str) -> String {
    Value::String(raw.to_string()).to_string()
}

fn is_delegated(options: &GeneratorOptions, operation: &OperationRecord, name: &str) -> bool {
    options
        .controllers
        .iter()
        .any(|c| c == name || c == &operation.id)
}

/// Schema of the JSON body, falling back to the first media type
fn body_schema(response: &ResponseEntry) -> Option<&Value> {
    response
        .content
        .iter()
        .find(|(media_type, _)| media_type.starts_with(JSON_MEDIA_TYPE))
        .map(|(_, schema)| schema)
}

fn result_body(response: &ResponseEntry, options: &GeneratorOptions) -> anyhow::Result<String> {
    if body_schema(response).is_none() && response.content.contains_key(STREAM_MEDIA_TYPE) {
        let sample = static_value(
            response.content.get(STREAM_MEDIA_TYPE),
            None,
            options.max_array_length,
        );
        let events = json!([
            { "event": "message_start", "data": "" },
            { "event": "message_delta", "data": sample.to_string() },
            { "event": "message_end", "data": "" }
        ]);
        return Ok(serde_json::to_string_pretty(&events)?);
    }

    let schema = body_schema(response);
    if options.static_data {
        let value = static_value(schema, None, options.max_array_length);
        return Ok(serde_json::to_string_pretty(&value)?);
    }
    Ok(faker_expression(schema, None))
}

fn entity_handlers(
    identifier: &str,
    operations: &[&OperationRecord],
    base_url: &str,
    options: &GeneratorOptions,
) -> EntityHandlersTemplate {
    let mut handlers = Vec::with_capacity(operations.len());
    let mut functions = Vec::new();

    for operation in operations {
        let mut candidates = Vec::with_capacity(operation.responses.len());
        for response in &operation.responses {
            let Some(status) = response.status() else {
                warn!(
                    operation = %operation.id,
                    code = %response.code,
                    "non-numeric response code has no mock, skipping"
                );
                continue;
            };

            if status == 204 {
                candidates.push(CandidateView {
                    status,
                    response_type: "undefined".to_string(),
                    body: "undefined".to_string(),
                });
                continue;
            }

            let name = response_identifier(&operation.id, &response.code);
            let delegated = is_delegated(options, operation, &name);
            let body = if delegated {
                String::new()
            } else {
                match result_body(response, options) {
                    Ok(body) => body,
                    Err(err) => {
                        warn!(function = %name, error = %err, "could not render body, using null");
                        "null".to_string()
                    }
                }
            };

            candidates.push(CandidateView {
                status,
                response_type: quoted(response.media_type().unwrap_or(JSON_MEDIA_TYPE)),
                body: if delegated {
                    format!("await {name}(info)")
                } else {
                    format!("{name}()")
                },
            });
            functions.push(ResultFunctionView {
                name,
                delegated,
                body,
            });
        }

        handlers.push(HandlerView {
            verb: msw_verb(operation.verb.as_str()),
            scenario_verb: operation.verb.as_str().to_ascii_uppercase(),
            path: operation.path.clone(),
            candidates,
        });
    }

    EntityHandlersTemplate {
        identifier: identifier.to_string(),
        base_url: base_url.to_string(),
        max_array_length: options.max_array_length,
        max_string_length: MAX_STRING_LENGTH,
        controller_path: options.controller_path.clone(),
        uses_controllers: functions.iter().any(|f| f.delegated),
        uses_faker: functions.iter().any(|f| f.body.contains("faker.")),
        operations: handlers,
        functions,
    }
}

fn controller_types(
    type_name: &str,
    operations: &[&OperationRecord],
    options: &GeneratorOptions,
) -> ControllerTypeTemplate {
    let mut controllers = Vec::new();
    let mut has_streaming = false;

    for operation in operations {
        let path_params = path_params_type(operation);
        let request_type = request_dto(operation).unwrap_or_else(|| "null".to_string());
        for response in &operation.responses {
            let shape = ResponseShape::classify(&response.content);
            has_streaming |= shape == ResponseShape::Streaming;
            controllers.push(ControllerSignatureView {
                name: response_identifier(&operation.id, &response.code),
                path_params: path_params.clone(),
                request_type: request_type.clone(),
                response_type: shape.body_type(),
            });
        }
    }

    let dto_imports = dto_names(
        controllers
            .iter()
            .flat_map(|c| [c.request_type.as_str(), c.response_type.as_str()]),
    )
    .into_iter()
    .collect::<Vec<_>>()
    .join(", ");

    ControllerTypeTemplate {
        type_name: type_name.to_string(),
        dto_imports,
        dto_import_path: options.dto_import_path.clone(),
        has_streaming,
        controllers,
    }
}

fn scenario_types(operations: &[OperationRecord]) -> ScenarioTypesTemplate {
    let by_path = group_by(operations.iter(), |op| op.path.clone());
    let endpoints = by_path
        .into_iter()
        .map(|(path, path_operations)| {
            let mut by_verb: IndexMap<String, Vec<u16>> = IndexMap::new();
            for operation in path_operations {
                let codes = by_verb
                    .entry(operation.verb.as_str().to_ascii_uppercase())
                    .or_default();
                for status in operation.responses.iter().filter_map(ResponseEntry::status) {
                    if !codes.contains(&status) {
                        codes.push(status);
                    }
                }
            }
            let methods = by_verb
                .keys()
                .map(|verb| format!("'{verb}'"))
                .collect::<Vec<_>>()
                .join(" | ");
            let statuses = by_verb
                .into_iter()
                .map(|(verb, codes)| MethodStatusesView {
                    verb,
                    codes: if codes.is_empty() {
                        "never".to_string()
                    } else {
                        codes
                            .iter()
                            .map(u16::to_string)
                            .collect::<Vec<_>>()
                            .join(" | ")
                    },
                })
                .collect();
            EndpointView {
                path,
                methods,
                statuses,
            }
        })
        .collect();
    ScenarioTypesTemplate { endpoints }
}

/// Write the starter scenario file unless one exists. Returns whether it was written.
fn write_scenario_skeleton(path: &Path) -> anyhow::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    let skeleton = json!({
        "TC-1.1": {
            "description": "Success responses everywhere",
            "type": "custom-status",
            "api": {}
        },
        "TC-1.2": {
            "description": "Error responses; add paths like {\"/users/:id\": {\"GET\": {\"status\": 418, \"allowCustomStatus\": true}}}",
            "type": "custom-status",
            "api": {}
        },
        "login-success": {
            "description": "Replay of captured traffic; paste recorder exports into demoData",
            "type": "api-recorder",
            "demoData": []
        }
    });
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(&skeleton)? + "\n")
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "wrote scenario skeleton");
    Ok(true)
}

fn recorded_response_json(response: &RecordedResponse) -> Value {
    match response {
        RecordedResponse::Rest {
            status,
            headers,
            body,
        } => json!({ "kind": "rest", "status": status, "headers": headers, "body": body }),
        RecordedResponse::Stream {
            status,
            headers,
            chunks,
        } => json!({ "kind": "stream", "status": status, "headers": headers, "events": chunks }),
    }
}

fn recorded_group_view(group: &RecordedRequestGroup) -> anyhow::Result<RecordedGroupView> {
    let responses = Value::Array(group.responses.iter().map(recorded_response_json).collect());
    Ok(RecordedGroupView {
        verb: msw_verb(&group.method),
        url: quoted(&group.url),
        key: quoted(&format!("{}:{}", group.method, group.url)),
        responses: serde_json::to_string_pretty(&responses)?,
    })
}

fn write_override_handlers(
    out: &Path,
    scenarios: &ScenarioConfig,
    skip: bool,
    log: &mut OutputLog,
) -> anyhow::Result<Vec<String>> {
    let mut imports: Vec<OverrideImportView> = Vec::new();
    for (id, scenario) in scenarios {
        if scenario.kind != ScenarioKind::ApiRecorder {
            continue;
        }
        let export_name = scenario_identifier(id);
        if imports.iter().any(|i| i.export_name == export_name) {
            warn!(scenario = %id, export = %export_name, "scenario id collides with another after sanitizing");
        }
        let groups = request_groups(&scenario.demo_data)
            .with_context(|| format!("in demoData of scenario '{id}'"))?
            .iter()
            .map(recorded_group_view)
            .collect::<anyhow::Result<Vec<_>>>()?;
        let stem = file_stem(id);
        log.template(
            out.join(OVERRIDE_DIR).join(format!("{stem}.handlers.ts")),
            &OverrideHandlersTemplate {
                export_name: export_name.clone(),
                groups,
            },
            skip,
        )?;
        imports.push(OverrideImportView {
            key: quoted(id),
            export_name,
            file_stem: stem,
        });
    }

    let ids = scenarios
        .iter()
        .filter(|(_, s)| s.kind == ScenarioKind::ApiRecorder)
        .map(|(id, _)| id.clone())
        .collect();
    log.template(
        out.join(OVERRIDE_DIR).join("index.ts"),
        &OverrideIndexTemplate { scenarios: imports },
        skip,
    )?;
    Ok(ids)
}

fn server_template(target: ServerTarget) -> ServerTemplate {
    let (import_name, module, export_name) = match target {
        ServerTarget::Node => ("setupServer", "msw/node", "server"),
        ServerTarget::Browser => ("setupWorker", "msw/browser", "worker"),
        ServerTarget::Native => ("setupServer", "msw/native", "server"),
    };
    ServerTemplate {
        import_name: import_name.to_string(),
        module: module.to_string(),
        export_name: export_name.to_string(),
    }
}

use super::resolve::{follow_reference, resolve_schema};
use super::types::{FilterOptions, OperationRecord, ParameterLocation, ParameterMeta, ResponseEntry};
use crate::error::MockGenError;
use crate::naming::{camel_case, to_express_path};
use http::Method;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Verbs recognised as operations inside a path item
fn method_for(verb: &str) -> Option<Method> {
    match verb {
        "get" => Some(Method::GET),
        "put" => Some(Method::PUT),
        "post" => Some(Method::POST),
        "delete" => Some(Method::DELETE),
        "options" => Some(Method::OPTIONS),
        "head" => Some(Method::HEAD),
        "patch" => Some(Method::PATCH),
        "trace" => Some(Method::TRACE),
        _ => None,
    }
}

/// Walk every path and verb of the document and build one [`OperationRecord`]
/// per operation that survives `filters`.
///
/// Paths are visited in document order and, within a path item, verbs in the
/// order they are written. Response schemas are fully resolved; each one gets
/// its own resolution context.
///
/// # Errors
///
/// Returns an error if `paths` is missing or a reference cannot be resolved.
pub fn build_operations(
    document: &Value,
    filters: &FilterOptions,
) -> Result<Vec<OperationRecord>, MockGenError> {
    let paths = document
        .get("paths")
        .and_then(Value::as_object)
        .ok_or_else(|| MockGenError::invalid_document("missing 'paths' object"))?;

    let mut operations = Vec::new();
    for (path, item) in paths {
        if item.is_null() {
            continue;
        }
        let item = follow_reference(document, item)?;
        let Some(item) = item.as_object() else {
            warn!(path = %path, "path item is not an object, skipping");
            continue;
        };

        let shared_parameters = collect_parameters(document, item.get("parameters"), Vec::new())?;

        for (key, operation) in item {
            let Some(verb) = method_for(key) else {
                continue;
            };
            let record = build_operation(document, path, verb, operation, &shared_parameters, filters)?;
            if let Some(record) = record {
                operations.push(record);
            }
        }
    }

    debug!(count = operations.len(), "extracted operations");
    Ok(operations)
}

fn build_operation(
    document: &Value,
    path: &str,
    verb: Method,
    operation: &Value,
    shared_parameters: &[ParameterMeta],
    filters: &FilterOptions,
) -> Result<Option<OperationRecord>, MockGenError> {
    if !filters.allows_path(path) {
        debug!(path, verb = %verb, "filtered out by includes/excludes");
        return Ok(None);
    }

    let operation_id = operation
        .get("operationId")
        .and_then(Value::as_str)
        .map(str::to_string);
    let id = match &operation_id {
        Some(op_id) => camel_case(op_id),
        None => camel_case(&format!("{}/{}", verb.as_str().to_ascii_lowercase(), path)),
    };

    let responses = build_responses(document, operation.get("responses"), filters)?;

    let request = match operation.get("requestBody") {
        Some(body) => Some(follow_reference(document, body)?.clone()),
        None => None,
    };

    let parameters = collect_parameters(
        document,
        operation.get("parameters"),
        shared_parameters.to_vec(),
    )?;

    Ok(Some(OperationRecord {
        path: to_express_path(path),
        raw_path: path.to_string(),
        verb,
        id,
        operation_id,
        summary: operation
            .get("summary")
            .and_then(Value::as_str)
            .map(str::to_string),
        responses,
        request,
        parameters,
    }))
}

fn build_responses(
    document: &Value,
    responses: Option<&Value>,
    filters: &FilterOptions,
) -> Result<Vec<ResponseEntry>, MockGenError> {
    let Some(responses) = responses.and_then(Value::as_object) else {
        return Ok(Vec::new());
    };

    let mut entries = Vec::with_capacity(responses.len());
    for (code, response) in responses {
        if !filters.allows_code(code) {
            continue;
        }
        let response = follow_reference(document, response)?;
        let mut content = Map::new();
        if let Some(media_types) = response.get("content").and_then(Value::as_object) {
            for (media_type, media) in media_types {
                if let Some(schema) = media.get("schema") {
                    content.insert(media_type.clone(), resolve_schema(document, schema)?);
                }
            }
        }
        entries.push(ResponseEntry {
            code: code.clone(),
            content,
        });
    }
    Ok(entries)
}

/// Merge a `parameters` list into `inherited`. A parameter with the same name
/// and location replaces the inherited one.
fn collect_parameters(
    document: &Value,
    raw: Option<&Value>,
    mut inherited: Vec<ParameterMeta>,
) -> Result<Vec<ParameterMeta>, MockGenError> {
    let Some(list) = raw.and_then(Value::as_array) else {
        return Ok(inherited);
    };

    for entry in list {
        let param = follow_reference(document, entry)?;
        let Some(name) = param.get("name").and_then(Value::as_str) else {
            continue;
        };
        let Some(location) = param
            .get("in")
            .and_then(Value::as_str)
            .and_then(ParameterLocation::parse)
        else {
            warn!(parameter = name, "parameter without a valid 'in', skipping");
            continue;
        };
        let meta = ParameterMeta {
            name: name.to_string(),
            location,
            required: param
                .get("required")
                .and_then(Value::as_bool)
                .unwrap_or(location == ParameterLocation::Path),
            schema: match param.get("schema") {
                Some(schema) => Some(resolve_schema(document, schema)?),
                None => None,
            },
        };
        inherited.retain(|p| !(p.name == meta.name && p.location == meta.location));
        inherited.push(meta);
    }
    Ok(inherited)
}

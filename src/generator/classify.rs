//! TypeScript typing of operations for the controller type files.

use crate::naming::camel_case;
use crate::spec::OperationRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

pub const JSON_MEDIA_TYPE: &str = "application/json";
pub const STREAM_MEDIA_TYPE: &str = "text/event-stream";

static DTO_NAME: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"\b([A-Za-z_$][A-Za-z0-9_$]*Dto)\b").expect("dto regex is valid")
});

/// How a response body is typed in the controller signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseShape {
    /// Titled object schema: `UserDto`
    NamedObject { title: String },
    /// Titled array of titled items: `UserDto[]`
    ArrayOfNamedObject { title: String },
    /// Untitled object with properties, typed inline
    InlineObject { ts_type: String },
    /// Array of untitled objects with properties, typed inline
    ArrayOfInlineObject { ts_type: String },
    /// `text/event-stream` body
    Streaming,
    Unknown,
}

fn title_of(schema: &Value) -> Option<String> {
    let title = schema.get("title")?.as_str()?;
    let cleaned: String = title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '$')
        .collect();
    (!cleaned.is_empty()).then_some(cleaned)
}

fn type_is(schema: &Value, name: &str) -> bool {
    schema.get("type").and_then(Value::as_str) == Some(name)
}

fn has_properties(schema: &Value) -> bool {
    schema.get("properties").is_some_and(|p| !p.is_null())
}

impl ResponseShape {
    /// Classify a response by its media-type map. The JSON body decides when
    /// present; a streaming media type is checked after it.
    pub fn classify(content: &Map<String, Value>) -> Self {
        if let Some(json) = content.get(JSON_MEDIA_TYPE) {
            let items = json.get("items");
            if let (Some(title), true) = (title_of(json), has_properties(json)) {
                return ResponseShape::NamedObject { title };
            }
            if title_of(json).is_some() && type_is(json, "array") {
                if let Some(title) = items.and_then(title_of) {
                    return ResponseShape::ArrayOfNamedObject { title };
                }
            }
            if type_is(json, "object") && has_properties(json) {
                return ResponseShape::InlineObject {
                    ts_type: inline_type(json),
                };
            }
            if type_is(json, "array") {
                if let Some(items) = items.filter(|i| type_is(i, "object") && has_properties(i)) {
                    return ResponseShape::ArrayOfInlineObject {
                        ts_type: inline_type(items),
                    };
                }
            }
        }
        if content.contains_key(STREAM_MEDIA_TYPE) {
            return ResponseShape::Streaming;
        }
        ResponseShape::Unknown
    }

    /// Type written as the controller's return type
    pub fn body_type(&self) -> String {
        match self {
            ResponseShape::NamedObject { title } => format!("{title}Dto"),
            ResponseShape::ArrayOfNamedObject { title } => format!("{title}Dto[]"),
            ResponseShape::InlineObject { ts_type } => ts_type.clone(),
            ResponseShape::ArrayOfInlineObject { ts_type } => format!("{ts_type}[]"),
            ResponseShape::Streaming => "TStreamingEvent[]".to_string(),
            ResponseShape::Unknown => "null".to_string(),
        }
    }
}

fn property_key(name: &str) -> String {
    let is_identifier = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if is_identifier {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\'', "\\'"))
    }
}

/// `{ id: number; name: string }` for an object schema, `TitleDto` if titled
pub fn inline_type(schema: &Value) -> String {
    if let Some(title) = title_of(schema) {
        return format!("{title}Dto");
    }
    match schema.get("properties").and_then(Value::as_object) {
        Some(properties) if !properties.is_empty() => {
            let fields: Vec<String> = properties
                .iter()
                .map(|(key, value)| format!("{}: {}", property_key(key), property_type(value)))
                .collect();
            format!("{{ {} }}", fields.join("; "))
        }
        _ => "object".to_string(),
    }
}

/// TypeScript type of one property schema
pub fn property_type(schema: &Value) -> String {
    if let Some(title) = title_of(schema) {
        return format!("{title}Dto");
    }
    if type_is(schema, "array") {
        return match schema.get("items") {
            Some(items) if title_of(items).is_some() || items.get("type").is_some() => {
                format!("{}[]", property_type(items))
            }
            _ => "any[]".to_string(),
        };
    }
    if type_is(schema, "object") && has_properties(schema) {
        return inline_type(schema);
    }
    if let Some(Value::Array(values)) = schema.get("enum") {
        if !values.is_empty() && values.iter().all(|v| v.is_string() || v.is_number()) {
            return values
                .iter()
                .map(Value::to_string)
                .collect::<Vec<_>>()
                .join(" | ");
        }
    }
    match schema.get("type").and_then(Value::as_str) {
        Some("string") => "string",
        Some("number") | Some("integer") => "number",
        Some("boolean") => "boolean",
        Some("object") => "object",
        _ => "any",
    }
    .to_string()
}

/// `CreateUserDto` when the JSON request body is a plain `$ref`
pub fn request_dto(operation: &OperationRecord) -> Option<String> {
    let reference = operation
        .request
        .as_ref()?
        .get("content")?
        .get(JSON_MEDIA_TYPE)?
        .get("schema")?
        .get("$ref")?
        .as_str()?;
    let name = reference.rsplit('/').next().filter(|n| !n.is_empty())?;
    Some(format!("{name}Dto"))
}

/// Path parameters as an inline record, all typed `string` since they come
/// from the URL. `Record<string, never>` when there are none.
pub fn path_params_type(operation: &OperationRecord) -> String {
    let fields: Vec<String> = operation
        .path_parameters()
        .map(|p| format!("{}: string", camel_case(&p.name)))
        .collect();
    if fields.is_empty() {
        "Record<string, never>".to_string()
    } else {
        format!("{{ {} }}", fields.join(", "))
    }
}

/// Every `...Dto` name mentioned in a list of type expressions, sorted
pub fn dto_names<'a>(types: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    types
        .into_iter()
        .flat_map(|t| DTO_NAME.captures_iter(t).map(|c| c[1].to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn content(media_type: &str, schema: Value) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(media_type.to_string(), schema);
        map
    }

    #[test]
    fn test_named_object() {
        let shape = ResponseShape::classify(&content(
            JSON_MEDIA_TYPE,
            json!({"title": "User", "type": "object", "properties": {"id": {"type": "string"}}}),
        ));
        assert_eq!(shape.body_type(), "UserDto");
    }

    #[test]
    fn test_array_of_named_object() {
        let shape = ResponseShape::classify(&content(
            JSON_MEDIA_TYPE,
            json!({"title": "Users", "type": "array", "items": {"title": "User", "type": "object"}}),
        ));
        assert_eq!(shape, ResponseShape::ArrayOfNamedObject { title: "User".into() });
        assert_eq!(shape.body_type(), "UserDto[]");
    }

    #[test]
    fn test_inline_shapes() {
        let object = ResponseShape::classify(&content(
            JSON_MEDIA_TYPE,
            json!({"type": "object", "properties": {
                "count": {"type": "integer"},
                "tags": {"type": "array", "items": {"type": "string"}},
                "owner": {"title": "User"},
                "x-trace": {"type": "string", "enum": ["a", "b"]}
            }}),
        ));
        assert_eq!(
            object.body_type(),
            r#"{ count: number; tags: string[]; owner: UserDto; 'x-trace': "a" | "b" }"#
        );

        let list = ResponseShape::classify(&content(
            JSON_MEDIA_TYPE,
            json!({"type": "array", "items": {"type": "object", "properties": {"ok": {"type": "boolean"}}}}),
        ));
        assert_eq!(list.body_type(), "{ ok: boolean }[]");
    }

    #[test]
    fn test_streaming_and_unknown() {
        assert_eq!(
            ResponseShape::classify(&content(STREAM_MEDIA_TYPE, json!({}))).body_type(),
            "TStreamingEvent[]"
        );
        assert_eq!(
            ResponseShape::classify(&content(JSON_MEDIA_TYPE, json!({"type": "string"}))),
            ResponseShape::Unknown
        );
        assert_eq!(ResponseShape::classify(&Map::new()).body_type(), "null");
    }

    #[test]
    fn test_dto_names() {
        let names = dto_names(["UserDto[]", "{ owner: PetDto; n: number }", "null", "UserDto"]);
        let names: Vec<_> = names.into_iter().collect();
        assert_eq!(names, vec!["PetDto", "UserDto"]);
    }
}

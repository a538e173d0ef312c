//! Mock body generation from resolved JSON schemas.
//!
//! [`faker_expression`] emits a TypeScript expression that calls
//! `@faker-js/faker` at request time. [`static_value`] builds a fixed JSON value
//! instead, for `static` mode where every request returns the same body.
//!
//! Both walk the schema with the same precedence: `example`, type unions,
//! `enum`, `allOf` (merged), `oneOf`/`anyOf`, then the plain `type`.

use serde_json::{json, Map, Value};

/// Upper bound for strings that only declare `minLength`
pub const MAX_STRING_LENGTH: usize = 42;

fn key_lower(key: Option<&str>) -> String {
    key.unwrap_or_default().to_lowercase()
}

/// Deep merge of `source` into `target`; objects merge per key, arrays per
/// index, anything else is replaced. Nulls in `source` do not overwrite.
pub fn merge_values(target: &mut Value, source: &Value) {
    match (target, source) {
        (Value::Object(t), Value::Object(s)) => {
            for (k, v) in s {
                match t.get_mut(k) {
                    Some(existing) => merge_values(existing, v),
                    None => {
                        t.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (Value::Array(t), Value::Array(s)) => {
            for (i, v) in s.iter().enumerate() {
                match t.get_mut(i) {
                    Some(existing) => merge_values(existing, v),
                    None => t.push(v.clone()),
                }
            }
        }
        (_, Value::Null) => {}
        (t, s) => *t = s.clone(),
    }
}

/// Flatten `allOf` into a single schema; sibling keywords win over members.
fn merged_all_of(schema: &Map<String, Value>, members: &[Value]) -> Value {
    let mut merged = Value::Object(Map::new());
    for member in members {
        merge_values(&mut merged, member);
    }
    let mut rest = schema.clone();
    rest.remove("allOf");
    merge_values(&mut merged, &Value::Object(rest));
    merged
}

fn with_type(schema: &Map<String, Value>, ty: &Value) -> Value {
    let mut single = schema.clone();
    single.insert("type".to_string(), ty.clone());
    Value::Object(single)
}

fn present_example(schema: &Map<String, Value>) -> Option<&Value> {
    schema.get("example").filter(|e| !e.is_null())
}

fn usize_of(schema: &Map<String, Value>, key: &str) -> Option<usize> {
    schema.get(key).and_then(Value::as_u64).map(|n| n as usize)
}

/// TypeScript expression producing a fake value for `schema`.
///
/// `key` is the property name the schema sits under; string generation uses
/// it to pick realistic values (`email`, `created_at`, `avatarUrl`, ...).
/// The expression may reference `faker`, `MAX_ARRAY_LENGTH` and
/// `MAX_STRING_LENGTH`, which the handler file defines.
pub fn faker_expression(schema: Option<&Value>, key: Option<&str>) -> String {
    let Some(schema) = schema.and_then(Value::as_object) else {
        return "null".to_string();
    };

    if let Some(example) = present_example(schema) {
        return example.to_string();
    }

    if let Some(Value::Array(types)) = schema.get("type") {
        let options: Vec<String> = types
            .iter()
            .map(|ty| faker_expression(Some(&with_type(schema, ty)), key))
            .collect();
        return format!("faker.helpers.arrayElement([{}])", options.join(","));
    }

    if let Some(values) = schema.get("enum") {
        return format!("faker.helpers.arrayElement({values})");
    }

    if let Some(Value::Array(members)) = schema.get("allOf") {
        return faker_expression(Some(&merged_all_of(schema, members)), key);
    }

    for keyword in ["oneOf", "anyOf"] {
        if let Some(Value::Array(members)) = schema.get(keyword) {
            let options: Vec<String> = members
                .iter()
                .map(|member| faker_expression(Some(member), None))
                .collect();
            return format!("faker.helpers.arrayElement([{}])", options.join(","));
        }
    }

    match schema.get("type").and_then(Value::as_str) {
        Some("string") => string_expression(schema, key),
        Some("number") | Some("integer") => {
            let mut bounds = Map::new();
            if let Some(min) = schema.get("minimum") {
                bounds.insert("min".to_string(), min.clone());
            }
            if let Some(max) = schema.get("maximum") {
                bounds.insert("max".to_string(), max.clone());
            }
            if bounds.is_empty() {
                "faker.number.int()".to_string()
            } else {
                format!("faker.number.int({})", Value::Object(bounds))
            }
        }
        Some("boolean") => "faker.datatype.boolean()".to_string(),
        Some("object") => object_expression(schema),
        Some("array") => {
            let min = usize_of(schema, "minItems").unwrap_or(1);
            let max = usize_of(schema, "maxItems")
                .map(|n| n.to_string())
                .unwrap_or_else(|| "MAX_ARRAY_LENGTH".to_string());
            format!(
                "[...(new Array(faker.number.int({{ min: {min}, max: {max} }}))).keys()].map(_ => ({}))",
                faker_expression(schema.get("items"), None)
            )
        }
        _ => "null".to_string(),
    }
}

fn object_expression(schema: &Map<String, Value>) -> String {
    let properties = schema.get("properties").and_then(Value::as_object);
    if properties.is_none() {
        if let Some(additional @ Value::Object(_)) = schema.get("additionalProperties") {
            return format!(
                "[...new Array(5).keys()].map(_ => ({{ [faker.lorem.word()]: {} }})).reduce((acc, next) => Object.assign(acc, next), {{}})",
                faker_expression(Some(additional), None)
            );
        }
    }

    let fields: Vec<String> = properties
        .into_iter()
        .flatten()
        .map(|(name, property)| {
            format!(
                "{}: {}",
                Value::String(name.clone()),
                faker_expression(Some(property), Some(name))
            )
        })
        .collect();
    if fields.is_empty() {
        return "{}".to_string();
    }
    format!("{{\n  {}\n}}", fields.join(",\n  "))
}

fn is_url_format(format: &str) -> bool {
    matches!(
        format,
        "uri" | "uri-reference" | "iri" | "iri-reference" | "uri-template"
    )
}

fn is_image_key(key: &str) -> bool {
    ["photo", "image", "picture"].iter().any(|k| key.contains(k))
}

fn string_expression(schema: &Map<String, Value>, key: Option<&str>) -> String {
    let format = schema.get("format").and_then(Value::as_str).unwrap_or_default();
    let key = key_lower(key);

    if format == "date-time" || key.ends_with("_at") {
        return "faker.date.past()".to_string();
    }
    if format == "time" {
        return "new Date().toISOString().substring(11, 16)".to_string();
    }
    if format == "date" {
        return "faker.date.past().toISOString().substring(0,10)".to_string();
    }
    if format == "uuid" || key.ends_with("id") {
        return "faker.string.uuid()".to_string();
    }
    if matches!(format, "email" | "idn-email") || key.contains("email") {
        return "faker.internet.email()".to_string();
    }
    if matches!(format, "hostname" | "idn-hostname") {
        return "faker.internet.domainName()".to_string();
    }
    if format == "ipv4" {
        return "faker.internet.ip()".to_string();
    }
    if format == "ipv6" {
        return "faker.internet.ipv6()".to_string();
    }
    if is_url_format(format) || key.contains("url") {
        if is_image_key(&key) {
            return "faker.image.url()".to_string();
        }
        return "faker.internet.url()".to_string();
    }
    if key.ends_with("name") {
        return "faker.person.fullName()".to_string();
    }
    if key.contains("street") {
        return "faker.location.streetAddress()".to_string();
    }
    if key.contains("city") {
        return "faker.location.city()".to_string();
    }
    if key.contains("state") {
        return "faker.location.state()".to_string();
    }
    if key.contains("zip") {
        return "faker.location.zipCode()".to_string();
    }

    match (usize_of(schema, "minLength"), usize_of(schema, "maxLength")) {
        (Some(min), Some(max)) => {
            return format!("faker.string.alpha({{ length: {{ min: {min}, max: {max} }}}})")
        }
        (Some(min), None) => {
            return format!(
                "faker.string.alpha({{ length: {{ min: {min}, max: MAX_STRING_LENGTH }}}})"
            )
        }
        (None, Some(max)) => {
            return format!("faker.string.alpha({{ length: {{ min: 0, max: {max} }}}})")
        }
        (None, None) => {}
    }

    if let Some(pattern) = schema.get("pattern").and_then(Value::as_str) {
        if regex::Regex::new(pattern).is_ok() {
            return format!(
                "faker.helpers.fromRegExp(new RegExp({}))",
                Value::String(pattern.to_string())
            );
        }
    }

    "faker.lorem.words()".to_string()
}

/// Fixed JSON value for `schema`, used when bodies must not change between
/// requests. Arrays get `minItems` elements (at least one), capped by
/// `max_array_length`.
pub fn static_value(schema: Option<&Value>, key: Option<&str>, max_array_length: usize) -> Value {
    let Some(schema) = schema.and_then(Value::as_object) else {
        return Value::Null;
    };

    if let Some(example) = present_example(schema) {
        return example.clone();
    }
    if let Some(Value::Array(types)) = schema.get("type") {
        return match types.iter().find(|t| t.as_str() != Some("null")).or(types.first()) {
            Some(ty) => static_value(Some(&with_type(schema, ty)), key, max_array_length),
            None => Value::Null,
        };
    }
    if let Some(Value::Array(values)) = schema.get("enum") {
        return values.first().cloned().unwrap_or(Value::Null);
    }
    if let Some(Value::Array(members)) = schema.get("allOf") {
        return static_value(Some(&merged_all_of(schema, members)), key, max_array_length);
    }
    for keyword in ["oneOf", "anyOf"] {
        if let Some(Value::Array(members)) = schema.get(keyword) {
            return static_value(members.first(), key, max_array_length);
        }
    }

    match schema.get("type").and_then(Value::as_str) {
        Some("string") => Value::String(static_string(schema, key)),
        Some("integer") => schema
            .get("minimum")
            .or_else(|| schema.get("maximum"))
            .cloned()
            .unwrap_or_else(|| json!(1)),
        Some("number") => schema
            .get("minimum")
            .or_else(|| schema.get("maximum"))
            .cloned()
            .unwrap_or_else(|| json!(1.5)),
        Some("boolean") => Value::Bool(true),
        Some("object") => {
            let mut object = Map::new();
            match schema.get("properties").and_then(Value::as_object) {
                Some(properties) => {
                    for (name, property) in properties {
                        object.insert(
                            name.clone(),
                            static_value(Some(property), Some(name), max_array_length),
                        );
                    }
                }
                None => {
                    if let Some(additional @ Value::Object(_)) = schema.get("additionalProperties") {
                        object.insert(
                            "key".to_string(),
                            static_value(Some(additional), None, max_array_length),
                        );
                    }
                }
            }
            Value::Object(object)
        }
        Some("array") => {
            let count = usize_of(schema, "minItems")
                .unwrap_or(1)
                .max(1)
                .min(max_array_length.max(1));
            let items = schema.get("items");
            Value::Array(
                (0..count)
                    .map(|_| static_value(items, None, max_array_length))
                    .collect(),
            )
        }
        _ => Value::Null,
    }
}

fn static_string(schema: &Map<String, Value>, key: Option<&str>) -> String {
    let format = schema.get("format").and_then(Value::as_str).unwrap_or_default();
    let key = key_lower(key);

    let fixed = if format == "date-time" || key.ends_with("_at") {
        "2024-01-01T00:00:00.000Z"
    } else if format == "time" {
        "12:00"
    } else if format == "date" {
        "2024-01-01"
    } else if format == "uuid" || key.ends_with("id") {
        "3fa85f64-5717-4562-b3fc-2c963f66afa6"
    } else if matches!(format, "email" | "idn-email") || key.contains("email") {
        "user@example.com"
    } else if matches!(format, "hostname" | "idn-hostname") {
        "example.com"
    } else if format == "ipv4" {
        "192.0.2.1"
    } else if format == "ipv6" {
        "2001:db8::1"
    } else if is_url_format(format) || key.contains("url") {
        if is_image_key(&key) {
            "https://example.com/image.png"
        } else {
            "https://example.com"
        }
    } else if key.ends_with("name") {
        "Jane Doe"
    } else if key.contains("street") {
        "1 Main Street"
    } else if key.contains("city") {
        "Springfield"
    } else if key.contains("state") {
        "Oregon"
    } else if key.contains("zip") {
        "97403"
    } else {
        let min = usize_of(schema, "minLength").unwrap_or(0);
        let max = usize_of(schema, "maxLength").unwrap_or(MAX_STRING_LENGTH);
        let base = "lorem ipsum";
        if min > base.len() || max < base.len() {
            let len = if min > base.len() { min } else { max.max(min) };
            return "a".repeat(len);
        }
        base
    };
    fixed.to_string()
}

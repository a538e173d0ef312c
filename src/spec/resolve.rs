//! Expansion of `$ref` pointers inside schemas.
//!
//! Each top-level resolution owns a [`ResolutionContext`] holding the chain of
//! references currently being expanded. A reference that is already on the
//! chain is a cycle: it is replaced by an empty schema and reported with a
//! warning, and expansion continues with the rest of the document.

use crate::error::MockGenError;
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::warn;

/// Stack of reference strings currently being expanded.
///
/// Only pushed and truncated by the resolver itself, so after any call to
/// [`resolve_with_context`] the depth is what it was before the call.
#[derive(Debug, Default, Clone)]
pub struct ResolutionContext {
    stack: Vec<String>,
}

impl ResolutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.stack.iter().any(|r| r == reference)
    }

    /// `A -> B -> A`, the active chain closed by `next`
    pub fn chain(&self, next: &str) -> String {
        let mut parts: Vec<&str> = self.stack.iter().map(String::as_str).collect();
        parts.push(next);
        parts.join(" -> ")
    }

    fn push(&mut self, reference: &str) {
        self.stack.push(reference.to_string());
    }

    fn truncate(&mut self, depth: usize) {
        self.stack.truncate(depth);
    }
}

/// Look up a local JSON pointer reference such as `#/components/schemas/User`.
///
/// # Errors
///
/// `UnsupportedReference` for anything that does not start with `#`,
/// `UnresolvableReference` when the pointer leads nowhere.
pub fn lookup_pointer<'a>(document: &'a Value, reference: &str) -> Result<&'a Value, MockGenError> {
    let pointer = reference
        .strip_prefix('#')
        .ok_or_else(|| MockGenError::UnsupportedReference {
            reference: reference.to_string(),
        })?;
    if pointer.is_empty() {
        return Ok(document);
    }
    document
        .pointer(pointer)
        .ok_or_else(|| MockGenError::UnresolvableReference {
            reference: reference.to_string(),
        })
}

fn reference_of(value: &Value) -> Option<&str> {
    value.get("$ref").and_then(Value::as_str)
}

/// Follow a chain of `$ref` objects (responses, parameters, request bodies)
/// until a non-reference object is reached. Nothing inside the target is
/// expanded.
///
/// # Errors
///
/// Lookup failures, or `InvalidDocument` when the chain loops back on itself.
pub fn follow_reference<'a>(document: &'a Value, value: &'a Value) -> Result<&'a Value, MockGenError> {
    let mut current = value;
    let mut visited = HashSet::new();
    while let Some(reference) = reference_of(current) {
        if !visited.insert(reference) {
            return Err(MockGenError::invalid_document(format!(
                "reference '{reference}' points back to itself"
            )));
        }
        current = lookup_pointer(document, reference)?;
    }
    Ok(current)
}

/// Resolve a schema with a fresh context.
///
/// # Arguments
///
/// * `document` - The whole OpenAPI document, used as the pointer root
/// * `schema` - The schema (or reference) to expand
///
/// # Returns
///
/// A self-contained copy of `schema` with every reference replaced by its
/// target, except cyclic ones which become `{}`.
///
/// # Errors
///
/// Returns an error if a reference is not local or does not resolve.
pub fn resolve_schema(document: &Value, schema: &Value) -> Result<Value, MockGenError> {
    let mut context = ResolutionContext::new();
    resolve_with_context(document, schema, &mut context)
}

/// Resolve a schema inside an already active context.
///
/// # Errors
///
/// Same as [`resolve_schema`].
pub fn resolve_with_context(
    document: &Value,
    schema: &Value,
    context: &mut ResolutionContext,
) -> Result<Value, MockGenError> {
    let depth = context.depth();
    let result = resolve_node(document, schema, context);
    context.truncate(depth);
    result
}

fn has_type(schema: &Map<String, Value>, name: &str) -> bool {
    match schema.get("type") {
        Some(Value::String(t)) => t == name,
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some(name)),
        _ => false,
    }
}

fn resolve_node(
    document: &Value,
    schema: &Value,
    context: &mut ResolutionContext,
) -> Result<Value, MockGenError> {
    let mut current = schema;
    while let Some(reference) = reference_of(current) {
        if context.contains(reference) {
            warn!(
                "circular reference for path {} found",
                context.chain(reference)
            );
            return Ok(Value::Object(Map::new()));
        }
        context.push(reference);
        current = lookup_pointer(document, reference)?;
    }

    let mut node = match current {
        Value::Object(map) => map.clone(),
        other => return Ok(other.clone()),
    };

    if has_type(&node, "array") {
        if let Some(items) = node.get("items").cloned() {
            let resolved = resolve_with_context(document, &items, context)?;
            node.insert("items".to_string(), resolved);
        }
    }

    if has_type(&node, "object") {
        match node.get("properties").cloned() {
            Some(Value::Object(properties)) => {
                let mut resolved = Map::with_capacity(properties.len());
                for (name, property) in &properties {
                    resolved.insert(
                        name.clone(),
                        resolve_with_context(document, property, context)?,
                    );
                }
                node.insert("properties".to_string(), Value::Object(resolved));
            }
            _ => {
                if let Some(additional @ Value::Object(_)) = node.get("additionalProperties").cloned()
                {
                    let resolved = resolve_with_context(document, &additional, context)?;
                    node.insert("additionalProperties".to_string(), resolved);
                }
            }
        }
    }

    for keyword in ["allOf", "oneOf", "anyOf"] {
        if let Some(Value::Array(members)) = node.get(keyword).cloned() {
            let mut resolved = Vec::with_capacity(members.len());
            for member in &members {
                resolved.push(resolve_with_context(document, member, context)?);
            }
            node.insert(keyword.to_string(), Value::Array(resolved));
            break;
        }
    }

    Ok(Value::Object(node))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use serde_json::json;

    fn document() -> Value {
        json!({
            "components": {
                "schemas": {
                    "User": {
                        "type": "object",
                        "title": "User",
                        "properties": {
                            "id": { "type": "integer" },
                            "address": { "$ref": "#/components/schemas/Address" }
                        }
                    },
                    "Address": {
                        "type": "object",
                        "properties": { "city": { "type": "string" } }
                    },
                    "Node": {
                        "type": "object",
                        "properties": {
                            "value": { "type": "string" },
                            "next": { "$ref": "#/components/schemas/Node" }
                        }
                    },
                    "Alias": { "$ref": "#/components/schemas/Address" },
                    "A": {
                        "type": "object",
                        "properties": { "b": { "$ref": "#/components/schemas/B" } }
                    },
                    "B": {
                        "type": "object",
                        "properties": { "a": { "$ref": "#/components/schemas/A" } }
                    }
                }
            }
        })
    }

    #[test]
    fn test_nested_reference_is_inlined() {
        let doc = document();
        let resolved = resolve_schema(&doc, &json!({"$ref": "#/components/schemas/User"})).unwrap();
        assert_eq!(resolved["title"], "User");
        assert_eq!(
            resolved["properties"]["address"]["properties"]["city"]["type"],
            "string"
        );
    }

    #[test]
    fn test_cycle_becomes_empty_schema() {
        let doc = document();
        let resolved = resolve_schema(&doc, &json!({"$ref": "#/components/schemas/Node"})).unwrap();
        assert_eq!(resolved["properties"]["value"]["type"], "string");
        assert_eq!(resolved["properties"]["next"], json!({}));
    }

    #[test]
    fn test_reference_chain_is_followed() {
        let doc = document();
        let resolved = resolve_schema(&doc, &json!({"$ref": "#/components/schemas/Alias"})).unwrap();
        assert_eq!(resolved["properties"]["city"]["type"], "string");
    }

    #[test]
    fn test_context_depth_restored() {
        let doc = document();
        let mut context = ResolutionContext::new();
        resolve_with_context(&doc, &json!({"$ref": "#/components/schemas/User"}), &mut context)
            .unwrap();
        assert_eq!(context.depth(), 0);
    }

    #[test]
    fn test_sibling_references_are_not_cycles() {
        let doc = document();
        let schema = json!({
            "type": "object",
            "properties": {
                "home": { "$ref": "#/components/schemas/Address" },
                "work": { "$ref": "#/components/schemas/Address" }
            }
        });
        let resolved = resolve_schema(&doc, &schema).unwrap();
        assert_eq!(resolved["properties"]["work"]["properties"]["city"]["type"], "string");
    }

    #[test]
    fn test_missing_and_external_references() {
        let doc = document();
        let missing = resolve_schema(&doc, &json!({"$ref": "#/components/schemas/Nope"}));
        assert!(matches!(missing, Err(MockGenError::UnresolvableReference { .. })));
        let external = resolve_schema(&doc, &json!({"$ref": "other.yaml#/Pet"}));
        assert!(matches!(external, Err(MockGenError::UnsupportedReference { .. })));
    }

    #[test]
    fn test_array_items_and_composition() {
        let doc = document();
        let schema = json!({
            "type": "array",
            "items": {
                "allOf": [
                    { "$ref": "#/components/schemas/Address" },
                    { "type": "object", "properties": { "zip": { "type": "string" } } }
                ]
            }
        });
        let resolved = resolve_schema(&doc, &schema).unwrap();
        assert_eq!(resolved["items"]["allOf"][0]["properties"]["city"]["type"], "string");
    }

    #[test]
    fn test_additional_properties_resolved() {
        let doc = document();
        let schema = json!({
            "type": "object",
            "additionalProperties": { "$ref": "#/components/schemas/Address" }
        });
        let resolved = resolve_schema(&doc, &schema).unwrap();
        assert_eq!(
            resolved["additionalProperties"]["properties"]["city"]["type"],
            "string"
        );
    }

    #[test]
    fn test_follow_reference_detects_loops() {
        let doc = json!({
            "components": { "responses": {
                "A": { "$ref": "#/components/responses/B" },
                "B": { "$ref": "#/components/responses/A" }
            }}
        });
        let start = json!({"$ref": "#/components/responses/A"});
        assert!(follow_reference(&doc, &start).is_err());
    }

    #[test]
    fn test_two_step_cycle_restores_context() {
        let doc = document();
        let root = json!({"$ref": "#/components/schemas/A"});
        let mut context = ResolutionContext::new();

        let first = resolve_with_context(&doc, &root, &mut context).unwrap();
        assert_eq!(first["properties"]["b"]["type"], "object");
        assert_eq!(first["properties"]["b"]["properties"]["a"], json!({}));
        assert_eq!(context.depth(), 0);

        let second = resolve_with_context(&doc, &root, &mut context).unwrap();
        assert_eq!(second, first);
        assert_eq!(context.depth(), 0);

        // a resolved tree has no references left to expand
        let again = resolve_with_context(&doc, &first, &mut context).unwrap();
        assert_eq!(again, first);
    }
}

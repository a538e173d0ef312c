use http::Method;
use serde_json::{Map, Value};

/// Where a parameter lives in the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParameterLocation {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "path" => Some(ParameterLocation::Path),
            "query" => Some(ParameterLocation::Query),
            "header" => Some(ParameterLocation::Header),
            "cookie" => Some(ParameterLocation::Cookie),
            _ => None,
        }
    }
}

impl std::fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterLocation::Path => write!(f, "path"),
            ParameterLocation::Query => write!(f, "query"),
            ParameterLocation::Header => write!(f, "header"),
            ParameterLocation::Cookie => write!(f, "cookie"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterMeta {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub schema: Option<Value>,
}

/// One entry of an operation's `responses` map.
///
/// `content` maps media type to the fully resolved schema, in document order.
/// Responses without a body (or media types without a schema) keep an empty map.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEntry {
    pub code: String,
    pub content: Map<String, Value>,
}

impl ResponseEntry {
    /// Numeric status, `None` for `default` and range codes like `2XX`
    pub fn status(&self) -> Option<u16> {
        self.code.parse().ok()
    }

    /// First media type, used as the `Content-Type` of the mocked response
    pub fn media_type(&self) -> Option<&str> {
        self.content.keys().next().map(String::as_str)
    }
}

/// Normalized record of one (path, verb) pair.
#[derive(Debug, Clone)]
pub struct OperationRecord {
    /// Route in colon form (`/users/:id`)
    pub path: String,
    /// Route as written in the document (`/users/{id}`)
    pub raw_path: String,
    pub verb: Method,
    /// camelCase of `operationId`, or of `{verb}/{path}` when it is absent
    pub id: String,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub responses: Vec<ResponseEntry>,
    /// Request body object with the top-level reference followed; schemas
    /// inside are left unresolved so their `$ref` names stay visible.
    pub request: Option<Value>,
    pub parameters: Vec<ParameterMeta>,
}

impl OperationRecord {
    pub fn response(&self, code: &str) -> Option<&ResponseEntry> {
        self.responses.iter().find(|r| r.code == code)
    }

    pub fn path_parameters(&self) -> impl Iterator<Item = &ParameterMeta> {
        self.parameters
            .iter()
            .filter(|p| p.location == ParameterLocation::Path)
    }
}

/// Comma-separated filters applied while extracting operations.
///
/// Empty or whitespace-only strings count as "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub includes: Option<String>,
    pub excludes: Option<String>,
    pub codes: Option<String>,
}

fn split_list(raw: Option<&str>) -> Option<Vec<&str>> {
    let items: Vec<&str> = raw?
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

impl FilterOptions {
    /// Whether a document path survives the include/exclude lists.
    ///
    /// Excludes are applied after includes, so a path listed in both is dropped.
    pub fn allows_path(&self, path: &str) -> bool {
        if let Some(included) = split_list(self.includes.as_deref()) {
            if !included.contains(&path) {
                return false;
            }
        }
        match split_list(self.excludes.as_deref()) {
            Some(excluded) => !excluded.contains(&path),
            None => true,
        }
    }

    pub fn allows_code(&self, code: &str) -> bool {
        match split_list(self.codes.as_deref()) {
            Some(codes) => codes.contains(&code),
            None => true,
        }
    }
}
